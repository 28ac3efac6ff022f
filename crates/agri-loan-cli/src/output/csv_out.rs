use serde_json::Value;
use std::io;

/// Schedule row fields in column order for CSV output.
const ROW_COLUMNS: [&str; 5] = [
    "year_index",
    "remaining_balance",
    "interest",
    "principal_paid",
    "total_payment",
];

/// Write output as CSV to stdout. Schedule envelopes emit one record per
/// year; anything else falls back to field/value pairs.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());

    if let Some(rows) = value.pointer("/result/schedule").and_then(Value::as_array) {
        write_schedule_csv(&mut wtr, rows);
    } else if let Some(Value::Object(result)) = value.get("result") {
        let _ = wtr.write_record(["field", "value"]);
        for (key, val) in result {
            let _ = wtr.write_record([key.as_str(), &format_csv_value(val)]);
        }
    } else if let Value::Object(map) = value {
        let _ = wtr.write_record(["field", "value"]);
        for (key, val) in map {
            let _ = wtr.write_record([key.as_str(), &format_csv_value(val)]);
        }
    } else {
        let _ = wtr.write_record([&format_csv_value(value)]);
    }

    let _ = wtr.flush();
}

fn write_schedule_csv(wtr: &mut csv::Writer<io::StdoutLock<'_>>, rows: &[Value]) {
    let _ = wtr.write_record(ROW_COLUMNS);
    for row in rows {
        if let Value::Object(fields) = row {
            let record: Vec<String> = ROW_COLUMNS
                .iter()
                .map(|col| fields.get(*col).map(format_csv_value).unwrap_or_default())
                .collect();
            let _ = wtr.write_record(&record);
        }
    }
}

fn format_csv_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}
