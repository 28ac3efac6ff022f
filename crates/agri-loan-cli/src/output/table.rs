use serde_json::{Map, Value};
use tabled::{builder::Builder, Table};

use agri_loan_core::won::group_digits;

/// Schedule table columns in display order, with their Korean headers.
const SCHEDULE_COLUMNS: [(&str, &str); 5] = [
    ("calendar_year", "연도"),
    ("remaining_balance", "잔액"),
    ("interest", "이자"),
    ("principal_paid", "원금상환"),
    ("total_payment", "연납부액"),
];

/// Render a computation envelope: a summary table of the headline figures,
/// the yearly schedule, then warnings and methodology.
pub fn print_table(value: &Value) {
    let Some(map) = value.as_object() else {
        println!("{}", value);
        return;
    };

    match map.get("result") {
        Some(Value::Object(result)) => print_summary(result),
        _ => print_summary(map),
    }

    if let Some(display) = map.get("display") {
        print_schedule(display);
    }

    if let Some(Value::Array(warnings)) = map.get("warnings") {
        if !warnings.is_empty() {
            println!("\nWarnings:");
            for w in warnings {
                if let Value::String(s) = w {
                    println!("  - {}", s);
                }
            }
        }
    }

    if let Some(Value::String(methodology)) = map.get("methodology") {
        println!("\nMethodology: {}", methodology);
    }
}

/// Two-column table of the scalar result fields. Nested structures (the
/// schedule itself, the input terms) have their own rendering.
fn print_summary(result: &Map<String, Value>) {
    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    for (key, val) in result {
        if matches!(val, Value::Array(_) | Value::Object(_)) {
            continue;
        }
        builder.push_record([key.as_str(), &scalar(val)]);
    }
    println!("{}", Table::from(builder));
}

fn print_schedule(display: &Value) {
    let Some(rows) = display.get("rows").and_then(Value::as_array) else {
        return;
    };

    if let Some(Value::String(principal)) = display.get("principal_formatted") {
        println!("\n대출 원금: {}", principal);
    }

    let unit = display.get("unit").and_then(Value::as_u64).unwrap_or(1);
    if unit > 1 {
        println!("상환 일정 (단위: {}원)", group_digits(unit));
    } else {
        println!("상환 일정 (단위: 원)");
    }

    let mut builder = Builder::default();
    builder.push_record(SCHEDULE_COLUMNS.map(|(_, header)| header.to_string()));
    for row in rows {
        if let Value::Object(fields) = row {
            builder.push_record(
                SCHEDULE_COLUMNS.map(|(key, _)| fields.get(key).map(scalar).unwrap_or_default()),
            );
        }
    }
    println!("{}", Table::from(builder));
}

fn scalar(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}
