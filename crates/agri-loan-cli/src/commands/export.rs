use std::path::Path;

use clap::Args;
use rust_decimal::prelude::ToPrimitive;
use rust_xlsxwriter::{Format, Workbook};
use serde_json::Value;

use agri_loan_core::schedule::{generate_schedule, ScheduleRow};

use super::schedule::{current_year, resolve_request, ScheduleParams};

/// Column headers of the exported sheet, matching the on-screen table.
const EXPORT_HEADERS: [&str; 6] = [
    "년차",
    "잔액(원)",
    "이자(원)",
    "원금상환액(원)",
    "연납부액(원)",
    "연도",
];

const SHEET_NAME: &str = "상환일정";

/// Arguments for spreadsheet export
#[derive(Args)]
pub struct ExportArgs {
    #[command(flatten)]
    pub params: ScheduleParams,

    /// Destination file; the extension picks the backend (.xlsx or .csv)
    #[arg(long)]
    pub out: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ExportBackend {
    Xlsx,
    Csv,
}

impl ExportBackend {
    fn for_path(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        match path.extension().and_then(|e| e.to_str()) {
            Some("xlsx") => Ok(ExportBackend::Xlsx),
            Some("csv") => Ok(ExportBackend::Csv),
            _ => Err(format!(
                "Unsupported export extension for '{}': use .xlsx or .csv",
                path.display()
            )
            .into()),
        }
    }

    fn name(&self) -> &'static str {
        match self {
            ExportBackend::Xlsx => "xlsx",
            ExportBackend::Csv => "csv",
        }
    }
}

pub fn run_export(args: ExportArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let request = resolve_request(&args.params)?;
    let start_year = request.start_year.unwrap_or_else(current_year);

    let schedule = generate_schedule(&request.terms)?;
    let backend = ExportBackend::for_path(Path::new(&args.out))?;

    match backend {
        ExportBackend::Xlsx => write_xlsx(&args.out, &schedule.rows, start_year)?,
        ExportBackend::Csv => write_csv(&args.out, &schedule.rows, start_year)?,
    }

    Ok(serde_json::json!({
        "path": args.out,
        "format": backend.name(),
        "rows": schedule.rows.len(),
    }))
}

/// Write the full-precision schedule as a single worksheet with a header
/// row and numeric cells for every monetary column.
fn write_xlsx(
    path: &str,
    rows: &[ScheduleRow],
    start_year: i32,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(SHEET_NAME)?;

    let header = Format::new().set_bold();
    for (col, title) in EXPORT_HEADERS.iter().enumerate() {
        worksheet.write_string_with_format(0, col as u16, *title, &header)?;
    }

    for (i, row) in rows.iter().enumerate() {
        let r = (i + 1) as u32;
        worksheet.write_number(r, 0, row.year_index as f64)?;
        worksheet.write_number(r, 1, number_cell(row.remaining_balance))?;
        worksheet.write_number(r, 2, number_cell(row.interest))?;
        worksheet.write_number(r, 3, number_cell(row.principal_paid))?;
        worksheet.write_number(r, 4, number_cell(row.total_payment))?;
        worksheet.write_number(r, 5, (start_year + row.year_index as i32) as f64)?;
    }

    workbook.save(path)?;
    Ok(())
}

fn write_csv(
    path: &str,
    rows: &[ScheduleRow],
    start_year: i32,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut wtr = csv::Writer::from_path(path)?;
    wtr.write_record(EXPORT_HEADERS)?;
    for row in rows {
        wtr.write_record([
            row.year_index.to_string(),
            row.remaining_balance.to_string(),
            row.interest.to_string(),
            row.principal_paid.to_string(),
            row.total_payment.to_string(),
            (start_year + row.year_index as i32).to_string(),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

/// Schedule values are whole won well inside f64's exact integer range.
fn number_cell(value: rust_decimal::Decimal) -> f64 {
    value.to_f64().unwrap_or_default()
}
