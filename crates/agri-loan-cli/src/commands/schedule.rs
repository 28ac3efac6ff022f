use chrono::Datelike;
use clap::Args;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;

use agri_loan_core::schedule::{model_repayment_plan, LoanTerms};
use agri_loan_core::won::format_won;

use crate::input;

/// Loan inputs shared by the schedule and export commands. Defaults mirror
/// the standard subsidized-loan product: 1.5% over 25 years with a 5-year
/// grace period.
#[derive(Args)]
pub struct ScheduleParams {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Loan principal in whole won
    #[arg(long)]
    pub principal: Option<i64>,

    /// Annual interest rate in percent
    #[arg(long, default_value = "1.5")]
    pub rate: Decimal,

    /// Total term in years, grace period included
    #[arg(long, default_value_t = 25)]
    pub total_years: u32,

    /// Interest-only years at the start of the term
    #[arg(long, default_value_t = 5)]
    pub grace_years: u32,

    /// Disbursement year used to label rows (defaults to the current year)
    #[arg(long)]
    pub start_year: Option<i32>,
}

/// Arguments for schedule computation
#[derive(Args)]
pub struct ScheduleArgs {
    #[command(flatten)]
    pub params: ScheduleParams,

    /// Display unit divisor for the table view (e.g. 1000 for thousands)
    #[arg(long, default_value_t = 1)]
    pub unit: u32,
}

/// A full plan request as read from a JSON file or stdin.
#[derive(Debug, Deserialize)]
pub struct PlanRequest {
    #[serde(flatten)]
    pub terms: LoanTerms,
    #[serde(default)]
    pub start_year: Option<i32>,
}

pub fn run_schedule(args: ScheduleArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let request = resolve_request(&args.params)?;
    let start_year = request.start_year.unwrap_or_else(current_year);

    let computed = model_repayment_plan(&request.terms)?;

    let display_rows: Vec<Value> = computed
        .result
        .schedule
        .iter()
        .map(|row| {
            let scaled = row.in_units_of(args.unit);
            serde_json::json!({
                "calendar_year": start_year + row.year_index as i32,
                "remaining_balance": scaled.remaining_balance,
                "interest": scaled.interest,
                "principal_paid": scaled.principal_paid,
                "total_payment": scaled.total_payment,
            })
        })
        .collect();

    let mut value = serde_json::to_value(&computed)?;
    if let Some(map) = value.as_object_mut() {
        map.insert(
            "display".to_string(),
            serde_json::json!({
                "start_year": start_year,
                "unit": args.unit,
                "principal_formatted": format_won(request.terms.principal as u64),
                "rows": display_rows,
            }),
        );
    }
    Ok(value)
}

/// Resolve the plan request in the usual precedence order: input file,
/// piped stdin, then individual flags.
pub fn resolve_request(params: &ScheduleParams) -> Result<PlanRequest, Box<dyn std::error::Error>> {
    if let Some(ref path) = params.input {
        return input::file::read_json(path);
    }
    if let Some(request) = input::stdin::read_stdin()? {
        return Ok(request);
    }
    request_from_flags(params)
}

pub fn current_year() -> i32 {
    chrono::Local::now().year()
}

fn request_from_flags(params: &ScheduleParams) -> Result<PlanRequest, Box<dyn std::error::Error>> {
    let principal = params
        .principal
        .ok_or("--principal is required (or provide --input)")?;

    Ok(PlanRequest {
        terms: LoanTerms {
            principal,
            annual_rate_percent: params.rate,
            total_years: params.total_years,
            grace_years: params.grace_years,
        },
        start_year: params.start_year,
    })
}
