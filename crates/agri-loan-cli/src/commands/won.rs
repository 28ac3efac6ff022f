use clap::Args;
use serde_json::Value;

use agri_loan_core::won::{format_won, group_digits};

/// Arguments for won-amount formatting
#[derive(Args)]
pub struct FormatWonArgs {
    /// Amount in whole won
    #[arg(long)]
    pub amount: u64,
}

pub fn run_format_won(args: FormatWonArgs) -> Result<Value, Box<dyn std::error::Error>> {
    Ok(serde_json::json!({
        "amount": args.amount,
        "formatted": format_won(args.amount),
        "grouped": group_digits(args.amount),
    }))
}
