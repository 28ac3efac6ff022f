mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::export::ExportArgs;
use commands::schedule::ScheduleArgs;
use commands::won::FormatWonArgs;

/// Repayment planning for subsidized agricultural loans
#[derive(Parser)]
#[command(
    name = "agloan",
    version,
    about = "Repayment planning for subsidized agricultural loans",
    long_about = "A CLI for computing grace-period / equal-principal loan \
                  repayment schedules with decimal precision. Renders yearly \
                  schedules, formats won amounts, and exports spreadsheets."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute a yearly repayment schedule
    Schedule(ScheduleArgs),
    /// Write a repayment schedule to an .xlsx or .csv file
    Export(ExportArgs),
    /// Render an amount in compound won units (조/억/만)
    FormatWon(FormatWonArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn main() {
    let cli = Cli::parse();

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Schedule(args) => commands::schedule::run_schedule(args),
        Commands::Export(args) => commands::export::run_export(args),
        Commands::FormatWon(args) => commands::won::run_format_won(args),
        Commands::Version => {
            println!("agloan {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
