mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::boleto::{BoletoArgs, VerifyArgs};
use commands::pricing::PricingArgs;

/// Collections settlement pricing and boleto encoding
#[derive(Parser)]
#[command(
    name = "cobale",
    version,
    about = "Collections settlement pricing and boleto encoding",
    long_about = "A CLI for pricing overdue-contract settlements (interest, banded \
                  discounts, installment plans) and deriving verifiable boleto \
                  barcodes with mod-11 check digits, all in decimal precision."
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
    /// Price an overdue contract settlement
    Pricing(PricingArgs),
    /// Derive a boleto barcode and typeable line
    Boleto(BoletoArgs),
    /// Verify the check digit embedded in a 44-digit barcode
    Verify(VerifyArgs),
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
        Commands::Pricing(args) => commands::pricing::run_pricing(args),
        Commands::Boleto(args) => commands::boleto::run_boleto(args),
        Commands::Verify(args) => commands::boleto::run_verify(args),
        Commands::Version => {
            println!("cobale {}", env!("CARGO_PKG_VERSION"));
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
