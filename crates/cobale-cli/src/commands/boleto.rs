use chrono::NaiveDate;
use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use cobale_core::boleto::{encode_boleto, verify_barcode, BankParams, BoletoRequest};

use crate::input;

/// Arguments for boleto barcode derivation
#[derive(Args)]
pub struct BoletoArgs {
    /// Path to JSON/YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Persisted agreement id (nosso numero)
    #[arg(long)]
    pub document_id: Option<u64>,

    /// Due date, YYYY-MM-DD
    #[arg(long)]
    pub due_date: Option<NaiveDate>,

    /// Document amount
    #[arg(long)]
    pub amount: Option<Decimal>,

    /// Issuing bank code (3 digits)
    #[arg(long)]
    pub bank_code: Option<String>,

    /// Wallet (carteira) code
    #[arg(long)]
    pub wallet: Option<String>,

    /// Agency number
    #[arg(long)]
    pub agency: Option<String>,

    /// Account number
    #[arg(long)]
    pub account: Option<String>,
}

/// Arguments for barcode verification
#[derive(Args)]
pub struct VerifyArgs {
    /// The 44-digit barcode to verify
    pub barcode: String,
}

pub fn run_boleto(args: BoletoArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let request: BoletoRequest = if let Some(ref path) = args.input {
        input::file::read_request(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        let defaults = BankParams::default();
        BoletoRequest {
            document_id: args
                .document_id
                .ok_or("--document-id is required (or provide --input)")?,
            due_date: args
                .due_date
                .ok_or("--due-date is required (or provide --input)")?,
            amount: args
                .amount
                .ok_or("--amount is required (or provide --input)")?,
            bank: BankParams {
                bank_code: args.bank_code.unwrap_or(defaults.bank_code),
                wallet_code: args.wallet.unwrap_or(defaults.wallet_code),
                agency: args.agency.unwrap_or(defaults.agency),
                account: args.account.unwrap_or(defaults.account),
            },
        }
    };

    let output = encode_boleto(&request)?;
    Ok(serde_json::to_value(&output)?)
}

pub fn run_verify(args: VerifyArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let valid = verify_barcode(&args.barcode)?;
    Ok(serde_json::json!({
        "barcode": args.barcode,
        "valid": valid,
    }))
}
