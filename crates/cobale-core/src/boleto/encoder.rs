use chrono::NaiveDate;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::boleto::modulo11;
use crate::{types::*, CobaleError, CobaleResult};

/// Barcode geometry. The 44 positions split into bank code, currency,
/// check digit, due-date factor, amount and the issuer free field.
pub const BARCODE_LEN: usize = 44;
const CURRENCY_CODE: char = '9';
const FACTOR_WIDTH: usize = 4;
const AMOUNT_WIDTH: usize = 10;
const FREE_FIELD_WIDTH: usize = 25;
const DOCUMENT_ID_WIDTH: usize = 11;

/// Largest document id that fits the 11-digit nosso-numero slot.
const MAX_DOCUMENT_ID: u64 = 99_999_999_999;

// ---------------------------------------------------------------------------
// Input / Output types
// ---------------------------------------------------------------------------

/// Issuer banking profile embedded in every barcode free field.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BankParams {
    pub bank_code: String,
    pub wallet_code: String,
    pub agency: String,
    pub account: String,
}

impl Default for BankParams {
    fn default() -> Self {
        Self {
            bank_code: "237".into(),
            wallet_code: "09".into(),
            agency: "1234".into(),
            account: "567890".into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoletoRequest {
    pub document_id: u64,
    pub due_date: NaiveDate,
    pub amount: Money,
    #[serde(default)]
    pub bank: BankParams,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoletoIdentifier {
    pub bank_code: String,
    pub wallet_code: String,
    pub agency: String,
    pub account: String,
    pub document_id: u64,
    pub due_date: NaiveDate,
    pub amount: Money,
    pub due_date_factor: String,
    pub amount_in_cents: u64,
    pub free_field: String,
    pub check_digit: u8,
    pub barcode: String,
    pub formatted_line: String,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Derive a verifiable 44-digit boleto barcode (and its typeable line)
/// from a persisted agreement id, due date, amount and issuer profile.
///
/// Deterministic: identical inputs always produce byte-identical output,
/// which is what makes the embedded check digit meaningful on re-print.
pub fn encode_boleto(request: &BoletoRequest) -> CobaleResult<ComputationOutput<BoletoIdentifier>> {
    let start = Instant::now();

    validate_bank_params(&request.bank)?;

    let due_date_factor = due_date_factor(request.due_date)?;
    let amount_in_cents = amount_in_cents(request.amount)?;
    let free_field = free_field(&request.bank, request.document_id)?;

    let amount_field = format!("{amount_in_cents:0AMOUNT_WIDTH$}");
    let stem = format!(
        "{}{}{}{}{}",
        request.bank.bank_code, CURRENCY_CODE, due_date_factor, amount_field, free_field
    );
    let check_digit = modulo11::check_digit(&stem);

    let barcode = format!(
        "{}{}{}{}{}{}",
        request.bank.bank_code, CURRENCY_CODE, check_digit, due_date_factor, amount_field,
        free_field
    );
    let formatted_line = format_typeable_line(&barcode);

    let result = BoletoIdentifier {
        bank_code: request.bank.bank_code.clone(),
        wallet_code: request.bank.wallet_code.clone(),
        agency: request.bank.agency.clone(),
        account: request.bank.account.clone(),
        document_id: request.document_id,
        due_date: request.due_date,
        amount: round_cents(request.amount),
        due_date_factor,
        amount_in_cents,
        free_field,
        check_digit,
        barcode,
        formatted_line,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    let assumptions = serde_json::json!({
        "due_date_epoch": "1997-10-07",
        "currency_code": "9",
        "check_digit": "modulo-11, weights 2-9 right to left, 10 and 11 map to 0",
        "free_field": "wallet + 11-digit document id + agency + account, zero-padded to 25",
    });

    Ok(with_metadata(
        "Boleto barcode derivation (fator de vencimento + mod-11 check digit)",
        &assumptions,
        Vec::new(),
        elapsed,
        result,
    ))
}

/// Recompute the check digit embedded in a 44-digit barcode and report
/// whether it matches. Rejects anything that is not 44 ASCII digits.
pub fn verify_barcode(barcode: &str) -> CobaleResult<bool> {
    if barcode.len() != BARCODE_LEN || !barcode.bytes().all(|b| b.is_ascii_digit()) {
        return Err(CobaleError::invalid(
            "barcode",
            format!("Barcode must be exactly {BARCODE_LEN} digits."),
        ));
    }

    let embedded = barcode.as_bytes()[4] - b'0';
    let stem = format!("{}{}", &barcode[..4], &barcode[5..]);
    Ok(modulo11::check_digit(&stem) == embedded)
}

// ---------------------------------------------------------------------------
// Field encoders
// ---------------------------------------------------------------------------

fn validate_bank_params(bank: &BankParams) -> CobaleResult<()> {
    if bank.bank_code.len() != 3 || !is_numeric(&bank.bank_code) {
        return Err(CobaleError::invalid(
            "bank_code",
            "Bank code must be exactly 3 digits.",
        ));
    }
    for (field, value) in [
        ("wallet_code", &bank.wallet_code),
        ("agency", &bank.agency),
        ("account", &bank.account),
    ] {
        if value.is_empty() || !is_numeric(value) {
            return Err(CobaleError::invalid(
                field,
                "Field must be a non-empty digit string.",
            ));
        }
    }
    Ok(())
}

/// Days between the due date and the fixed 1997-10-07 epoch, zero-padded
/// to 4 digits. Dates before the epoch or past the 4-digit range cannot
/// be represented and are rejected rather than wrapped.
fn due_date_factor(due_date: NaiveDate) -> CobaleResult<String> {
    let epoch = barcode_epoch();
    let days: Days = due_date.signed_duration_since(epoch).num_days();
    if days < 0 {
        return Err(CobaleError::invalid(
            "due_date",
            format!("Due date must not precede the {epoch} barcode epoch."),
        ));
    }
    if days > 9999 {
        return Err(CobaleError::invalid(
            "due_date",
            "Due date exceeds the 4-digit fator de vencimento range.",
        ));
    }
    Ok(format!("{days:0FACTOR_WIDTH$}"))
}

fn amount_in_cents(amount: Decimal) -> CobaleResult<u64> {
    if amount < Decimal::ZERO {
        return Err(CobaleError::invalid(
            "amount",
            "Amount cannot be negative.",
        ));
    }
    let cents = amount
        .checked_mul(dec!(100))
        .map(|scaled| scaled.round_dp_with_strategy(0, RoundingStrategy::MidpointNearestEven))
        .and_then(|rounded| rounded.to_u64())
        .ok_or_else(|| CobaleError::invalid("amount", "Amount is not a representable number."))?;
    if cents >= 10u64.pow(AMOUNT_WIDTH as u32) {
        return Err(CobaleError::invalid(
            "amount",
            format!("Amount in cents must fit {AMOUNT_WIDTH} digits."),
        ));
    }
    Ok(cents)
}

/// Issuer free field: wallet + zero-padded document id + agency + account,
/// right-padded with zeros to exactly 25 positions. Oversized input is an
/// error; silent truncation would corrupt the check digit.
fn free_field(bank: &BankParams, document_id: u64) -> CobaleResult<String> {
    if document_id > MAX_DOCUMENT_ID {
        return Err(CobaleError::invalid(
            "document_id",
            format!("Document id must fit {DOCUMENT_ID_WIDTH} digits."),
        ));
    }

    let mut field = format!(
        "{}{document_id:0DOCUMENT_ID_WIDTH$}{}{}",
        bank.wallet_code, bank.agency, bank.account
    );
    if field.len() > FREE_FIELD_WIDTH {
        return Err(CobaleError::invalid(
            "free_field",
            format!(
                "Wallet, document id, agency and account exceed the {FREE_FIELD_WIDTH}-position free field."
            ),
        ));
    }
    while field.len() < FREE_FIELD_WIDTH {
        field.push('0');
    }
    Ok(field)
}

/// Typeable-line grouping of the barcode, byte-for-byte:
/// `AAAAA.AAAAA BBBBB.BBBBBB CCCCC.CCCCCC D EEEEEEEEEEEEEEE`.
fn format_typeable_line(barcode: &str) -> String {
    format!(
        "{}.{} {}.{} {}.{} {} {}",
        &barcode[0..5],
        &barcode[5..10],
        &barcode[10..15],
        &barcode[15..21],
        &barcode[21..26],
        &barcode[26..32],
        &barcode[32..33],
        &barcode[33..44],
    )
}

fn is_numeric(value: &str) -> bool {
    value.bytes().all(|b| b.is_ascii_digit())
}

fn barcode_epoch() -> NaiveDate {
    // 1997-10-07, the fixed fator de vencimento reference date.
    NaiveDate::from_ymd_opt(1997, 10, 7).expect("fixed epoch date is valid")
}
