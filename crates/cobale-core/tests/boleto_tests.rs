use chrono::NaiveDate;
use cobale_core::boleto::{encode_boleto, modulo11, verify_barcode, BankParams, BoletoRequest};
use cobale_core::CobaleError;
use rust_decimal_macros::dec;

// ===========================================================================
// Boleto encoding tests
// ===========================================================================

fn request_for(document_id: u64, due: (i32, u32, u32), amount: rust_decimal::Decimal) -> BoletoRequest {
    BoletoRequest {
        document_id,
        due_date: NaiveDate::from_ymd_opt(due.0, due.1, due.2).unwrap(),
        amount,
        bank: BankParams::default(),
    }
}

#[test]
fn test_reference_scenario_day_after_epoch() {
    let out = encode_boleto(&request_for(1, (1997, 10, 8), dec!(10.00))).unwrap();
    let b = &out.result;

    assert_eq!(b.due_date_factor, "0001");
    assert_eq!(b.amount_in_cents, 1000);
    assert_eq!(&b.barcode[9..19], "0000001000");
    assert_eq!(b.barcode.len(), 44);
}

#[test]
fn test_barcode_assembly_order() {
    let out = encode_boleto(&request_for(42, (2024, 1, 15), dec!(1234.56))).unwrap();
    let b = &out.result;

    assert_eq!(&b.barcode[0..3], "237");
    assert_eq!(&b.barcode[3..4], "9");
    assert_eq!(b.barcode.as_bytes()[4] - b'0', b.check_digit);
    assert_eq!(&b.barcode[5..9], b.due_date_factor);
    assert_eq!(&b.barcode[9..19], "0000123456");
    assert_eq!(&b.barcode[19..44], b.free_field);
    assert_eq!(b.free_field, "0900000000042123456789000");
}

#[test]
fn test_check_digit_round_trip_many_documents() {
    for id in [1u64, 7, 999, 12345, 99999999999] {
        let out = encode_boleto(&request_for(id, (2024, 6, 30), dec!(321.09))).unwrap();
        let b = &out.result;

        // Recompute over the 43 non-check digits.
        let stem = format!("{}{}", &b.barcode[..4], &b.barcode[5..]);
        assert_eq!(modulo11::check_digit(&stem), b.check_digit);
        assert!(verify_barcode(&b.barcode).unwrap());
    }
}

#[test]
fn test_typeable_line_matches_barcode_slices() {
    let out = encode_boleto(&request_for(17, (2020, 3, 1), dec!(250.00))).unwrap();
    let b = &out.result;
    let bc = &b.barcode;

    let expected = format!(
        "{}.{} {}.{} {}.{} {} {}",
        &bc[0..5],
        &bc[5..10],
        &bc[10..15],
        &bc[15..21],
        &bc[21..26],
        &bc[26..32],
        &bc[32..33],
        &bc[33..44],
    );
    assert_eq!(b.formatted_line, expected);
}

#[test]
fn test_idempotent_byte_identical_output() {
    let req = request_for(9001, (2024, 12, 24), dec!(99.90));
    let a = encode_boleto(&req).unwrap();
    let b = encode_boleto(&req).unwrap();
    assert_eq!(a.result.barcode, b.result.barcode);
    assert_eq!(a.result.formatted_line, b.result.formatted_line);
}

#[test]
fn test_pre_epoch_due_date_rejected() {
    let err = encode_boleto(&request_for(1, (1997, 10, 6), dec!(10))).unwrap_err();
    assert!(matches!(err, CobaleError::InvalidInput { ref field, .. } if field == "due_date"));
}

#[test]
fn test_factor_range_upper_boundary() {
    // Epoch + 9999 days is the last representable due date.
    let out = encode_boleto(&request_for(1, (2025, 2, 21), dec!(10))).unwrap();
    assert_eq!(out.result.due_date_factor, "9999");

    let err = encode_boleto(&request_for(1, (2025, 2, 22), dec!(10))).unwrap_err();
    assert!(matches!(err, CobaleError::InvalidInput { ref field, .. } if field == "due_date"));
}

#[test]
fn test_negative_amount_rejected() {
    let err = encode_boleto(&request_for(1, (2020, 1, 1), dec!(-0.01))).unwrap_err();
    assert!(matches!(err, CobaleError::InvalidInput { ref field, .. } if field == "amount"));
}

#[test]
fn test_astronomical_amount_errors_instead_of_panicking() {
    // Scaling to cents must not overflow the decimal range; the whole
    // request is rejected as invalid input instead.
    let err = encode_boleto(&request_for(1, (2020, 1, 1), rust_decimal::Decimal::MAX)).unwrap_err();
    assert!(matches!(err, CobaleError::InvalidInput { ref field, .. } if field == "amount"));
}

#[test]
fn test_oversized_identifier_fields_never_truncate() {
    let mut req = request_for(1, (2020, 1, 1), dec!(10));
    req.bank.account = "99999999999999999999".into();
    let err = encode_boleto(&req).unwrap_err();
    assert!(matches!(err, CobaleError::InvalidInput { ref field, .. } if field == "free_field"));
}

#[test]
fn test_bad_bank_code_rejected() {
    for bad in ["23", "2370", "23x"] {
        let mut req = request_for(1, (2020, 1, 1), dec!(10));
        req.bank.bank_code = bad.into();
        let err = encode_boleto(&req).unwrap_err();
        assert!(matches!(err, CobaleError::InvalidInput { ref field, .. } if field == "bank_code"));
    }
}

#[test]
fn test_verify_rejects_malformed_barcodes() {
    assert!(verify_barcode("123").is_err());
    assert!(verify_barcode(&"x".repeat(44)).is_err());
}

#[test]
fn test_verify_detects_single_digit_substitution() {
    let out = encode_boleto(&request_for(314, (2023, 8, 1), dec!(77.70))).unwrap();
    let barcode = out.result.barcode;

    for pos in [0usize, 7, 20, 43] {
        let mut bytes = barcode.clone().into_bytes();
        bytes[pos] = if bytes[pos] == b'9' { b'0' } else { bytes[pos] + 1 };
        let tampered = String::from_utf8(bytes).unwrap();
        if tampered == barcode {
            continue;
        }
        // Weights 2-9 share no factor with 11, so any single substitution
        // outside the check position shifts the weighted sum's residue.
        // The residues 0 and 1 both map to digit 0, which is the one
        // collision this scheme tolerates.
        let still_valid = verify_barcode(&tampered).unwrap();
        if still_valid {
            let stem = format!("{}{}", &tampered[..4], &tampered[5..]);
            assert_eq!(modulo11::check_digit(&stem), barcode.as_bytes()[4] - b'0');
        }
    }
}

#[test]
fn test_amount_rounds_to_nearest_cent() {
    let out = encode_boleto(&request_for(5, (2020, 2, 2), dec!(10.005))).unwrap();
    // Banker's rounding: 1000.5 cents lands on the even neighbour.
    assert_eq!(out.result.amount_in_cents, 1000);

    let out = encode_boleto(&request_for(5, (2020, 2, 2), dec!(10.015))).unwrap();
    assert_eq!(out.result.amount_in_cents, 1002);
}
