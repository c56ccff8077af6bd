use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::settlement::policy::{InterestCap, SettlementPolicy};
use crate::{types::*, CobaleError, CobaleResult};

/// Installment counts accepted for a parcelled settlement.
pub const MIN_INSTALLMENTS: u32 = 2;
pub const MAX_INSTALLMENTS: u32 = 24;

// ---------------------------------------------------------------------------
// Input / Output types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricingRequest {
    pub original_amount: Money,
    pub days_overdue: Days,
    pub payment_type: PaymentType,
    /// Only meaningful for installment settlements. Zero means "not given"
    /// and is rejected for installment requests rather than defaulted.
    #[serde(default)]
    pub installment_count: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub down_payment: Option<Money>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricingResult {
    pub original_amount: Money,
    pub days_overdue: Days,
    pub payment_type: PaymentType,
    pub interest_total: Money,
    pub discount_percent: Decimal,
    pub discount_amount: Money,
    pub final_amount: Money,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub installment_plan: Option<InstallmentPlan>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstallmentPlan {
    pub down_payment: Money,
    pub installment_count: u32,
    pub installment_amount: Money,
    pub total_installments_amount: Money,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Price an overdue contract for settlement: simple interest per overdue
/// day, a banded discount on the grown amount, and an installment
/// breakdown when the debtor pays in parcels.
///
/// Every monetary output is rounded to whole cents at assignment and the
/// rounded value feeds the next formula.
pub fn compute_pricing(
    request: &PricingRequest,
    policy: &SettlementPolicy,
) -> CobaleResult<ComputationOutput<PricingResult>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    validate_request(request)?;

    // -- Interest -------------------------------------------------------------
    let accrued = request
        .original_amount
        .checked_mul(policy.daily_interest_rate)
        .and_then(|per_day| per_day.checked_mul(Decimal::from(request.days_overdue)))
        .ok_or_else(|| {
            CobaleError::ArithmeticInconsistency(
                "interest accrual exceeds the decimal range".into(),
            )
        })?;
    let interest_total = match policy.interest_cap {
        InterestCap::Uncapped => round_cents(accrued),
        InterestCap::PrincipalCap => {
            if accrued > request.original_amount {
                warnings.push("Interest capped at 100% of the original amount.".into());
                round_cents(request.original_amount)
            } else {
                round_cents(accrued)
            }
        }
    };
    if interest_total < Decimal::ZERO {
        return Err(CobaleError::ArithmeticInconsistency(format!(
            "negative interest total: {interest_total}"
        )));
    }

    let amount_with_interest = request
        .original_amount
        .checked_add(interest_total)
        .map(round_cents)
        .ok_or_else(|| {
            CobaleError::ArithmeticInconsistency(
                "amount with interest exceeds the decimal range".into(),
            )
        })?;

    // -- Discount -------------------------------------------------------------
    let discount_percent = policy.discount_percent(request.days_overdue, request.payment_type);
    let discount_amount = amount_with_interest
        .checked_mul(discount_percent)
        .map(|scaled| round_cents(scaled / dec!(100)))
        .ok_or_else(|| {
            CobaleError::ArithmeticInconsistency(
                "discount amount exceeds the decimal range".into(),
            )
        })?;

    let final_amount = round_cents(amount_with_interest - discount_amount);
    if final_amount < Decimal::ZERO {
        return Err(CobaleError::ArithmeticInconsistency(format!(
            "negative final amount: {final_amount}"
        )));
    }

    // -- Installment breakdown ------------------------------------------------
    let installment_plan = match request.payment_type {
        PaymentType::Cash => None,
        PaymentType::Installment => Some(build_installment_plan(
            request,
            policy,
            final_amount,
            &mut warnings,
        )?),
    };

    let result = PricingResult {
        original_amount: round_cents(request.original_amount),
        days_overdue: request.days_overdue,
        payment_type: request.payment_type,
        interest_total,
        discount_percent,
        discount_amount,
        final_amount,
        installment_plan,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    let assumptions = serde_json::json!({
        "daily_interest_rate": policy.daily_interest_rate,
        "interest_model": "simple",
        "interest_cap": policy.interest_cap,
        "discount_mode": policy.discount_mode,
        "default_down_payment_rate": policy.default_down_payment_rate,
        "rounding": "2dp banker's, at assignment",
    });

    Ok(with_metadata(
        "Overdue settlement pricing (banded discount schedule)",
        &assumptions,
        warnings,
        elapsed,
        result,
    ))
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

fn validate_request(request: &PricingRequest) -> CobaleResult<()> {
    if request.original_amount < Decimal::ZERO {
        return Err(CobaleError::invalid(
            "original_amount",
            "Original amount cannot be negative.",
        ));
    }
    if request.days_overdue < 0 {
        return Err(CobaleError::invalid(
            "days_overdue",
            "Days overdue cannot be negative.",
        ));
    }
    if request.payment_type == PaymentType::Installment
        && !(MIN_INSTALLMENTS..=MAX_INSTALLMENTS).contains(&request.installment_count)
    {
        return Err(CobaleError::invalid(
            "installment_count",
            format!(
                "Installment settlements require between {MIN_INSTALLMENTS} and {MAX_INSTALLMENTS} parcels."
            ),
        ));
    }
    Ok(())
}

fn build_installment_plan(
    request: &PricingRequest,
    policy: &SettlementPolicy,
    final_amount: Money,
    warnings: &mut Vec<String>,
) -> CobaleResult<InstallmentPlan> {
    let down_payment = match request.down_payment {
        Some(given) if given > Decimal::ZERO => {
            if given >= final_amount {
                return Err(CobaleError::invalid(
                    "down_payment",
                    "Down payment must be less than the final amount.",
                ));
            }
            round_cents(given)
        }
        _ => {
            warnings.push(format!(
                "No down payment given; defaulted to {}% of the final amount.",
                policy.default_down_payment_rate.saturating_mul(dec!(100))
            ));
            final_amount
                .checked_mul(policy.default_down_payment_rate)
                .map(round_cents)
                .ok_or_else(|| {
                    CobaleError::ArithmeticInconsistency(
                        "default down payment exceeds the decimal range".into(),
                    )
                })?
        }
    };

    let count = Decimal::from(request.installment_count);
    let installment_amount = round_cents((final_amount - down_payment) / count);
    let total_installments_amount = round_cents(installment_amount * count);

    Ok(InstallmentPlan {
        down_payment,
        installment_count: request.installment_count,
        installment_amount,
        total_installments_amount,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn cash_request(amount: Decimal, days: Days) -> PricingRequest {
        PricingRequest {
            original_amount: amount,
            days_overdue: days,
            payment_type: PaymentType::Cash,
            installment_count: 0,
            down_payment: None,
        }
    }

    #[test]
    fn test_cash_no_overdue_is_identity() {
        let out = compute_pricing(&cash_request(dec!(1000), 0), &SettlementPolicy::default())
            .unwrap();
        let r = &out.result;
        assert_eq!(r.interest_total, dec!(0));
        assert_eq!(r.discount_percent, dec!(0));
        assert_eq!(r.discount_amount, dec!(0));
        assert_eq!(r.final_amount, dec!(1000));
    }

    #[test]
    fn test_cash_70_days_discount_band() {
        let out = compute_pricing(&cash_request(dec!(1000), 70), &SettlementPolicy::default())
            .unwrap();
        let r = &out.result;
        // 1000 × 0.005 × 70 = 350
        assert_eq!(r.interest_total, dec!(350.00));
        assert_eq!(r.discount_percent, dec!(10));
        assert_eq!(r.discount_amount, dec!(135.00));
        assert_eq!(r.final_amount, dec!(1215.00));
    }

    #[test]
    fn test_installment_defaults_down_payment() {
        let request = PricingRequest {
            original_amount: dec!(1000),
            days_overdue: 0,
            payment_type: PaymentType::Installment,
            installment_count: 10,
            down_payment: None,
        };
        let out = compute_pricing(&request, &SettlementPolicy::default()).unwrap();
        let plan = out.result.installment_plan.as_ref().unwrap();
        assert_eq!(plan.down_payment, dec!(100.00));
        assert_eq!(plan.installment_amount, dec!(90.00));
        assert_eq!(plan.total_installments_amount, dec!(900.00));
        assert!(!out.warnings.is_empty());
    }

    #[test]
    fn test_installment_count_bounds() {
        for count in [0, 1, 25] {
            let request = PricingRequest {
                original_amount: dec!(500),
                days_overdue: 10,
                payment_type: PaymentType::Installment,
                installment_count: count,
                down_payment: None,
            };
            let err = compute_pricing(&request, &SettlementPolicy::default()).unwrap_err();
            assert!(matches!(err, CobaleError::InvalidInput { ref field, .. } if field == "installment_count"));
        }
    }

    #[test]
    fn test_down_payment_at_final_amount_rejected() {
        let request = PricingRequest {
            original_amount: dec!(1000),
            days_overdue: 0,
            payment_type: PaymentType::Installment,
            installment_count: 4,
            down_payment: Some(dec!(1000)),
        };
        let err = compute_pricing(&request, &SettlementPolicy::default()).unwrap_err();
        assert!(matches!(err, CobaleError::InvalidInput { ref field, .. } if field == "down_payment"));
    }

    #[test]
    fn test_principal_cap_engages() {
        let policy = SettlementPolicy {
            interest_cap: InterestCap::PrincipalCap,
            ..SettlementPolicy::default()
        };
        // 0.005 × 250 = 125% of principal without the cap.
        let out = compute_pricing(&cash_request(dec!(1000), 250), &policy).unwrap();
        assert_eq!(out.result.interest_total, dec!(1000.00));
        assert!(out.warnings.iter().any(|w| w.contains("capped")));
    }

    #[test]
    fn test_negative_amount_rejected() {
        let err =
            compute_pricing(&cash_request(dec!(-1), 0), &SettlementPolicy::default()).unwrap_err();
        assert!(matches!(err, CobaleError::InvalidInput { ref field, .. } if field == "original_amount"));
    }
}
