use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::types::{Days, PaymentType, Rate};

/// Default daily simple-interest rate: 0.5% per overdue day.
pub const DEFAULT_DAILY_RATE: Decimal = dec!(0.005);

/// Default down payment when none is supplied: 10% of the final amount.
pub const DEFAULT_DOWN_PAYMENT_RATE: Decimal = dec!(0.10);

/// Discount bands keyed on overdue-day counts. Each entry is
/// (first day of band, cash %, installment %). The first band grants no
/// discount under any policy mode.
const DISCOUNT_BANDS: [(Days, Decimal, Decimal); 4] = [
    (0, dec!(0), dec!(0)),
    (60, dec!(10), dec!(0)),
    (100, dec!(15), dec!(5)),
    (151, dec!(30), dec!(15)),
];

/// Whether interest accrual is clamped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterestCap {
    /// Interest grows without bound (historical calculator behavior).
    #[default]
    Uncapped,
    /// Interest never exceeds 100% of the original amount.
    PrincipalCap,
}

/// How the discount percentage is derived within a band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscountMode {
    /// Flat per-band percentage (historical calculator behavior).
    #[default]
    Flat,
    /// Linear interpolation from the band's entry rate toward the next
    /// band's entry rate, by position within the band. The zero-discount
    /// band stays at zero.
    Prorated,
}

/// Tunable pricing policy. The historical calculator hard-coded several
/// incompatible variants of these values; they are explicit configuration
/// here and every result names the active policy in its assumptions.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SettlementPolicy {
    pub daily_interest_rate: Rate,
    pub interest_cap: InterestCap,
    pub discount_mode: DiscountMode,
    pub default_down_payment_rate: Rate,
}

impl Default for SettlementPolicy {
    fn default() -> Self {
        Self {
            daily_interest_rate: DEFAULT_DAILY_RATE,
            interest_cap: InterestCap::default(),
            discount_mode: DiscountMode::default(),
            default_down_payment_rate: DEFAULT_DOWN_PAYMENT_RATE,
        }
    }
}

impl SettlementPolicy {
    /// Discount percentage (0-100 scale) for the given overdue-day count
    /// and payment type, under this policy's discount mode.
    pub fn discount_percent(&self, days_overdue: Days, payment_type: PaymentType) -> Decimal {
        let band = DISCOUNT_BANDS
            .iter()
            .rposition(|(from, _, _)| days_overdue >= *from)
            .unwrap_or(0);

        let rate_of = |idx: usize| match payment_type {
            PaymentType::Cash => DISCOUNT_BANDS[idx].1,
            PaymentType::Installment => DISCOUNT_BANDS[idx].2,
        };

        let entry = rate_of(band);
        match self.discount_mode {
            DiscountMode::Flat => entry,
            DiscountMode::Prorated => {
                // No interpolation in the zero band or past the last one.
                if band == 0 || band + 1 >= DISCOUNT_BANDS.len() {
                    return entry;
                }
                let from = DISCOUNT_BANDS[band].0;
                let next_from = DISCOUNT_BANDS[band + 1].0;
                let span = Decimal::from(next_from - from);
                let position = Decimal::from(days_overdue - from);
                let next_entry = rate_of(band + 1);
                entry + (next_entry - entry) * position / span
            }
        }
    }
}
