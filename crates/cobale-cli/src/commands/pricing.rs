use clap::{Args, ValueEnum};
use rust_decimal::Decimal;
use serde_json::Value;

use cobale_core::settlement::{
    compute_pricing, DiscountMode, InterestCap, PricingRequest, SettlementPolicy,
};
use cobale_core::PaymentType;

use crate::input;

#[derive(Debug, Clone, ValueEnum)]
pub enum PaymentTypeArg {
    Cash,
    Installment,
}

impl From<PaymentTypeArg> for PaymentType {
    fn from(arg: PaymentTypeArg) -> Self {
        match arg {
            PaymentTypeArg::Cash => PaymentType::Cash,
            PaymentTypeArg::Installment => PaymentType::Installment,
        }
    }
}

/// Arguments for settlement pricing
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct PricingArgs {
    /// Path to JSON/YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Original contract amount
    #[arg(long)]
    pub original_amount: Option<Decimal>,

    /// Days the contract is overdue
    #[arg(long)]
    pub days_overdue: Option<i64>,

    /// How the settlement is paid
    #[arg(long, value_enum)]
    pub payment_type: Option<PaymentTypeArg>,

    /// Number of parcels (installment settlements only, 2-24)
    #[arg(long, default_value_t = 0)]
    pub installments: u32,

    /// Down payment (defaults to 10% of the final amount)
    #[arg(long)]
    pub down_payment: Option<Decimal>,

    /// Override the daily interest rate (decimal, e.g. 0.005)
    #[arg(long)]
    pub daily_rate: Option<Decimal>,

    /// Cap interest at 100% of the original amount
    #[arg(long)]
    pub cap_interest: bool,

    /// Prorate discounts within bands instead of flat per-band rates
    #[arg(long)]
    pub prorated_discount: bool,
}

pub fn run_pricing(args: PricingArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let request: PricingRequest = if let Some(ref path) = args.input {
        input::file::read_request(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        PricingRequest {
            original_amount: args
                .original_amount
                .ok_or("--original-amount is required (or provide --input)")?,
            days_overdue: args
                .days_overdue
                .ok_or("--days-overdue is required (or provide --input)")?,
            payment_type: args
                .payment_type
                .clone()
                .ok_or("--payment-type is required (or provide --input)")?
                .into(),
            installment_count: args.installments,
            down_payment: args.down_payment,
        }
    };

    let mut policy = SettlementPolicy::default();
    if let Some(rate) = args.daily_rate {
        policy.daily_interest_rate = rate;
    }
    if args.cap_interest {
        policy.interest_cap = InterestCap::PrincipalCap;
    }
    if args.prorated_discount {
        policy.discount_mode = DiscountMode::Prorated;
    }

    let output = compute_pricing(&request, &policy)?;
    Ok(serde_json::to_value(&output)?)
}
