pub mod calculator;
pub mod policy;

pub use calculator::{
    compute_pricing, InstallmentPlan, PricingRequest, PricingResult,
};
pub use policy::{DiscountMode, InterestCap, SettlementPolicy};
