//! Lease extension premium: ground rent capitalisation, reversion and marriage value

mod types;
mod discount;
mod calculator;

pub use types::{ValuationInput, PremiumBreakdown};
pub use discount::{DefermentRate, STANDARD_DEFERMENT_RATE_PCT};
pub use calculator::{
    PremiumCalculator,
    MARRIAGE_VALUE_THRESHOLD_YEARS,
    FREEHOLDER_MARRIAGE_SHARE,
};

use crate::error::Result;

/// Compute a premium with the statutory defaults
pub fn compute_premium(input: &ValuationInput, relativity: f64) -> Result<PremiumBreakdown> {
    PremiumCalculator::default().compute(input, relativity)
}
