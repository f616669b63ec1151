//! Lease extension premium calculator
//!
//! The premium is the sum of three components:
//! 1. **Ground rent capitalisation (grc)**: PV of the ground rent the freeholder
//!    gives up over the remaining term
//! 2. **Reversion (pvc)**: PV of the freeholder's right to the unencumbered
//!    property when the lease expires
//! 3. **Marriage value**: the freeholder's share of the value released by
//!    extending the lease, charged only while the term is below the statutory
//!    threshold
//!
//! # Example
//!
//! ```rust
//! use lease_valuation::premium::{PremiumCalculator, ValuationInput};
//! use lease_valuation::relativity::lookup_relativity;
//!
//! let input = ValuationInput {
//!     property_value: 500_000.0,
//!     remaining_years: 70,
//!     annual_ground_rent: 500.0,
//!     deferment_rate_pct: 5.0,
//! };
//! let premium = PremiumCalculator::default()
//!     .compute(&input, lookup_relativity(70))
//!     .unwrap();
//! assert!(premium.marriage_value > 0.0);
//! ```

use serde::{Deserialize, Serialize};
use crate::error::{Result, ValuationError};
use super::types::{PremiumBreakdown, ValuationInput};

/// Remaining term below which marriage value is payable
pub const MARRIAGE_VALUE_THRESHOLD_YEARS: i32 = 80;

/// Share of marriage value payable to the freeholder
pub const FREEHOLDER_MARRIAGE_SHARE: f64 = 0.5;

/// Premium calculator with the statutory marriage value rules
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PremiumCalculator {
    /// Marriage value applies when remaining years < this value
    pub marriage_value_threshold_years: i32,

    /// Fraction of marriage value charged to the leaseholder
    pub freeholder_share: f64,
}

impl PremiumCalculator {
    /// Create a calculator with a custom marriage value threshold
    pub fn with_threshold(marriage_value_threshold_years: i32) -> Self {
        Self {
            marriage_value_threshold_years,
            ..Self::default()
        }
    }

    /// Whether marriage value is charged for this remaining term
    pub fn marriage_value_applies(&self, remaining_years: i32) -> bool {
        remaining_years < self.marriage_value_threshold_years
    }

    /// Compute the premium for `input` given the relativity at its remaining term
    pub fn compute(&self, input: &ValuationInput, relativity: f64) -> Result<PremiumBreakdown> {
        let rate = input.validate()?;
        if !(relativity > 0.0 && relativity <= 1.0) {
            return Err(ValuationError::invalid(
                "relativity",
                format!("must be in (0, 1], got {}", relativity),
            ));
        }

        let years = input.remaining_years as u32;
        let grc = rate.pv_annuity(input.annual_ground_rent, years);
        let pvc = rate.pv_reversion(input.property_value, years);

        let marriage_value = if self.marriage_value_applies(input.remaining_years) {
            let existing_interests = input.property_value * relativity + pvc;
            self.freeholder_share * (input.property_value - existing_interests).max(0.0)
        } else {
            0.0
        };

        let breakdown = PremiumBreakdown::from_components(grc, pvc, marriage_value);
        log::debug!(
            "premium: value={} years={} rent={} rate={}% relativity={:.4} -> grc={:.2} pvc={:.2} mv={:.2} total={:.2}",
            input.property_value,
            input.remaining_years,
            input.annual_ground_rent,
            rate.pct(),
            relativity,
            breakdown.grc,
            breakdown.pvc,
            breakdown.marriage_value,
            breakdown.total,
        );

        Ok(breakdown)
    }
}

impl Default for PremiumCalculator {
    fn default() -> Self {
        Self {
            marriage_value_threshold_years: MARRIAGE_VALUE_THRESHOLD_YEARS,
            freeholder_share: FREEHOLDER_MARRIAGE_SHARE,
        }
    }
}
