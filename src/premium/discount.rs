//! Deferment rate handling for premium calculations
//!
//! The freeholder's future interests (ground rent income and the reversion at
//! lease expiry) are valued by discounting annually at the deferment rate.

use serde::{Deserialize, Serialize};
use crate::error::{Result, ValuationError};

/// Standard deferment rate for residential leases (percent)
pub const STANDARD_DEFERMENT_RATE_PCT: f64 = 5.0;

/// Annual deferment rate used to present-value the freeholder's interests
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DefermentRate {
    /// Annual rate as a decimal (0.05 for 5%)
    annual_rate: f64,
}

impl DefermentRate {
    /// Create from a percentage, which must lie strictly between 0 and 100
    pub fn from_pct(pct: f64) -> Result<Self> {
        if !pct.is_finite() || pct <= 0.0 || pct >= 100.0 {
            return Err(ValuationError::invalid(
                "deferment_rate_pct",
                format!("must be in (0, 100), got {}", pct),
            ));
        }
        Ok(Self { annual_rate: pct / 100.0 })
    }

    /// Annual rate as a decimal
    pub fn annual_rate(&self) -> f64 {
        self.annual_rate
    }

    /// Annual rate as a percentage
    pub fn pct(&self) -> f64 {
        self.annual_rate * 100.0
    }

    /// One-year discount factor v = 1 / (1 + r)
    pub fn discount_factor(&self) -> f64 {
        1.0 / (1.0 + self.annual_rate)
    }

    /// Discount factor to `years` from now: (1 + r)^-n
    pub fn discount_to_year(&self, years: u32) -> f64 {
        let n = years.min(i32::MAX as u32) as i32;
        (1.0 + self.annual_rate).powi(-n)
    }

    /// PV of a level annual payment received in arrears for `years`
    ///
    /// amount * (1 - (1 + r)^-n) / r, evaluated through `ln_1p`/`exp_m1` so
    /// very small rates tend to amount * n instead of collapsing to zero
    pub fn pv_annuity(&self, amount: f64, years: u32) -> f64 {
        if amount == 0.0 {
            return 0.0;
        }
        let r = self.annual_rate;
        let annuity_factor = -(-(years as f64) * r.ln_1p()).exp_m1() / r;
        amount * annuity_factor
    }

    /// PV of a single amount receivable after `years`
    pub fn pv_reversion(&self, amount: f64, years: u32) -> f64 {
        amount * self.discount_to_year(years)
    }
}

impl Default for DefermentRate {
    fn default() -> Self {
        Self { annual_rate: STANDARD_DEFERMENT_RATE_PCT / 100.0 }
    }
}
