//! Core types for premium calculations

use serde::{Deserialize, Serialize};
use crate::error::{check_currency, Result, ValuationError};
use super::discount::DefermentRate;

/// Inputs to a premium calculation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValuationInput {
    /// Current (unencumbered) property value
    pub property_value: f64,

    /// Whole years left on the existing lease
    pub remaining_years: i32,

    /// Ground rent payable each year
    pub annual_ground_rent: f64,

    /// Deferment rate as a percentage (5.0 for 5%)
    pub deferment_rate_pct: f64,
}

impl ValuationInput {
    /// Check every field against its domain
    ///
    /// Returns the validated deferment rate so callers discount with the
    /// same value that was checked.
    pub fn validate(&self) -> Result<DefermentRate> {
        check_currency("property_value", self.property_value)?;
        check_currency("annual_ground_rent", self.annual_ground_rent)?;
        if self.remaining_years < 1 {
            return Err(ValuationError::invalid(
                "remaining_years",
                format!("must be >= 1, got {}", self.remaining_years),
            ));
        }
        DefermentRate::from_pct(self.deferment_rate_pct)
    }
}

/// Components of a lease extension premium
///
/// All values are held at full precision; use [`PremiumBreakdown::rounded`]
/// for display in whole currency units.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PremiumBreakdown {
    /// Total premium payable: grc + pvc + marriage_value
    pub total: f64,

    /// Freeholder's share of marriage value (zero at 80+ years)
    pub marriage_value: f64,

    /// Ground rent capitalisation
    pub grc: f64,

    /// Present value of the freeholder's reversion
    pub pvc: f64,
}

impl PremiumBreakdown {
    pub(crate) fn from_components(grc: f64, pvc: f64, marriage_value: f64) -> Self {
        Self {
            total: grc + pvc + marriage_value,
            marriage_value,
            grc,
            pvc,
        }
    }

    /// Every component rounded to the nearest whole unit
    pub fn rounded(&self) -> Self {
        Self {
            total: self.total.round(),
            marriage_value: self.marriage_value.round(),
            grc: self.grc.round(),
            pvc: self.pvc.round(),
        }
    }
}
