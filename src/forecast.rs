//! Post-extension value forecast
//!
//! Extending a short lease lifts its market value. The uplift is modelled as a
//! two-segment linear curve in the remaining term:
//! - 80 years or less: from 30% at 1 year down to 5% at 80 years
//! - above 80 years: from 5% at 80 years down to 0% at 120 years
//!
//! Houses carry a 5% higher uplift than flats.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use crate::error::{check_currency, Result, ValuationError};

/// Shortest term on the uplift curve
pub const FORECAST_MIN_YEARS: i32 = 1;

/// Term at which the uplift reaches zero
pub const FORECAST_MAX_YEARS: i32 = 120;

/// Term joining the two curve segments
pub const UPLIFT_PIVOT_YEARS: i32 = 80;

/// Uplift at the pivot term (percent)
const PIVOT_UPLIFT_PCT: f64 = 5.0;

/// Uplift at the shortest term (percent)
const MAX_UPLIFT_PCT: f64 = 30.0;

/// Uplift multiplier for houses relative to flats
pub const HOUSE_UPLIFT_MULTIPLIER: f64 = 1.05;

/// Years conventionally added by a statutory lease extension
pub const STANDARD_EXTENSION_YEARS: u32 = 90;

/// Kind of residential property
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PropertyType {
    House,
    #[default]
    Flat,
}

impl PropertyType {
    /// Multiplier applied to the base uplift
    pub fn uplift_multiplier(&self) -> f64 {
        match self {
            PropertyType::House => HOUSE_UPLIFT_MULTIPLIER,
            PropertyType::Flat => 1.0,
        }
    }
}

impl FromStr for PropertyType {
    type Err = ValuationError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "house" => Ok(PropertyType::House),
            "flat" => Ok(PropertyType::Flat),
            other => Err(ValuationError::invalid(
                "property_type",
                format!("expected `house` or `flat`, got `{}`", other),
            )),
        }
    }
}

impl fmt::Display for PropertyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyType::House => write!(f, "House"),
            PropertyType::Flat => write!(f, "Flat"),
        }
    }
}

/// Projected value after extending the lease
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForecastResult {
    /// Value after extension, whole units
    pub forecast_value: f64,

    /// Increase over the current value, whole units
    pub value_increase: f64,

    /// Uplift percentage to one decimal place
    pub percent_increase: f64,

    /// Lease term after the extension (remaining + additional years)
    pub extended_term_years: i64,
}

/// Uplift for terms at or below the pivot
fn lower_segment(years: i32) -> f64 {
    let span = (UPLIFT_PIVOT_YEARS - FORECAST_MIN_YEARS) as f64;
    PIVOT_UPLIFT_PCT
        + ((UPLIFT_PIVOT_YEARS - years) as f64 / span) * (MAX_UPLIFT_PCT - PIVOT_UPLIFT_PCT)
}

/// Uplift for terms above the pivot
fn upper_segment(years: i32) -> f64 {
    let span = (FORECAST_MAX_YEARS - UPLIFT_PIVOT_YEARS) as f64;
    ((FORECAST_MAX_YEARS - years) as f64 / span) * PIVOT_UPLIFT_PCT
}

/// Uplift percentage before the property type multiplier
pub fn base_uplift_percent(remaining_years: i32) -> f64 {
    let years = remaining_years.clamp(FORECAST_MIN_YEARS, FORECAST_MAX_YEARS);
    if years <= UPLIFT_PIVOT_YEARS {
        lower_segment(years)
    } else {
        upper_segment(years)
    }
}

/// Unrounded uplift percentage for a term and property type
pub fn uplift_percent(remaining_years: i32, property_type: PropertyType) -> f64 {
    base_uplift_percent(remaining_years) * property_type.uplift_multiplier()
}

/// Forecast model for post-extension value
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForecastModel {
    /// Years added to the lease by the extension
    pub additional_years: u32,
}

impl ForecastModel {
    pub fn new(additional_years: u32) -> Self {
        Self { additional_years }
    }

    /// Project the value of the property after extension
    pub fn project(
        &self,
        current_value: f64,
        remaining_years: i32,
        property_type: PropertyType,
    ) -> Result<ForecastResult> {
        check_currency("current_value", current_value)?;

        let percent = uplift_percent(remaining_years, property_type);
        let value_increase = (current_value * percent / 100.0).round();
        let forecast_value = (current_value + value_increase).round();

        log::debug!(
            "forecast: value={} years={} type={} -> uplift={:.4}% increase={}",
            current_value, remaining_years, property_type, percent, value_increase
        );

        Ok(ForecastResult {
            forecast_value,
            value_increase,
            percent_increase: (percent * 10.0).round() / 10.0,
            extended_term_years: remaining_years as i64 + self.additional_years as i64,
        })
    }
}

impl Default for ForecastModel {
    fn default() -> Self {
        Self::new(STANDARD_EXTENSION_YEARS)
    }
}

/// Project a forecast without constructing a model
pub fn project_forecast(
    current_value: f64,
    remaining_years: i32,
    property_type: PropertyType,
    additional_years: u32,
) -> Result<ForecastResult> {
    ForecastModel::new(additional_years).project(current_value, remaining_years, property_type)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_segments_meet_at_80_years() {
        assert_eq!(lower_segment(80), 5.0);
        assert_eq!(upper_segment(80), 5.0);
        assert_eq!(base_uplift_percent(80), 5.0);
    }

    #[test]
    fn test_curve_endpoints() {
        assert_eq!(base_uplift_percent(1), 30.0);
        assert_eq!(base_uplift_percent(120), 0.0);
        assert_abs_diff_eq!(base_uplift_percent(81), 4.875, epsilon = 1e-12);
        assert_abs_diff_eq!(base_uplift_percent(100), 2.5, epsilon = 1e-12);
    }

    #[test]
    fn test_clamping() {
        assert_eq!(base_uplift_percent(0), base_uplift_percent(1));
        assert_eq!(base_uplift_percent(-10), 30.0);
        assert_eq!(base_uplift_percent(999), 0.0);
    }

    #[test]
    fn test_uplift_decreases_with_term() {
        let mut previous = f64::MAX;
        for years in 1..=120 {
            let percent = base_uplift_percent(years);
            assert!(percent <= previous, "uplift rose at {} years", years);
            assert!((0.0..=30.0).contains(&percent));
            previous = percent;
        }
    }

    #[test]
    fn test_flat_70_years() {
        // 5 + (10 / 79) * 25 = 8.1646%
        let result = project_forecast(500_000.0, 70, PropertyType::Flat, 90).unwrap();

        assert_eq!(result.value_increase, 40_823.0);
        assert_eq!(result.forecast_value, 540_823.0);
        assert_eq!(result.percent_increase, 8.2);
        assert_eq!(result.extended_term_years, 160);
        assert!(result.percent_increase > 5.0 && result.percent_increase < 30.0);
    }

    #[test]
    fn test_house_uplift_is_five_percent_higher() {
        let flat = uplift_percent(70, PropertyType::Flat);
        let house = uplift_percent(70, PropertyType::House);
        assert_eq!(house, flat * 1.05);

        let result = project_forecast(500_000.0, 70, PropertyType::House, 90).unwrap();
        assert_eq!(result.value_increase, 42_864.0);
        assert_eq!(result.percent_increase, 8.6);
    }

    #[test]
    fn test_result_invariants() {
        let model = ForecastModel::default();
        for &value in &[0.0, 1.0, 99_999.5, 250_000.0, 1_234_567.0] {
            for years in [1, 45, 80, 81, 119, 120, 500] {
                let r = model.project(value, years, PropertyType::Flat).unwrap();
                let percent = uplift_percent(years, PropertyType::Flat);
                assert_eq!(r.value_increase, (value * percent / 100.0).round());
                assert_eq!(r.forecast_value, (value + r.value_increase).round());
            }
        }
    }

    #[test]
    fn test_negative_value_rejected() {
        let result = ForecastModel::default().project(-1.0, 70, PropertyType::Flat);
        assert!(matches!(result, Err(ValuationError::InvalidInput { field: "current_value", .. })));
    }

    #[test]
    fn test_property_type_parsing() {
        assert_eq!("House".parse::<PropertyType>().unwrap(), PropertyType::House);
        assert_eq!(" flat ".parse::<PropertyType>().unwrap(), PropertyType::Flat);
        assert!("maisonette".parse::<PropertyType>().is_err());
        assert_eq!(PropertyType::House.to_string(), "House");
    }
}
