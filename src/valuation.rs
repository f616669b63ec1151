//! Full lease valuation: relativity, premium and forecast in one call
//!
//! The [`Valuator`] wires the three engine components together using the
//! parameters in [`ValuationConfig`], so the same request always produces the
//! same [`Valuation`].

use serde::{Deserialize, Serialize};
use std::path::Path;
use crate::error::{Result, ValuationError};
use crate::forecast::{ForecastModel, ForecastResult, PropertyType, STANDARD_EXTENSION_YEARS};
use crate::premium::{
    DefermentRate, PremiumBreakdown, PremiumCalculator, ValuationInput,
    MARRIAGE_VALUE_THRESHOLD_YEARS, STANDARD_DEFERMENT_RATE_PCT,
};
use crate::relativity::RelativityTable;

/// Longest cost-of-waiting schedule; beyond this every row sits on the one-year floor
pub const MAX_WAIT_YEARS: u32 = 120;

/// Engine parameters that would otherwise be hard-coded
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValuationConfig {
    /// Deferment rate as a percentage (default: 5%)
    #[serde(default = "default_deferment_rate_pct")]
    pub deferment_rate_pct: f64,

    /// Years added by the extension (default: 90)
    #[serde(default = "default_additional_years")]
    pub additional_years: u32,

    /// Number of years in the cost-of-waiting schedule (default: 3)
    #[serde(default = "default_wait_years")]
    pub wait_years: u32,

    /// Marriage value applies below this term (default: 80)
    #[serde(default = "default_marriage_value_threshold")]
    pub marriage_value_threshold_years: i32,
}

fn default_deferment_rate_pct() -> f64 { STANDARD_DEFERMENT_RATE_PCT }
fn default_additional_years() -> u32 { STANDARD_EXTENSION_YEARS }
fn default_wait_years() -> u32 { 3 }
fn default_marriage_value_threshold() -> i32 { MARRIAGE_VALUE_THRESHOLD_YEARS }

impl Default for ValuationConfig {
    fn default() -> Self {
        Self {
            deferment_rate_pct: default_deferment_rate_pct(),
            additional_years: default_additional_years(),
            wait_years: default_wait_years(),
            marriage_value_threshold_years: default_marriage_value_threshold(),
        }
    }
}

impl ValuationConfig {
    /// Load from a JSON file; missing fields take their defaults
    pub fn from_json_path(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_json_str(&text)?;
        log::info!("Loaded valuation config from {}", path.display());
        Ok(config)
    }

    /// Parse from a JSON string; missing fields take their defaults
    pub fn from_json_str(text: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Check the deferment rate and the schedule length
    pub fn validate(&self) -> Result<()> {
        self.deferment_rate()?;
        check_wait_years(self.wait_years)
    }

    /// Validated deferment rate
    pub fn deferment_rate(&self) -> Result<DefermentRate> {
        DefermentRate::from_pct(self.deferment_rate_pct)
    }
}

/// The four inputs collected from the user
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValuationRequest {
    pub property_value: f64,
    pub remaining_years: i32,
    pub annual_ground_rent: f64,
    pub property_type: PropertyType,
}

/// Everything the presentation layer renders for one request
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Valuation {
    pub request: ValuationRequest,

    /// Relativity at the current remaining term
    pub relativity: f64,

    /// Deferment rate used (percent)
    pub deferment_rate_pct: f64,

    pub premium: PremiumBreakdown,

    pub forecast: ForecastResult,

    /// Value of the existing lease: property value * relativity, whole units
    pub current_lease_value: f64,

    /// Forecast value less current property value
    pub equity_gain: f64,
}

/// One point of the cost-of-waiting schedule
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WaitRow {
    /// Remaining term when the extension would be bought
    pub lease_year: i32,

    /// Total premium at that term
    pub total_cost: f64,
}

/// Valuation facade combining relativity, premium and forecast
#[derive(Debug, Clone)]
pub struct Valuator {
    table: RelativityTable,
    calculator: PremiumCalculator,
    forecast: ForecastModel,
    config: ValuationConfig,
}

impl Valuator {
    /// Create a valuator from a config and relativity table
    pub fn new(config: ValuationConfig, table: RelativityTable) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            calculator: PremiumCalculator::with_threshold(config.marriage_value_threshold_years),
            forecast: ForecastModel::new(config.additional_years),
            table,
            config,
        })
    }

    /// Create a valuator on the built-in relativity curve
    pub fn with_config(config: ValuationConfig) -> Result<Self> {
        Self::new(config, RelativityTable::standard())
    }

    /// Get the active config
    pub fn config(&self) -> &ValuationConfig {
        &self.config
    }

    /// Get the relativity table
    pub fn table(&self) -> &RelativityTable {
        &self.table
    }

    fn premium_input(&self, request: &ValuationRequest, remaining_years: i32, rate_pct: f64) -> ValuationInput {
        ValuationInput {
            property_value: request.property_value,
            remaining_years,
            annual_ground_rent: request.annual_ground_rent,
            deferment_rate_pct: rate_pct,
        }
    }

    /// Value a request with the configured deferment rate
    pub fn value(&self, request: &ValuationRequest) -> Result<Valuation> {
        self.value_at_rate(request, self.config.deferment_rate_pct)
    }

    /// Value a request with an explicit deferment rate
    pub fn value_at_rate(&self, request: &ValuationRequest, deferment_rate_pct: f64) -> Result<Valuation> {
        let input = self.premium_input(request, request.remaining_years, deferment_rate_pct);
        let relativity = self.table.lookup(request.remaining_years);
        let premium = self.calculator.compute(&input, relativity)?;
        let forecast = self.forecast.project(
            request.property_value,
            request.remaining_years,
            request.property_type,
        )?;

        Ok(Valuation {
            request: *request,
            relativity,
            deferment_rate_pct,
            premium,
            current_lease_value: (request.property_value * relativity).round(),
            equity_gain: forecast.forecast_value - request.property_value,
            forecast,
        })
    }

    /// Premium totals if the extension is bought now and in each following year
    ///
    /// The term never drops below one year; once it reaches one year the
    /// remaining rows repeat that term.
    pub fn cost_of_waiting(&self, request: &ValuationRequest, years: u32) -> Result<Vec<WaitRow>> {
        check_wait_years(years)?;
        let rate_pct = self.config.deferment_rate_pct;
        self.premium_input(request, request.remaining_years, rate_pct).validate()?;

        (0..years)
            .map(|offset| {
                let offset = offset.min(i32::MAX as u32) as i32;
                let lease_year = request.remaining_years.saturating_sub(offset).max(1);
                let input = self.premium_input(request, lease_year, rate_pct);
                let premium = self.calculator.compute(&input, self.table.lookup(lease_year))?;
                Ok(WaitRow { lease_year, total_cost: premium.total })
            })
            .collect()
    }
}

fn check_wait_years(years: u32) -> Result<()> {
    if years > MAX_WAIT_YEARS {
        return Err(ValuationError::invalid(
            "wait_years",
            format!("must be <= {}, got {}", MAX_WAIT_YEARS, years),
        ));
    }
    Ok(())
}

impl Default for Valuator {
    fn default() -> Self {
        Self {
            table: RelativityTable::standard(),
            calculator: PremiumCalculator::default(),
            forecast: ForecastModel::default(),
            config: ValuationConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(remaining_years: i32) -> ValuationRequest {
        ValuationRequest {
            property_value: 500_000.0,
            remaining_years,
            annual_ground_rent: 500.0,
            property_type: PropertyType::Flat,
        }
    }

    #[test]
    fn test_default_config() {
        let config = ValuationConfig::default();
        assert_eq!(config.deferment_rate_pct, 5.0);
        assert_eq!(config.additional_years, 90);
        assert_eq!(config.wait_years, 3);
        assert_eq!(config.marriage_value_threshold_years, 80);
    }

    #[test]
    fn test_config_from_partial_json() {
        let config = ValuationConfig::from_json_str(r#"{"deferment_rate_pct": 4.75}"#).unwrap();
        assert_eq!(config.deferment_rate_pct, 4.75);
        assert_eq!(config.additional_years, 90);

        assert!(ValuationConfig::from_json_str(r#"{"deferment_rate_pct": 0}"#).is_err());
        assert!(ValuationConfig::from_json_str("not json").is_err());
    }

    #[test]
    fn test_full_valuation() {
        let valuator = Valuator::default();
        let valuation = valuator.value(&request(70)).unwrap();

        assert_eq!(valuation.relativity, 0.885);
        assert_eq!(valuation.current_lease_value, 442_500.0);
        assert!(valuation.premium.marriage_value > 0.0);
        assert_eq!(valuation.forecast.forecast_value, 540_823.0);
        assert_eq!(valuation.equity_gain, 40_823.0);
        assert_eq!(valuation.forecast.extended_term_years, 160);
    }

    #[test]
    fn test_matches_components() {
        let valuator = Valuator::default();
        let valuation = valuator.value(&request(55)).unwrap();

        let premium = crate::premium::compute_premium(
            &ValuationInput {
                property_value: 500_000.0,
                remaining_years: 55,
                annual_ground_rent: 500.0,
                deferment_rate_pct: 5.0,
            },
            crate::relativity::lookup_relativity(55),
        )
        .unwrap();
        assert_eq!(valuation.premium, premium);
    }

    #[test]
    fn test_value_at_rate() {
        let valuator = Valuator::default();
        let low = valuator.value_at_rate(&request(70), 4.0).unwrap();
        let high = valuator.value_at_rate(&request(70), 6.0).unwrap();

        // Lower deferment rate makes the reversion worth more
        assert!(low.premium.pvc > high.premium.pvc);
        assert_eq!(low.deferment_rate_pct, 4.0);
    }

    #[test]
    fn test_cost_of_waiting() {
        let valuator = Valuator::default();
        let rows = valuator.cost_of_waiting(&request(82), 3).unwrap();

        let years: Vec<i32> = rows.iter().map(|r| r.lease_year).collect();
        assert_eq!(years, vec![82, 81, 80]);

        // Dropping below 80 years brings in marriage value
        let below = valuator.cost_of_waiting(&request(80), 2).unwrap();
        assert!(below[1].total_cost > below[0].total_cost);
    }

    #[test]
    fn test_cost_of_waiting_floors_at_one_year() {
        let valuator = Valuator::default();
        let rows = valuator.cost_of_waiting(&request(2), 4).unwrap();
        let years: Vec<i32> = rows.iter().map(|r| r.lease_year).collect();
        assert_eq!(years, vec![2, 1, 1, 1]);
    }

    #[test]
    fn test_cost_of_waiting_rejects_invalid_term() {
        let valuator = Valuator::default();
        let result = valuator.cost_of_waiting(&request(0), 3);
        assert!(matches!(result, Err(ValuationError::InvalidInput { field: "remaining_years", .. })));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = ValuationConfig {
            deferment_rate_pct: 0.0,
            ..Default::default()
        };
        assert!(Valuator::with_config(config).is_err());
    }

    #[test]
    fn test_wait_years_bounded() {
        let config = ValuationConfig {
            wait_years: MAX_WAIT_YEARS + 1,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ValuationError::InvalidInput { field: "wait_years", .. })));
        assert!(Valuator::with_config(config).is_err());
        assert!(ValuationConfig::from_json_str(r#"{"wait_years": 4000000000}"#).is_err());

        let valuator = Valuator::default();
        assert_eq!(valuator.cost_of_waiting(&request(70), MAX_WAIT_YEARS).unwrap().len(), 120);
        let result = valuator.cost_of_waiting(&request(70), u32::MAX);
        assert!(matches!(result, Err(ValuationError::InvalidInput { field: "wait_years", .. })));
    }
}
