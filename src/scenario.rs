//! Scenario runner for batch valuations
//!
//! Prepares the relativity curve and config once, then values many requests
//! (in parallel for batches) without rebuilding the engine.

use rayon::prelude::*;
use crate::error::Result;
use crate::relativity::RelativityTable;
use crate::valuation::{Valuation, ValuationConfig, ValuationRequest, Valuator, WaitRow};

/// Pre-built scenario runner
///
/// # Example
/// ```
/// use lease_valuation::{ScenarioRunner, ValuationRequest, PropertyType};
///
/// let runner = ScenarioRunner::new();
/// let request = ValuationRequest {
///     property_value: 500_000.0,
///     remaining_years: 70,
///     annual_ground_rent: 500.0,
///     property_type: PropertyType::Flat,
/// };
///
/// // Deferment rate sensitivity
/// let results = runner.run_rates(&request, &[4.5, 5.0, 5.5]);
/// assert_eq!(results.len(), 3);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ScenarioRunner {
    valuator: Valuator,
}

impl ScenarioRunner {
    /// Create runner with the default config and built-in curve
    pub fn new() -> Self {
        Self::default()
    }

    /// Create runner with a custom config and relativity table
    pub fn with_config(config: ValuationConfig, table: RelativityTable) -> Result<Self> {
        Ok(Self {
            valuator: Valuator::new(config, table)?,
        })
    }

    /// Create runner around an existing valuator
    pub fn with_valuator(valuator: Valuator) -> Self {
        Self { valuator }
    }

    /// Value a single request
    pub fn run(&self, request: &ValuationRequest) -> Result<Valuation> {
        self.valuator.value(request)
    }

    /// Value many requests in parallel; results keep the input order
    pub fn run_batch(&self, requests: &[ValuationRequest]) -> Vec<Result<Valuation>> {
        log::info!("Valuing batch of {} requests", requests.len());
        requests
            .par_iter()
            .map(|request| self.valuator.value(request))
            .collect()
    }

    /// Value one request under several deferment rates
    pub fn run_rates(&self, request: &ValuationRequest, rates_pct: &[f64]) -> Vec<Result<Valuation>> {
        rates_pct
            .iter()
            .map(|&rate| self.valuator.value_at_rate(request, rate))
            .collect()
    }

    /// Cost-of-waiting schedule over the configured number of years
    pub fn cost_of_waiting(&self, request: &ValuationRequest) -> Result<Vec<WaitRow>> {
        self.valuator
            .cost_of_waiting(request, self.valuator.config().wait_years)
    }

    /// Get reference to the valuator
    pub fn valuator(&self) -> &Valuator {
        &self.valuator
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forecast::PropertyType;

    fn request(remaining_years: i32, property_value: f64) -> ValuationRequest {
        ValuationRequest {
            property_value,
            remaining_years,
            annual_ground_rent: 250.0,
            property_type: PropertyType::House,
        }
    }

    #[test]
    fn test_batch_preserves_order() {
        let runner = ScenarioRunner::new();
        let requests: Vec<_> = (1..=150)
            .map(|years| request(years, 300_000.0 + years as f64 * 1_000.0))
            .collect();

        let results = runner.run_batch(&requests);
        assert_eq!(results.len(), requests.len());

        for (request, result) in requests.iter().zip(&results) {
            let valuation = result.as_ref().unwrap();
            assert_eq!(valuation.request, *request);
            assert_eq!(valuation, &runner.run(request).unwrap());
        }
    }

    #[test]
    fn test_batch_reports_invalid_requests_individually() {
        let runner = ScenarioRunner::new();
        let results = runner.run_batch(&[request(70, 400_000.0), request(0, 400_000.0)]);

        assert!(results[0].is_ok());
        assert!(results[1].is_err());
    }

    #[test]
    fn test_run_rates() {
        let runner = ScenarioRunner::new();
        let results = runner.run_rates(&request(65, 400_000.0), &[4.0, 5.0, 6.0, 0.0]);

        let pvc: Vec<f64> = results[..3]
            .iter()
            .map(|r| r.as_ref().unwrap().premium.pvc)
            .collect();
        assert!(pvc[0] > pvc[1] && pvc[1] > pvc[2]);
        assert!(results[3].is_err());
    }

    #[test]
    fn test_cost_of_waiting_uses_config_years() {
        let config = ValuationConfig {
            wait_years: 5,
            ..Default::default()
        };
        let runner = ScenarioRunner::with_config(config, RelativityTable::standard()).unwrap();
        let rows = runner.cost_of_waiting(&request(70, 400_000.0)).unwrap();
        assert_eq!(rows.len(), 5);
        assert_eq!(rows[4].lease_year, 66);
    }
}
