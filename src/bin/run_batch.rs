//! Value a CSV of lease extension cases
//!
//! Reads cases with columns
//! `case_id,property_value,remaining_years,annual_ground_rent,property_type`
//! and writes one result row per case. Invalid cases are written with an
//! error message instead of figures so the output lines up with the input.

use anyhow::{Context, Result};
use clap::Parser;
use lease_valuation::{
    PropertyType, RelativityTable, ScenarioRunner, Valuation, ValuationConfig, ValuationRequest,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Instant;

#[derive(Debug, Parser)]
#[command(name = "run_batch", about = "Value a CSV of lease extension cases")]
struct Cli {
    /// Input CSV of cases
    #[arg(long)]
    input: PathBuf,

    /// Output CSV path
    #[arg(long, default_value = "batch_valuation_output.csv")]
    output: PathBuf,

    /// Valuation config JSON
    #[arg(long)]
    config: Option<PathBuf>,

    /// Relativity curve CSV
    #[arg(long)]
    relativity: Option<PathBuf>,
}

/// Raw input row
#[derive(Debug, Deserialize)]
struct CaseRow {
    case_id: String,
    property_value: f64,
    remaining_years: i32,
    annual_ground_rent: f64,
    property_type: String,
}

/// Output row; figures are empty when the case failed
#[derive(Debug, Default, Serialize)]
struct ResultRow {
    case_id: String,
    relativity: Option<f64>,
    marriage_value: Option<f64>,
    grc: Option<f64>,
    pvc: Option<f64>,
    total_premium: Option<f64>,
    forecast_value: Option<f64>,
    value_increase: Option<f64>,
    percent_increase: Option<f64>,
    current_lease_value: Option<f64>,
    error: Option<String>,
}

impl ResultRow {
    fn from_valuation(case_id: String, valuation: &Valuation) -> Self {
        let premium = valuation.premium.rounded();
        Self {
            case_id,
            relativity: Some(valuation.relativity),
            marriage_value: Some(premium.marriage_value),
            grc: Some(premium.grc),
            pvc: Some(premium.pvc),
            total_premium: Some(premium.total),
            forecast_value: Some(valuation.forecast.forecast_value),
            value_increase: Some(valuation.forecast.value_increase),
            percent_increase: Some(valuation.forecast.percent_increase),
            current_lease_value: Some(valuation.current_lease_value),
            error: None,
        }
    }

    fn failed(case_id: String, error: String) -> Self {
        Self {
            case_id,
            error: Some(error),
            ..Default::default()
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let start = Instant::now();

    let config = match &cli.config {
        Some(path) => ValuationConfig::from_json_path(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => ValuationConfig::default(),
    };
    let table = match &cli.relativity {
        Some(path) => RelativityTable::from_csv_path(path)
            .with_context(|| format!("Failed to load relativity curve from {}", path.display()))?,
        None => RelativityTable::standard(),
    };
    let runner = ScenarioRunner::with_config(config, table).context("Invalid valuation config")?;

    let mut reader = csv::Reader::from_path(&cli.input)
        .with_context(|| format!("Failed to open {}", cli.input.display()))?;
    let cases: Vec<CaseRow> = reader
        .deserialize::<CaseRow>()
        .collect::<std::result::Result<Vec<_>, csv::Error>>()
        .with_context(|| format!("Failed to parse cases from {}", cli.input.display()))?;
    println!("Loaded {} cases in {:?}", cases.len(), start.elapsed());

    // Property type errors are reported per case rather than aborting the run
    let mut parsed = Vec::with_capacity(cases.len());
    for case in &cases {
        parsed.push(case.property_type.parse::<PropertyType>().map(|property_type| {
            ValuationRequest {
                property_value: case.property_value,
                remaining_years: case.remaining_years,
                annual_ground_rent: case.annual_ground_rent,
                property_type,
            }
        }));
    }

    let requests: Vec<ValuationRequest> = parsed
        .iter()
        .filter_map(|p| p.as_ref().ok().copied())
        .collect();

    let run_start = Instant::now();
    let mut results = runner.run_batch(&requests).into_iter();
    println!("Valuations complete in {:?}", run_start.elapsed());

    let mut writer = csv::Writer::from_path(&cli.output)
        .with_context(|| format!("Failed to create {}", cli.output.display()))?;
    let mut failures = 0usize;

    for (case, request) in cases.into_iter().zip(parsed) {
        let row = match request {
            Err(e) => ResultRow::failed(case.case_id, e.to_string()),
            Ok(_) => match results.next() {
                Some(Ok(valuation)) => ResultRow::from_valuation(case.case_id, &valuation),
                Some(Err(e)) => ResultRow::failed(case.case_id, e.to_string()),
                None => ResultRow::failed(case.case_id, "missing result".to_string()),
            },
        };
        if row.error.is_some() {
            failures += 1;
        }
        writer.serialize(&row)?;
    }
    writer.flush()?;

    if failures > 0 {
        log::warn!("{} cases failed validation", failures);
    }
    println!("Output written to {}", cli.output.display());
    println!("Total time: {:?}", start.elapsed());

    Ok(())
}
