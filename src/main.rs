//! Lease Valuation CLI
//!
//! Command-line interface for valuing a single lease extension and inspecting
//! the relativity curve

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use lease_valuation::{
    PropertyType, RelativityTable, ScenarioRunner, Valuation, ValuationConfig,
    ValuationRequest, WaitRow,
};
use serde::Serialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Parser)]
#[command(name = "lease_valuation", version, about = "Lease extension premium and value calculator")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Value a single lease extension
    Value(ValueArgs),
    /// Print the relativity curve year by year
    Table(TableArgs),
}

#[derive(Debug, Args)]
struct TableArgs {
    /// Relativity curve CSV (years,relativity); defaults to the built-in curve
    #[arg(long)]
    relativity: Option<PathBuf>,
}

#[derive(Debug, Args)]
struct ValueArgs {
    /// Current property value
    #[arg(long)]
    value: f64,

    /// Remaining lease term in whole years
    #[arg(long, allow_hyphen_values = true)]
    years: i32,

    /// Annual ground rent
    #[arg(long, default_value_t = 0.0)]
    ground_rent: f64,

    /// Property type: house or flat
    #[arg(long, default_value = "flat", value_parser = parse_property_type)]
    property_type: PropertyType,

    /// Deferment rate in percent (overrides config)
    #[arg(long)]
    deferment_rate: Option<f64>,

    /// Years added by the extension (overrides config)
    #[arg(long)]
    additional_years: Option<u32>,

    /// Years in the cost-of-waiting schedule (overrides config)
    #[arg(long)]
    wait_years: Option<u32>,

    /// Print the result as JSON
    #[arg(long)]
    json: bool,

    /// Relativity curve CSV (years,relativity); defaults to the built-in curve
    #[arg(long)]
    relativity: Option<PathBuf>,

    /// Valuation config JSON; missing fields take defaults
    #[arg(long)]
    config: Option<PathBuf>,
}

fn parse_property_type(s: &str) -> std::result::Result<PropertyType, String> {
    s.parse().map_err(|e: lease_valuation::ValuationError| e.to_string())
}

/// JSON output for the `value` command
#[derive(Debug, Serialize)]
struct ValueReport<'a> {
    valuation: &'a Valuation,
    cost_of_waiting: &'a [WaitRow],
}

fn load_config(path: Option<&Path>) -> Result<ValuationConfig> {
    match path {
        Some(path) => ValuationConfig::from_json_path(path)
            .with_context(|| format!("Failed to load config from {}", path.display())),
        None => Ok(ValuationConfig::default()),
    }
}

fn load_table(path: Option<&Path>) -> Result<RelativityTable> {
    match path {
        Some(path) => RelativityTable::from_csv_path(path)
            .with_context(|| format!("Failed to load relativity curve from {}", path.display())),
        None => Ok(RelativityTable::standard()),
    }
}

fn run_value(args: ValueArgs) -> Result<()> {
    let mut config = load_config(args.config.as_deref())?;
    if let Some(rate) = args.deferment_rate {
        config.deferment_rate_pct = rate;
    }
    if let Some(years) = args.additional_years {
        config.additional_years = years;
    }
    if let Some(years) = args.wait_years {
        config.wait_years = years;
    }

    let table = load_table(args.relativity.as_deref())?;
    let runner = ScenarioRunner::with_config(config, table).context("Invalid valuation config")?;

    let request = ValuationRequest {
        property_value: args.value,
        remaining_years: args.years,
        annual_ground_rent: args.ground_rent,
        property_type: args.property_type,
    };

    let valuation = runner.run(&request).context("Valuation failed")?;
    let waiting = runner.cost_of_waiting(&request).context("Cost of waiting failed")?;

    if args.json {
        let report = ValueReport {
            valuation: &valuation,
            cost_of_waiting: &waiting,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    print_valuation(&valuation, &waiting);
    Ok(())
}

fn print_valuation(valuation: &Valuation, waiting: &[WaitRow]) {
    let request = &valuation.request;
    let premium = valuation.premium.rounded();
    let forecast = &valuation.forecast;

    println!("Lease Extension Valuation");
    println!("=========================\n");

    println!("Property: {}", request.property_type);
    println!("  Current Value:     {:>14.0}", request.property_value);
    println!("  Remaining Term:    {:>14} yrs", request.remaining_years);
    println!("  Ground Rent:       {:>14.0} /yr", request.annual_ground_rent);
    println!("  Deferment Rate:    {:>13.2}%", valuation.deferment_rate_pct);
    println!("  Relativity:        {:>14.4}", valuation.relativity);
    println!("  Lease Value:       {:>14.0}", valuation.current_lease_value);
    println!();

    println!("Premium:");
    println!("  Marriage Value:    {:>14.0}", premium.marriage_value);
    println!("  Ground Rent Comp:  {:>14.0}", premium.grc);
    println!("  Reversion (PVC):   {:>14.0}", premium.pvc);
    println!("  {}", "-".repeat(33));
    println!("  Total Premium:     {:>14.0}", premium.total);
    println!();

    println!("After Extension:");
    println!("  New Lease Term:    {:>14} yrs", forecast.extended_term_years);
    println!("  Value Increase:    {:>14.0} ({:.1}%)", forecast.value_increase, forecast.percent_increase);
    println!("  Forecast Value:    {:>14.0}", forecast.forecast_value);
    println!("  Equity Gain:       {:>14.0}", valuation.equity_gain);

    if !waiting.is_empty() {
        println!("\nCost of Waiting:");
        println!("  {:>10} {:>14}", "Term (yrs)", "Premium");
        for row in waiting {
            println!("  {:>10} {:>14.0}", row.lease_year, row.total_cost);
        }
    }
}

fn run_table(args: TableArgs) -> Result<()> {
    let table = load_table(args.relativity.as_deref())?;

    println!("{:>6} {:>10}", "Years", "Relativity");
    println!("{}", "-".repeat(17));
    for (years, fraction) in table.curve() {
        println!("{:>6} {:>10.4}", years, fraction);
    }
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    match cli.command {
        Command::Value(args) => run_value(args),
        Command::Table(args) => run_table(args),
    }
}
