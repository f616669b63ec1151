//! Lease Valuation - premium and value engine for residential lease extensions
//!
//! This library provides:
//! - Lease relativity curve (fraction of freehold value by remaining term)
//! - Lease extension premium (ground rent capitalisation, reversion, marriage value)
//! - Post-extension value forecast by term and property type
//! - A valuation facade and batch scenario runner
//!
//! Valuation operations are pure functions of their inputs. File I/O is limited
//! to loading relativity curves and configs.

pub mod error;
pub mod relativity;
pub mod premium;
pub mod forecast;
pub mod valuation;
pub mod scenario;

// Re-export commonly used types
pub use error::ValuationError;
pub use relativity::{RelativityTable, lookup_relativity};
pub use premium::{PremiumCalculator, PremiumBreakdown, ValuationInput, compute_premium};
pub use forecast::{ForecastModel, ForecastResult, PropertyType, project_forecast};
pub use valuation::{Valuation, ValuationConfig, ValuationRequest, Valuator, WaitRow};
pub use scenario::ScenarioRunner;
