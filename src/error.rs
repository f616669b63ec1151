//! Error types for the valuation engine

use thiserror::Error;

/// Errors raised by the valuation engine
///
/// Every failure is deterministic: the same inputs always produce the same
/// error, so callers should fix the input rather than retry.
#[derive(Debug, Error)]
pub enum ValuationError {
    /// An input lies outside the validated numeric domain
    #[error("invalid input `{field}`: {reason}")]
    InvalidInput {
        field: &'static str,
        reason: String,
    },

    /// A relativity table failed validation
    #[error("invalid relativity table: {0}")]
    InvalidTable(String),

    /// A CSV source could not be parsed
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// A file could not be read
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// A configuration file could not be parsed
    #[error("config error: {0}")]
    Config(#[from] serde_json::Error),
}

impl ValuationError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            field,
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ValuationError>;

/// Reject negative or non-finite currency amounts
pub(crate) fn check_currency(field: &'static str, amount: f64) -> Result<()> {
    if !amount.is_finite() {
        return Err(ValuationError::invalid(field, format!("must be finite, got {}", amount)));
    }
    if amount < 0.0 {
        return Err(ValuationError::invalid(field, format!("must be >= 0, got {}", amount)));
    }
    Ok(())
}
