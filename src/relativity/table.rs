//! Relativity curve keyed by remaining lease term
//!
//! The curve is stored as sorted `(years, fraction)` anchor points. Between
//! anchors the fraction is linearly interpolated; outside the anchor range the
//! term is clamped to the nearest anchor. On construction the curve is expanded
//! into a per-year vector (index = years) so lookups are a single read.

use crate::error::{Result, ValuationError};
use super::loader::LoadedRelativity;
use std::path::Path;

/// Anchor points of the built-in curve: (remaining years, fraction of freehold value)
///
/// Steep below 80 years, flattening towards 1.0 at 120 years.
const STANDARD_ANCHORS: [(u32, f64); 23] = [
    (1, 0.0600),
    (5, 0.2000),
    (10, 0.3300),
    (15, 0.4200),
    (20, 0.4900),
    (25, 0.5500),
    (30, 0.6000),
    (35, 0.6450),
    (40, 0.6900),
    (45, 0.7300),
    (50, 0.7670),
    (55, 0.8000),
    (60, 0.8300),
    (65, 0.8590),
    (70, 0.8850),
    (75, 0.9100),
    (80, 0.9330),
    (85, 0.9530),
    (90, 0.9680),
    (95, 0.9800),
    (100, 0.9900),
    (110, 0.9970),
    (120, 1.0000),
];

/// Longest term a custom curve may cover before it saturates
pub const MAX_ANCHOR_YEARS: u32 = 999;

/// Lease relativity table with a per-year lookup cache
#[derive(Debug, Clone)]
pub struct RelativityTable {
    /// Sorted anchor points (strictly increasing years)
    anchors: Vec<(u32, f64)>,

    /// Interpolated fraction by year (index = years remaining)
    /// Entries below the first anchor hold the first anchor's fraction
    by_year: Vec<f64>,
}

impl RelativityTable {
    /// Built-in market curve covering 1 to 120 years
    pub fn standard() -> Self {
        Self::build(STANDARD_ANCHORS.to_vec())
    }

    /// Create a table from custom anchor points
    ///
    /// Anchors must contain at least two points with strictly increasing
    /// years (from 1 up to [`MAX_ANCHOR_YEARS`]) and non-decreasing fractions
    /// in (0, 1], ending at 1.0.
    pub fn from_anchors(anchors: Vec<(u32, f64)>) -> Result<Self> {
        validate_anchors(&anchors)?;
        Ok(Self::build(anchors))
    }

    /// Create from loaded CSV anchors
    pub fn from_loaded(loaded: LoadedRelativity) -> Result<Self> {
        Self::from_anchors(loaded.anchors)
    }

    /// Load anchors from a CSV file with a `years,relativity` header
    pub fn from_csv_path(path: &Path) -> Result<Self> {
        Self::from_loaded(LoadedRelativity::load_from(path)?)
    }

    fn build(anchors: Vec<(u32, f64)>) -> Self {
        let max_years = anchors.last().map(|&(y, _)| y).unwrap_or(0);
        let by_year = (0..=max_years)
            .map(|year| interpolate(&anchors, year))
            .collect();
        Self { anchors, by_year }
    }

    /// Shortest term covered by the curve
    pub fn min_years(&self) -> u32 {
        self.anchors.first().map(|&(y, _)| y).unwrap_or(1)
    }

    /// Term at which the curve saturates
    pub fn max_years(&self) -> u32 {
        self.anchors.last().map(|&(y, _)| y).unwrap_or(1)
    }

    /// Get the anchor points
    pub fn anchors(&self) -> &[(u32, f64)] {
        &self.anchors
    }

    /// Relativity fraction for a remaining term
    ///
    /// Terms outside the curve are clamped to the nearest boundary, so
    /// a 999-year lease reads the saturated value and a zero or negative
    /// term reads the shortest anchor.
    pub fn lookup(&self, remaining_years: i32) -> f64 {
        let min = self.min_years() as i64;
        let max = self.max_years() as i64;
        let year = (remaining_years as i64).clamp(min, max);
        if year != remaining_years as i64 {
            log::debug!(
                "relativity lookup clamped {} years to {}",
                remaining_years, year
            );
        }
        self.by_year
            .get(year as usize)
            .copied()
            .unwrap_or_else(|| interpolate(&self.anchors, year as u32))
    }

    /// Full curve, one entry per year across the supported domain
    pub fn curve(&self) -> Vec<(u32, f64)> {
        (self.min_years()..=self.max_years())
            .map(|year| (year, self.by_year[year as usize]))
            .collect()
    }
}

impl Default for RelativityTable {
    fn default() -> Self {
        Self::standard()
    }
}

/// Linear interpolation between the anchors bracketing `year`
fn interpolate(anchors: &[(u32, f64)], year: u32) -> f64 {
    let Some(&(first_year, first_fraction)) = anchors.first() else {
        return 1.0;
    };
    if year <= first_year {
        return first_fraction.clamp(0.0, 1.0);
    }

    for window in anchors.windows(2) {
        let (y0, f0) = window[0];
        let (y1, f1) = window[1];
        if year == y1 {
            return f1.clamp(0.0, 1.0);
        }
        if year < y1 {
            let t = (year - y0) as f64 / (y1 - y0) as f64;
            return (f0 + (f1 - f0) * t).clamp(0.0, 1.0);
        }
    }

    anchors
        .last()
        .map(|&(_, f)| f.clamp(0.0, 1.0))
        .unwrap_or(1.0)
}

fn validate_anchors(anchors: &[(u32, f64)]) -> Result<()> {
    if anchors.len() < 2 {
        return Err(ValuationError::InvalidTable(format!(
            "need at least 2 anchor points, got {}",
            anchors.len()
        )));
    }

    if anchors[0].0 < 1 {
        return Err(ValuationError::InvalidTable(
            "first anchor must be at 1 year or later".to_string(),
        ));
    }

    let (last_year, last_fraction) = anchors[anchors.len() - 1];
    if last_year > MAX_ANCHOR_YEARS {
        return Err(ValuationError::InvalidTable(format!(
            "last anchor at {} years exceeds the {} year limit",
            last_year, MAX_ANCHOR_YEARS
        )));
    }
    if last_fraction != 1.0 {
        return Err(ValuationError::InvalidTable(format!(
            "curve must saturate at 1.0, last anchor at {} years is {}",
            last_year, last_fraction
        )));
    }

    for &(year, fraction) in anchors {
        if !(fraction > 0.0 && fraction <= 1.0) {
            return Err(ValuationError::InvalidTable(format!(
                "fraction at {} years must be in (0, 1], got {}",
                year, fraction
            )));
        }
    }

    for window in anchors.windows(2) {
        let (y0, f0) = window[0];
        let (y1, f1) = window[1];
        if y1 <= y0 {
            return Err(ValuationError::InvalidTable(format!(
                "years must be strictly increasing ({} then {})",
                y0, y1
            )));
        }
        if f1 < f0 {
            return Err(ValuationError::InvalidTable(format!(
                "fraction decreases from {} at {} years to {} at {} years",
                f0, y0, f1, y1
            )));
        }
    }

    Ok(())
}
