//! CSV-based relativity curve loader
//!
//! Loads `(years, relativity)` anchor points from a CSV file with a
//! `years,relativity` header. Rows may appear in any order; they are sorted
//! by term before validation.

use crate::error::Result;
use serde::Deserialize;
use std::io::Read;
use std::path::Path;

/// Path of the shipped relativity curve, relative to the crate root
#[cfg(test)]
const DEFAULT_RELATIVITY_PATH: &str = "data/relativity.csv";

/// Raw CSV row
#[derive(Debug, Deserialize)]
struct CsvRow {
    years: u32,
    relativity: f64,
}

/// Relativity anchors loaded from CSV, sorted by term
#[derive(Debug, Clone)]
pub struct LoadedRelativity {
    pub anchors: Vec<(u32, f64)>,
}

impl LoadedRelativity {
    /// Load the shipped curve
    #[cfg(test)]
    fn load_default() -> Result<Self> {
        Self::load_from(Path::new(DEFAULT_RELATIVITY_PATH))
    }

    /// Load anchors from a specific file
    pub fn load_from(path: &Path) -> Result<Self> {
        let anchors = load_relativity_anchors(path)?;
        log::info!("Loaded {} relativity anchors from {}", anchors.len(), path.display());
        Ok(Self { anchors })
    }
}

/// Load relativity anchors from a CSV file
pub fn load_relativity_anchors(path: &Path) -> Result<Vec<(u32, f64)>> {
    let reader = csv::Reader::from_path(path)?;
    read_anchors(reader)
}

/// Load relativity anchors from any CSV source
pub fn load_relativity_anchors_from_reader<R: Read>(source: R) -> Result<Vec<(u32, f64)>> {
    read_anchors(csv::Reader::from_reader(source))
}

fn read_anchors<R: Read>(mut reader: csv::Reader<R>) -> Result<Vec<(u32, f64)>> {
    let mut anchors = Vec::new();
    for result in reader.deserialize() {
        let row: CsvRow = result?;
        anchors.push((row.years, row.relativity));
    }
    anchors.sort_by_key(|&(years, _)| years);
    Ok(anchors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValuationError;
    use crate::relativity::RelativityTable;

    #[test]
    fn test_load_from_reader_sorts_rows() {
        let data = "years,relativity\n80,0.93\n1,0.06\n120,1.0\n";
        let anchors = load_relativity_anchors_from_reader(data.as_bytes()).unwrap();
        assert_eq!(anchors, vec![(1, 0.06), (80, 0.93), (120, 1.0)]);
    }

    #[test]
    fn test_malformed_row_is_error() {
        let data = "years,relativity\nseventy,0.88\n";
        assert!(load_relativity_anchors_from_reader(data.as_bytes()).is_err());
    }

    #[test]
    fn test_oversized_term_rejected_before_expansion() {
        let data = "years,relativity\n1,0.06\n4000000000,1.0\n";
        let anchors = load_relativity_anchors_from_reader(data.as_bytes()).unwrap();
        let result = RelativityTable::from_loaded(LoadedRelativity { anchors });
        assert!(matches!(result, Err(ValuationError::InvalidTable(_))));
    }

    #[test]
    fn test_missing_file_is_error() {
        assert!(LoadedRelativity::load_from(Path::new("data/does_not_exist.csv")).is_err());
    }

    #[test]
    fn test_default_file_matches_standard_curve() {
        let loaded = LoadedRelativity::load_default();
        assert!(loaded.is_ok(), "Failed to load relativity: {:?}", loaded.err());

        let table = RelativityTable::from_loaded(loaded.unwrap()).unwrap();
        let standard = RelativityTable::standard();
        assert_eq!(table.anchors(), standard.anchors());
    }
}
