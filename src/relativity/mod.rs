//! Lease relativity: the fraction of freehold value a lease retains for a given term

mod table;
pub mod loader;

pub use table::{RelativityTable, MAX_ANCHOR_YEARS};
pub use loader::LoadedRelativity;

use std::sync::OnceLock;

static STANDARD_TABLE: OnceLock<RelativityTable> = OnceLock::new();

/// Shared instance of the built-in curve, built on first use
pub fn standard_table() -> &'static RelativityTable {
    STANDARD_TABLE.get_or_init(RelativityTable::standard)
}

/// Look up the relativity fraction for a remaining term on the built-in curve
pub fn lookup_relativity(remaining_years: i32) -> f64 {
    standard_table().lookup(remaining_years)
}
