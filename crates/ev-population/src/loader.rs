//! CSV population loader.
//!
//! # CSV format
//!
//! One row per district.  `region` is a list of `x y` vertices separated by
//! `;`; several rings are separated by `|`.
//!
//! ```csv
//! label,quantity,region
//! north,120,0 0;400 0;400 300;0 300
//! harbour,35,500 0;700 0;700 150 | 800 0;900 0;900 80
//! ```
//!
//! Coordinates are in the same projected plane as the street network.

use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use ev_spatial::Region;

use crate::{PopulationError, PopulationRecord};

// ── CSV record ────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct PopulationRow {
    label:    String,
    quantity: u32,
    region:   String,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Load population records from a CSV file, in file order.
pub fn load_records_csv(path: &Path) -> Result<Vec<PopulationRecord>, PopulationError> {
    let file = std::fs::File::open(path).map_err(PopulationError::Io)?;
    load_records_reader(file)
}

/// Like [`load_records_csv`] but accepts any `Read` source.
pub fn load_records_reader<R: Read>(reader: R) -> Result<Vec<PopulationRecord>, PopulationError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut records = Vec::new();
    for (line, result) in csv_reader.deserialize::<PopulationRow>().enumerate() {
        let row = result.map_err(|e| PopulationError::Parse(e.to_string()))?;
        let region: Region = row.region.parse().map_err(|e| {
            PopulationError::Parse(format!("row {} ({}): {e}", line + 1, row.label))
        })?;
        records.push(PopulationRecord::new(row.label, row.quantity, region));
    }
    Ok(records)
}
