//! Read-only report data built from a collection snapshot.
//!
//! # Responsibility
//! - Compute report tables (missing UPC list, MSRP averages, full catalog).
//! - Render tabular reports as CSV bytes for download.
//!
//! # Invariants
//! - Reports never mutate the collection or touch the backing file.
//! - Numeric parsing is lenient: values that are not numbers are skipped.

use crate::model::collection::Collection;
use crate::model::record::{Field, RecordId};
use crate::storage::{csv_table, table_from_records, StorageResult, Table};
use std::collections::BTreeMap;

pub mod gallery;

/// Record lacking a UPC barcode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingUpc {
    pub id: RecordId,
    pub name: String,
}

/// Mean MSRP of one release year.
#[derive(Debug, Clone, PartialEq)]
pub struct YearAverage {
    pub year: String,
    /// `None` when no record of the year has a numeric MSRP.
    pub average: Option<f64>,
}

/// Records whose UPC cell is empty, in collection order.
pub fn missing_upc(collection: &Collection) -> Vec<MissingUpc> {
    collection
        .iter()
        .filter(|record| record.upc.trim().is_empty())
        .map(|record| MissingUpc {
            id: record.id.clone(),
            name: record.name.clone(),
        })
        .collect()
}

/// Missing UPC list as CSV with `#,Figure Name` columns.
pub fn missing_upc_csv(collection: &Collection) -> StorageResult<Vec<u8>> {
    let table = Table {
        header: vec![
            Field::Id.column().to_string(),
            Field::Name.column().to_string(),
        ],
        rows: missing_upc(collection)
            .into_iter()
            .map(|item| vec![item.id, item.name])
            .collect(),
    };
    csv_table::encode(&table)
}

/// Average MSRP per year, years in ascending text order.
pub fn average_msrp_by_year(collection: &Collection) -> Vec<YearAverage> {
    let mut totals: BTreeMap<&str, (f64, u32)> = BTreeMap::new();
    for record in collection {
        let slot = totals.entry(record.year.as_str()).or_insert((0.0, 0));
        if let Some(price) = parse_price(&record.msrp) {
            slot.0 += price;
            slot.1 += 1;
        }
    }

    totals
        .into_iter()
        .map(|(year, (sum, count))| YearAverage {
            year: year.to_string(),
            average: (count > 0).then(|| sum / f64::from(count)),
        })
        .collect()
}

/// Full catalog as CSV in backing-file column order.
pub fn catalog_csv(collection: &Collection) -> StorageResult<Vec<u8>> {
    csv_table::encode(&table_from_records(collection))
}

fn parse_price(value: &str) -> Option<f64> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|price| price.is_finite())
}
