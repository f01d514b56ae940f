//! CSV encoding of the collection table.

use super::{StorageError, StorageResult, Table};
use std::path::Path;

/// Reads a CSV file; the first record is the header row.
///
/// Short and long rows are accepted and normalized by the record mapping.
pub fn read(path: &Path) -> StorageResult<Table> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)?;

    let header = reader
        .headers()?
        .iter()
        .map(|name| name.trim().to_string())
        .collect();

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result?;
        rows.push(record.iter().map(str::to_string).collect());
    }

    Ok(Table { header, rows })
}

/// Encodes a table as CSV bytes, quoting cells only when needed.
pub fn encode(table: &Table) -> StorageResult<Vec<u8>> {
    let mut writer = csv::WriterBuilder::new()
        .flexible(true)
        .from_writer(Vec::new());

    writer.write_record(&table.header)?;
    for row in &table.rows {
        writer.write_record(row)?;
    }

    writer
        .into_inner()
        .map_err(|err| StorageError::Io(err.into_error()))
}
