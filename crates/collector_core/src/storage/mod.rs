//! Backing-file persistence for the collection table.
//!
//! # Responsibility
//! - Read and write the tabular backing file as CSV or XLSX.
//! - Map between raw string grids and typed records.
//! - Persist the id counter sidecar.
//!
//! # Invariants
//! - Every cell is read and written as text.
//! - Writes go to a sibling temporary file that is renamed over the target,
//!   so readers never observe a half-written file.
//! - The header row is mandatory and must contain the `#` column.

use crate::model::record::{Field, Record};
use log::{error, info};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tempfile::NamedTempFile;

pub mod csv_table;
mod sequence;
mod xlsx_table;

pub use sequence::{read_sequence, sequence_path, write_sequence};

pub type StorageResult<T> = Result<T, StorageError>;

#[derive(Debug)]
pub enum StorageError {
    Io(std::io::Error),
    Csv(csv::Error),
    XlsxRead(calamine::XlsxError),
    XlsxWrite(rust_xlsxwriter::XlsxError),
    /// Data file extension is neither `csv` nor `xlsx`.
    UnsupportedFormat(PathBuf),
    /// File content does not describe a collection table.
    InvalidData(String),
}

impl Display for StorageError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "{err}"),
            Self::Csv(err) => write!(f, "{err}"),
            Self::XlsxRead(err) => write!(f, "{err}"),
            Self::XlsxWrite(err) => write!(f, "{err}"),
            Self::UnsupportedFormat(path) => write!(
                f,
                "unsupported data file `{}`; expected a .csv or .xlsx file",
                path.display()
            ),
            Self::InvalidData(message) => write!(f, "invalid collection data: {message}"),
        }
    }
}

impl Error for StorageError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Csv(err) => Some(err),
            Self::XlsxRead(err) => Some(err),
            Self::XlsxWrite(err) => Some(err),
            Self::UnsupportedFormat(_) | Self::InvalidData(_) => None,
        }
    }
}

impl From<std::io::Error> for StorageError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<csv::Error> for StorageError {
    fn from(value: csv::Error) -> Self {
        Self::Csv(value)
    }
}

impl From<calamine::XlsxError> for StorageError {
    fn from(value: calamine::XlsxError) -> Self {
        Self::XlsxRead(value)
    }
}

impl From<rust_xlsxwriter::XlsxError> for StorageError {
    fn from(value: rust_xlsxwriter::XlsxError) -> Self {
        Self::XlsxWrite(value)
    }
}

/// Raw string grid: one header row plus data rows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// On-disk table encoding, chosen from the data file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableFormat {
    Csv,
    Xlsx,
}

impl TableFormat {
    pub fn from_path(path: &Path) -> StorageResult<Self> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase());

        match extension.as_deref() {
            Some("csv") => Ok(Self::Csv),
            Some("xlsx") => Ok(Self::Xlsx),
            _ => Err(StorageError::UnsupportedFormat(path.to_path_buf())),
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Xlsx => "xlsx",
        }
    }
}

/// Reads the table stored at `path`.
///
/// Returns `Ok(None)` when the file does not exist.
pub fn read_table(path: &Path) -> StorageResult<Option<Table>> {
    let format = TableFormat::from_path(path)?;
    if !path.exists() {
        return Ok(None);
    }

    let started_at = Instant::now();
    let result = match format {
        TableFormat::Csv => csv_table::read(path),
        TableFormat::Xlsx => xlsx_table::read(path),
    };

    match result {
        Ok(table) => {
            info!(
                "event=table_read module=storage status=ok format={} rows={} duration_ms={}",
                format.as_str(),
                table.rows.len(),
                started_at.elapsed().as_millis()
            );
            Ok(Some(table))
        }
        Err(err) => {
            error!(
                "event=table_read module=storage status=error format={} duration_ms={} error={}",
                format.as_str(),
                started_at.elapsed().as_millis(),
                err
            );
            Err(err)
        }
    }
}

/// Replaces the file at `path` with `table`.
pub fn write_table(path: &Path, table: &Table) -> StorageResult<()> {
    let format = TableFormat::from_path(path)?;
    let started_at = Instant::now();

    let result = match format {
        TableFormat::Csv => csv_table::encode(table),
        TableFormat::Xlsx => xlsx_table::encode(table),
    }
    .and_then(|bytes| write_atomically(path, &bytes));

    match &result {
        Ok(()) => info!(
            "event=table_write module=storage status=ok format={} rows={} duration_ms={}",
            format.as_str(),
            table.rows.len(),
            started_at.elapsed().as_millis()
        ),
        Err(err) => error!(
            "event=table_write module=storage status=error format={} duration_ms={} error={}",
            format.as_str(),
            started_at.elapsed().as_millis(),
            err
        ),
    }
    result
}

/// Renders records as a table in backing-file column order.
pub fn table_from_records<'a>(records: impl IntoIterator<Item = &'a Record>) -> Table {
    Table {
        header: Field::ALL
            .into_iter()
            .map(|field| field.column().to_string())
            .collect(),
        rows: records
            .into_iter()
            .map(|record| record.values().map(str::to_string).collect())
            .collect(),
    }
}

/// Maps a raw table onto records, matching columns by header text.
///
/// Missing cells and absent non-id columns become empty strings. Rows whose
/// cells are all blank are skipped.
///
/// # Errors
/// - `InvalidData` when the header row is missing or lacks the `#` column.
pub fn records_from_table(table: &Table) -> StorageResult<Vec<Record>> {
    if table.header.iter().all(|name| name.trim().is_empty()) {
        return Err(StorageError::InvalidData("missing header row".to_string()));
    }

    let columns: Vec<(Field, usize)> = Field::ALL
        .into_iter()
        .filter_map(|field| {
            table
                .header
                .iter()
                .position(|name| name.trim() == field.column())
                .map(|index| (field, index))
        })
        .collect();

    if !columns.iter().any(|(field, _)| *field == Field::Id) {
        return Err(StorageError::InvalidData(format!(
            "header row has no `{}` column",
            Field::Id.column()
        )));
    }

    let records = table
        .rows
        .iter()
        .filter(|row| row.iter().any(|cell| !cell.trim().is_empty()))
        .map(|row| {
            let mut record = Record::default();
            for (field, index) in &columns {
                let value = row.get(*index).map(String::as_str).unwrap_or_default();
                let value = if *field == Field::Id { value.trim() } else { value };
                record.set(*field, value);
            }
            record
        })
        .collect();

    Ok(records)
}

pub(crate) fn write_atomically(path: &Path, bytes: &[u8]) -> StorageResult<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir)?;

    let mut file = NamedTempFile::new_in(dir)?;
    file.write_all(bytes)?;
    file.as_file().sync_all()?;
    file.persist(path).map_err(|err| StorageError::Io(err.error))?;
    Ok(())
}
