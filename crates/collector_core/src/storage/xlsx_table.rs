//! XLSX encoding of the collection table.
//!
//! Only the first worksheet is read. Numeric cells are rendered the way a
//! spreadsheet displays them, so `2025.0` reads back as `"2025"`.

use super::{StorageError, StorageResult, Table};
use calamine::{open_workbook, Data, Reader, Xlsx};
use rust_xlsxwriter::Workbook;
use std::path::Path;

const SHEET_NAME: &str = "Collection";

pub fn read(path: &Path) -> StorageResult<Table> {
    let mut workbook: Xlsx<_> = open_workbook(path)?;
    let range = match workbook.worksheet_range_at(0) {
        Some(range) => range?,
        None => return Ok(Table::default()),
    };

    let mut rows = range.rows();
    let header = match rows.next() {
        Some(cells) => cells
            .iter()
            .map(|cell| cell_text(cell).trim().to_string())
            .collect(),
        None => Vec::new(),
    };
    let rows = rows
        .map(|cells| cells.iter().map(cell_text).collect())
        .collect();

    Ok(Table { header, rows })
}

pub fn encode(table: &Table) -> StorageResult<Vec<u8>> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(SHEET_NAME)?;

    for (col, name) in table.header.iter().enumerate() {
        worksheet.write_string(0, column_index(col)?, name.as_str())?;
    }
    for (row_index, row) in table.rows.iter().enumerate() {
        let row_number = u32::try_from(row_index + 1)
            .map_err(|_| StorageError::InvalidData("too many rows for xlsx".to_string()))?;
        for (col, value) in row.iter().enumerate() {
            if value.is_empty() {
                continue;
            }
            worksheet.write_string(row_number, column_index(col)?, value.as_str())?;
        }
    }

    Ok(workbook.save_to_buffer()?)
}

fn column_index(col: usize) -> StorageResult<u16> {
    u16::try_from(col)
        .map_err(|_| StorageError::InvalidData("too many columns for xlsx".to_string()))
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(value) => value.clone(),
        Data::Float(value) => number_text(*value),
        Data::Int(value) => value.to_string(),
        Data::Bool(value) => String::from(if *value { "True" } else { "False" }),
        other => other.to_string(),
    }
}

fn number_text(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}
