//! Headerless reading of the first worksheet of a workbook.
//!
//! Every cell becomes a string: whole floats print without a fractional part,
//! dates print as `dd/mm/yyyy`, errors and empties become `""`. No row is
//! treated as a header here; header detection happens on the resulting
//! [`RawTable`].
use std::io::Cursor;

use calamine::{Data, Range, Reader, open_workbook_auto_from_rs};
use chrono::Timelike as _;

use imobi_core::{RawTable, TransformError};

/// Reads the first worksheet of an xlsx, xls or ods workbook.
///
/// # Errors
///
/// [`TransformError::InputUnreadable`] when the bytes are not a workbook or
/// the workbook has no worksheet.
pub fn read_workbook(bytes: &[u8]) -> Result<RawTable, TransformError> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes)).map_err(|e| {
        TransformError::InputUnreadable {
            detail: e.to_string(),
        }
    })?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| TransformError::InputUnreadable {
            detail: "workbook has no worksheets".to_owned(),
        })?
        .map_err(|e| TransformError::InputUnreadable {
            detail: format!("failed to read the first worksheet: {e}"),
        })?;
    let table = range_to_table(&range);
    tracing::debug!(rows = table.len(), width = table.width(), "worksheet read");
    Ok(table)
}

/// Converts a worksheet range into a raw table anchored at `A1`.
///
/// `calamine` trims leading empty rows and columns from a range; they are
/// restored so row numbers in diagnostics match the spreadsheet.
pub fn range_to_table(range: &Range<Data>) -> RawTable {
    let (first_row, first_col) = range.start().unwrap_or((0, 0));
    let mut rows: Vec<Vec<String>> = vec![Vec::new(); first_row as usize];
    for row in range.rows() {
        let mut cells = vec![String::new(); first_col as usize];
        cells.extend(row.iter().map(cell_to_string));
        rows.push(cells);
    }
    RawTable::new(rows)
}

/// Converts a `calamine::Data` cell to a trimmed `String`.
///
/// Returns an empty string for empty or error cells.
pub fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::String(s) => s.trim().to_owned(),
        Data::Float(f) => {
            // Whole values print as integers: `101`, not `101.0`.
            if *f == f.floor() && f.abs() < 1e15 {
                format!("{}", *f as i64)
            } else {
                f.to_string()
            }
        }
        Data::Int(i) => i.to_string(),
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(value) if value.num_seconds_from_midnight() == 0 => {
                value.format("%d/%m/%Y").to_string()
            }
            Some(value) => value.format("%d/%m/%Y %H:%M").to_string(),
            None => dt.as_f64().to_string(),
        },
        Data::DateTimeIso(s) => s.clone(),
        Data::DurationIso(s) => s.clone(),
        Data::Error(_) => String::new(),
        Data::Empty => String::new(),
    }
}
