//! Output writers: styled workbooks and ERP CSV.
//!
//! Writers take fully formatted rows; no parsing or grouping happens here.
//! Each writer builds its artifact in memory and returns the bytes only when
//! the whole artifact was produced.
pub mod csv;
pub mod layout;
pub mod price_table;
pub mod style;
pub mod table;

use rust_xlsxwriter::{ColNum, RowNum};

use crate::error::EmitError;

/// Converts a zero-based row index into a worksheet row number.
pub(crate) fn row_num(row: usize) -> Result<RowNum, EmitError> {
    RowNum::try_from(row).map_err(|_| EmitError::OutOfBounds {
        detail: format!("row {row}"),
    })
}

/// Converts a zero-based column index into a worksheet column number.
pub(crate) fn col_num(col: usize) -> Result<ColNum, EmitError> {
    ColNum::try_from(col).map_err(|_| EmitError::OutOfBounds {
        detail: format!("column {col}"),
    })
}
