//! Tabular cells and the plain styled workbook.
use rust_xlsxwriter::{Format, Workbook, Worksheet};

use crate::error::EmitError;
use crate::export::style::{self, Edges};
use crate::export::{col_num, row_num};

/// How a column's cells are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellKind {
    /// Text with the `@` number format.
    Text,
    /// Numbers with the currency number format.
    Currency,
}

/// One output column.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    /// Header text.
    pub title: String,
    /// Column width in character units.
    pub width: f64,
    /// How data cells are written.
    pub kind: CellKind,
}

impl Column {
    /// A text column.
    pub fn text(title: impl Into<String>, width: f64) -> Self {
        Self {
            title: title.into(),
            width,
            kind: CellKind::Text,
        }
    }

    /// A currency column.
    pub fn currency(title: impl Into<String>, width: f64) -> Self {
        Self {
            title: title.into(),
            width,
            kind: CellKind::Currency,
        }
    }
}

/// A formatted output cell.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    /// Text, already formatted.
    Text(String),
    /// A currency amount written as a number.
    Currency(f64),
    /// Nothing, styled like its neighbours.
    Blank,
}

impl Cell {
    /// Text cell, or [`Cell::Blank`] for an empty string.
    pub fn text(s: impl Into<String>) -> Self {
        let s = s.into();
        if s.is_empty() { Self::Blank } else { Self::Text(s) }
    }

    /// Currency cell, or [`Cell::Blank`] when absent.
    pub fn currency(amount: Option<f64>) -> Self {
        amount.map_or(Self::Blank, Self::Currency)
    }
}

/// One output row.
pub type Row = Vec<Cell>;

/// Sets the width of every column.
pub fn set_widths(ws: &mut Worksheet, columns: &[Column]) -> Result<(), EmitError> {
    for (i, column) in columns.iter().enumerate() {
        ws.set_column_width(col_num(i)?, column.width)?;
    }
    Ok(())
}

/// Writes `cell` at (`row`, `col`) with `format`.
pub fn write_cell(
    ws: &mut Worksheet,
    row: usize,
    col: usize,
    cell: &Cell,
    format: &Format,
) -> Result<(), EmitError> {
    let (r, c) = (row_num(row)?, col_num(col)?);
    match cell {
        Cell::Text(s) => ws.write_string_with_format(r, c, s, format)?,
        Cell::Currency(v) => ws.write_number_with_format(r, c, *v, format)?,
        Cell::Blank => ws.write_blank(r, c, format)?,
    };
    Ok(())
}

/// Writes the column-header row at `row`.
pub fn write_header(ws: &mut Worksheet, row: usize, columns: &[Column]) -> Result<(), EmitError> {
    let width = columns.len();
    for (col, column) in columns.iter().enumerate() {
        let format = style::header(Edges::of(col, width, false));
        ws.write_string_with_format(row_num(row)?, col_num(col)?, &column.title, &format)?;
    }
    Ok(())
}

/// Writes data row `offset` of a table at sheet row `row`.
///
/// Cells past the end of `cells` are written blank so the perimeter and
/// zebra band stay continuous.
pub fn write_data_row(
    ws: &mut Worksheet,
    row: usize,
    columns: &[Column],
    cells: &[Cell],
    offset: usize,
    last: bool,
) -> Result<(), EmitError> {
    let width = columns.len();
    for (col, column) in columns.iter().enumerate() {
        let format = style::data(column.kind, Edges::of(col, width, last), offset % 2 == 1);
        let cell = cells.get(col).unwrap_or(&Cell::Blank);
        write_cell(ws, row, col, cell, &format)?;
    }
    Ok(())
}

/// Builds a one-sheet workbook: header on row 1, data below.
///
/// # Errors
///
/// [`EmitError`] when `rust_xlsxwriter` rejects a write or cannot serialize.
pub fn write_table_workbook(
    sheet_name: &str,
    columns: &[Column],
    rows: &[Row],
) -> Result<Vec<u8>, EmitError> {
    let mut wb = Workbook::new();
    let ws = wb.add_worksheet();
    ws.set_name(sheet_name)?;
    set_widths(ws, columns)?;
    write_header(ws, 0, columns)?;
    for (offset, cells) in rows.iter().enumerate() {
        write_data_row(ws, offset + 1, columns, cells, offset, offset + 1 == rows.len())?;
    }
    ws.set_freeze_panes(1, 0)?;
    Ok(wb.save_to_buffer()?)
}
