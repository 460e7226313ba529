//! The sectioned price-table workbook.
//!
//! Merges are written before any styled cell of the same sheet and carry
//! their format on every cell of the range, so borders and fills cover the
//! whole band and not only its anchor.
use rust_xlsxwriter::{Format, Workbook, Worksheet};

use crate::error::EmitError;
use crate::export::layout::{OutputLayout, RowKind, StageSection};
use crate::export::style;
use crate::export::table::{Column, set_widths, write_data_row, write_header};
use crate::export::{col_num, row_num};

/// Title of the sheet's top band.
pub const PRICE_TABLE_TITLE: &str = "TABELA DE PREÇOS";

/// Builds a sectioned workbook with one sheet named `sheet_name`.
///
/// # Errors
///
/// [`EmitError`] when `rust_xlsxwriter` rejects a write or cannot serialize.
pub fn write_sectioned_workbook(
    sheet_name: &str,
    title: &str,
    columns: &[Column],
    stages: &[StageSection],
) -> Result<Vec<u8>, EmitError> {
    let layout = OutputLayout::plan(stages);
    let mut wb = Workbook::new();
    let ws = wb.add_worksheet();
    ws.set_name(sheet_name)?;
    set_widths(ws, columns)?;

    let width = columns.len();
    for (row, kind) in layout.rows().iter().enumerate() {
        match *kind {
            RowKind::Title => band(ws, row, width, title, &style::title())?,
            RowKind::StageTitle { stage } => {
                let text = stages.get(stage).map_or("", |s| s.title.as_str());
                band(ws, row, width, text, &style::stage_title())?;
            }
            RowKind::BlockTitle { stage, block } => {
                let text = stages
                    .get(stage)
                    .and_then(|s| s.blocks.get(block))
                    .map_or("", |b| b.title.as_str());
                band(ws, row, width, text, &style::block_title())?;
            }
            RowKind::Blank | RowKind::Header | RowKind::Data { .. } => {}
        }
    }

    for (row, kind) in layout.rows().iter().enumerate() {
        match *kind {
            RowKind::Header => write_header(ws, row, columns)?,
            RowKind::Data {
                stage,
                block,
                offset,
                last,
            } => {
                let cells = stages
                    .get(stage)
                    .and_then(|s| s.blocks.get(block))
                    .and_then(|b| b.rows.get(offset))
                    .map_or(&[][..], Vec::as_slice);
                write_data_row(ws, row, columns, cells, offset, last)?;
            }
            RowKind::Blank
            | RowKind::Title
            | RowKind::StageTitle { .. }
            | RowKind::BlockTitle { .. } => {}
        }
    }

    tracing::debug!(rows = layout.len(), stages = stages.len(), "sectioned workbook laid out");
    Ok(wb.save_to_buffer()?)
}

/// Writes a merged band across all `width` columns of `row`.
fn band(
    ws: &mut Worksheet,
    row: usize,
    width: usize,
    text: &str,
    format: &Format,
) -> Result<(), EmitError> {
    let r = row_num(row)?;
    if width <= 1 {
        ws.write_string_with_format(r, 0, text, format)?;
    } else {
        ws.merge_range(r, 0, r, col_num(width - 1)?, text, format)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used)]

    use std::io::Cursor;

    use calamine::{Data, Reader, Xlsx, open_workbook_from_rs};

    use super::*;
    use crate::export::layout::BlockSection;
    use crate::export::table::Cell;

    #[test]
    fn bands_are_merged_and_values_placed() {
        let columns = [Column::text("UNIDADE", 10.0), Column::currency("VALOR", 20.0)];
        let stages = [StageSection {
            title: "ETAPA 01".to_owned(),
            blocks: vec![BlockSection {
                title: "BLOCO 01".to_owned(),
                rows: vec![vec![Cell::text("BL01 - APT 01"), Cell::Currency(123_456.78)]],
            }],
        }];
        let bytes =
            write_sectioned_workbook("TABELA", PRICE_TABLE_TITLE, &columns, &stages).expect("write");
        let mut wb: Xlsx<_> = open_workbook_from_rs(Cursor::new(bytes)).expect("open");
        let range = wb.worksheet_range("TABELA").expect("sheet");
        let text = |r: u32, c: u32| {
            if let Some(Data::String(s)) = range.get_value((r, c)) {
                s.clone()
            } else {
                String::new()
            }
        };
        assert_eq!(text(2, 0), PRICE_TABLE_TITLE);
        assert_eq!(text(4, 0), "ETAPA 01");
        assert_eq!(text(6, 0), "BLOCO 01");
        assert_eq!(text(8, 1), "VALOR");
        assert_eq!(range.get_value((9, 1)), Some(&Data::Float(123_456.78)));

        wb.load_merged_regions().expect("merge info");
        assert_eq!(wb.merged_regions_by_sheet("TABELA").len(), 3);
    }
}
