//! Cell formats shared by every styled workbook.
//!
//! Tables get a medium perimeter: the header row carries the medium top, the
//! last data row the medium bottom, and the first and last columns the medium
//! sides. Inner borders are thin. Data rows alternate white and gray.
use rust_xlsxwriter::{Color, Format, FormatAlign, FormatBorder};

use crate::export::table::CellKind;

/// Excel number format for currency cells.
pub const CURRENCY_NUM_FORMAT: &str = "\"R$ \"#,##0.00";

/// Excel number format that keeps a cell as text.
pub const TEXT_NUM_FORMAT: &str = "@";

const ZEBRA_GRAY: Color = Color::RGB(0x00D9_D9D9);
const HEADER_FILL: Color = Color::RGB(0x00BF_BFBF);
const STAGE_FILL: Color = Color::RGB(0x00A6_A6A6);
const BLOCK_FILL: Color = Color::RGB(0x00F2_F2F2);

/// Position of a cell inside a table, for perimeter borders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edges {
    /// First column of the table.
    pub first_col: bool,
    /// Last column of the table.
    pub last_col: bool,
    /// Last data row of the table.
    pub last_row: bool,
}

impl Edges {
    /// Edges of column `col` in a table of `width` columns.
    pub fn of(col: usize, width: usize, last_row: bool) -> Self {
        Self {
            first_col: col == 0,
            last_col: col + 1 == width,
            last_row,
        }
    }
}

fn sides(mut format: Format, edges: Edges) -> Format {
    if edges.first_col {
        format = format.set_border_left(FormatBorder::Medium);
    }
    if edges.last_col {
        format = format.set_border_right(FormatBorder::Medium);
    }
    format
}

/// The sheet title band.
pub fn title() -> Format {
    Format::new()
        .set_bold()
        .set_font_size(14)
        .set_align(FormatAlign::Center)
        .set_align(FormatAlign::VerticalCenter)
}

/// A merged stage-title row.
pub fn stage_title() -> Format {
    Format::new()
        .set_bold()
        .set_align(FormatAlign::Center)
        .set_align(FormatAlign::VerticalCenter)
        .set_background_color(STAGE_FILL)
        .set_border_top(FormatBorder::Medium)
        .set_border_bottom(FormatBorder::Medium)
        .set_border_left(FormatBorder::Medium)
        .set_border_right(FormatBorder::Medium)
}

/// A merged block-title row.
pub fn block_title() -> Format {
    Format::new()
        .set_bold()
        .set_align(FormatAlign::Center)
        .set_background_color(BLOCK_FILL)
        .set_border(FormatBorder::Medium)
}

/// A column-header cell.
pub fn header(edges: Edges) -> Format {
    let format = Format::new()
        .set_bold()
        .set_align(FormatAlign::Center)
        .set_align(FormatAlign::VerticalCenter)
        .set_text_wrap()
        .set_background_color(HEADER_FILL)
        .set_border_top(FormatBorder::Medium)
        .set_border_bottom(FormatBorder::Thin)
        .set_border_left(FormatBorder::Thin)
        .set_border_right(FormatBorder::Thin);
    sides(format, edges)
}

/// A data cell. `odd` selects the gray zebra band.
pub fn data(kind: CellKind, edges: Edges, odd: bool) -> Format {
    let mut format = Format::new()
        .set_align(FormatAlign::Center)
        .set_border(FormatBorder::Thin);
    format = match kind {
        CellKind::Currency => format.set_num_format(CURRENCY_NUM_FORMAT),
        CellKind::Text => format.set_num_format(TEXT_NUM_FORMAT),
    };
    if odd {
        format = format.set_background_color(ZEBRA_GRAY);
    }
    if edges.last_row {
        format = format.set_border_bottom(FormatBorder::Medium);
    }
    sides(format, edges)
}
