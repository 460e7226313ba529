//! Headerless raw tables, header-row detection and carrier forward-fill.
//!
//! The scanner in `imobi-sheets` turns a workbook or CSV into a [`RawTable`]
//! of trimmed strings with no assumed header. [`scan`] then finds the header
//! row by keyword score and, when the sheet has a merged-cell carrier column
//! (typically `QUADRA`), forward-fills it so every data row below knows its
//! block.
use crate::concept::CARRIER_KEYWORDS;
use crate::error::TransformError;
use crate::record::BlockPrefix;
use crate::text::{is_blank, normalize_for_match};

/// Default number of leading rows inspected for the header.
pub const DEFAULT_SCAN_DEPTH: usize = 15;

/// A rectangular table of cell strings. Blank cells are empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawTable {
    rows: Vec<Vec<String>>,
    width: usize,
}

impl RawTable {
    /// Builds a table, trimming every cell and padding rows to a common width.
    pub fn new(rows: Vec<Vec<String>>) -> Self {
        let width = rows.iter().map(Vec::len).max().unwrap_or(0);
        let rows = rows
            .into_iter()
            .map(|row| {
                let mut cells: Vec<String> = row.into_iter().map(|c| c.trim().to_owned()).collect();
                cells.resize(width, String::new());
                cells
            })
            .collect();
        Self { rows, width }
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns `true` when the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Number of columns.
    pub fn width(&self) -> usize {
        self.width
    }

    /// All rows.
    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// The cells of row `row`, or an empty slice past the end.
    pub fn row(&self, row: usize) -> &[String] {
        self.rows.get(row).map_or(&[][..], Vec::as_slice)
    }

    /// The cell at (`row`, `col`), empty when out of range.
    pub fn cell(&self, row: usize, col: usize) -> &str {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .map_or("", String::as_str)
    }

    /// Copies the last non-blank value of column `col` into the blank cells
    /// below it, for rows `from_row..`.
    pub fn forward_fill(&mut self, col: usize, from_row: usize) {
        let mut last: Option<String> = None;
        for row in self.rows.iter_mut().skip(from_row) {
            let Some(cell) = row.get_mut(col) else {
                continue;
            };
            if is_blank(cell) {
                if let Some(value) = &last {
                    cell.clone_from(value);
                }
            } else {
                last = Some(cell.clone());
            }
        }
    }
}

/// Whether a transform needs a merged-cell carrier column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CarrierRule {
    /// Never look for a carrier.
    Ignore,
    /// Use a carrier when the header row has one.
    Optional,
    /// Fail with [`TransformError::CarrierMissing`] when there is none.
    Required,
}

/// Scanner configuration supplied by each pipeline assembly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanConfig {
    /// Match-form keywords that score a header row.
    pub header_keywords: Vec<&'static str>,
    /// Minimum number of cells that must equal a keyword.
    pub threshold: usize,
    /// Number of leading rows inspected.
    pub scan_depth: usize,
    /// Carrier column handling.
    pub carrier: CarrierRule,
}

/// A merged-cell carrier column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Carrier {
    /// Zero-based column index.
    pub column: usize,
    /// Header text of the column.
    pub header: String,
    /// Block prefix implied by the header.
    pub prefix: BlockPrefix,
}

/// A raw table with its header row located and carrier filled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScannedTable {
    /// The table, carrier column already forward-filled.
    pub table: RawTable,
    /// Zero-based index of the header row.
    pub header_row: usize,
    /// Cells of the header row.
    pub headers: Vec<String>,
    /// The carrier column, when present.
    pub carrier: Option<Carrier>,
}

/// Scores `row` by the number of cells equal to a keyword in match form.
fn header_score(row: &[String], keywords: &[&str]) -> usize {
    row.iter()
        .map(|c| normalize_for_match(c))
        .filter(|c| !c.is_empty() && keywords.contains(&c.as_str()))
        .count()
}

/// Returns the first row within the scan window that reaches the threshold.
///
/// # Errors
///
/// Returns [`TransformError::HeaderNotFound`] when no row qualifies.
pub fn locate_header(table: &RawTable, config: &ScanConfig) -> Result<usize, TransformError> {
    let depth = config.scan_depth.min(table.len());
    (0..depth)
        .find(|&i| header_score(table.row(i), &config.header_keywords) >= config.threshold)
        .ok_or(TransformError::HeaderNotFound {
            scanned: depth,
            threshold: config.threshold,
        })
}

/// Finds the carrier column in the header row, or in the row above it.
pub fn locate_carrier(table: &RawTable, header_row: usize) -> Option<Carrier> {
    let candidates = std::iter::once(header_row).chain(header_row.checked_sub(1));
    for row in candidates {
        for (column, cell) in table.row(row).iter().enumerate() {
            let key = normalize_for_match(cell);
            if CARRIER_KEYWORDS.contains(&key.as_str()) {
                return Some(Carrier {
                    column,
                    header: cell.clone(),
                    prefix: BlockPrefix::from_label(cell),
                });
            }
        }
    }
    None
}

/// Locates the header row and carrier column, then forward-fills the carrier
/// below the header.
///
/// The fill happens on the whole raw frame before any row is classified, so
/// values from visually merged cells reach every row they span.
///
/// # Errors
///
/// [`TransformError::HeaderNotFound`] or, under [`CarrierRule::Required`],
/// [`TransformError::CarrierMissing`].
pub fn scan(mut table: RawTable, config: &ScanConfig) -> Result<ScannedTable, TransformError> {
    let header_row = locate_header(&table, config)?;
    let carrier = match config.carrier {
        CarrierRule::Ignore => None,
        CarrierRule::Optional => locate_carrier(&table, header_row),
        CarrierRule::Required => Some(locate_carrier(&table, header_row).ok_or_else(|| {
            TransformError::CarrierMissing {
                expected: CARRIER_KEYWORDS.iter().map(|k| (*k).to_owned()).collect(),
            }
        })?),
    };
    if let Some(c) = &carrier {
        table.forward_fill(c.column, header_row + 1);
        tracing::debug!(column = c.column, header = %c.header, "carrier column forward-filled");
    }
    let headers = table.row(header_row).to_vec();
    tracing::debug!(header_row, ?headers, "header row located");
    Ok(ScannedTable {
        table,
        header_row,
        headers,
        carrier,
    })
}
