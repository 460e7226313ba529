//! ERP import CSV: `;` separator, comma decimals, UTF-8 BOM, no quoting.
//!
//! With quoting disabled, every free-text field is sanitized so a record
//! always stays on one line with a fixed number of fields. Values an ERP or
//! a spreadsheet would otherwise reinterpret (block ids with leading zeros,
//! areas with a unit suffix) are wrapped as `="…"` formulas.
use csv::{QuoteStyle, WriterBuilder};

use crate::csv_input::UTF8_BOM;
use crate::error::EmitError;

/// Column headers of the unit import file.
pub const SIENGE_UNIT_HEADER: [&str; 6] = [
    "BLOCO",
    "UNIDADE",
    "TIPO",
    "AREA PRIVATIVA",
    "FRACAO IDEAL",
    "VALOR",
];

/// Replaces the separator, quote and line-break characters of free text.
pub fn sanitize(s: &str) -> String {
    s.trim()
        .chars()
        .map(|c| match c {
            ';' => ',',
            '"' => '\'',
            '\r' | '\n' => ' ',
            other => other,
        })
        .collect()
}

/// Wraps a sanitized value as `="…"`.
pub fn guard(s: &str) -> String {
    format!("=\"{}\"", sanitize(s).replace('"', "'"))
}

/// Writes `header` and `rows` as BOM-prefixed `;`-separated text.
///
/// Fields are written as given; callers sanitize or guard them first.
///
/// # Errors
///
/// [`EmitError::Csv`] when the writer fails.
pub fn write_csv(header: &[&str], rows: &[Vec<String>]) -> Result<Vec<u8>, EmitError> {
    let mut writer = WriterBuilder::new()
        .delimiter(b';')
        .quote_style(QuoteStyle::Never)
        .flexible(false)
        .from_writer(UTF8_BOM.to_vec());
    writer.write_record(header)?;
    for row in rows {
        writer.write_record(row)?;
    }
    writer.into_inner().map_err(|e| EmitError::Csv {
        detail: e.to_string(),
    })
}
