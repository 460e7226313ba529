//! Delimited-text input.
//!
//! The separator is sensed from the first line (`;` wins ties with `,`).
//! Fields decode as UTF-8 and fall back to Windows-1252, which is what most
//! spreadsheet software in Brazil still exports.
use std::borrow::Cow;

use csv::ByteRecord;
use encoding_rs::WINDOWS_1252;

use imobi_core::{RawTable, TransformError};

/// UTF-8 byte-order mark.
pub const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Picks `;` or `,` by counting both on the first line.
pub fn sniff_delimiter(bytes: &[u8]) -> u8 {
    let first_line = bytes.split(|b| *b == b'\n').next().unwrap_or_default();
    let semicolons = first_line.iter().filter(|b| **b == b';').count();
    let commas = first_line.iter().filter(|b| **b == b',').count();
    if commas > semicolons { b',' } else { b';' }
}

/// Reads delimited text into a raw table with no header assumed.
///
/// # Errors
///
/// [`TransformError::InputUnreadable`] when the text cannot be tokenized.
pub fn read_delimited(bytes: &[u8]) -> Result<RawTable, TransformError> {
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
    let delimiter = sniff_delimiter(bytes);
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .from_reader(bytes);

    let mut rows: Vec<Vec<String>> = Vec::new();
    let mut record = ByteRecord::new();
    loop {
        match reader.read_byte_record(&mut record) {
            Ok(false) => break,
            Ok(true) => rows.push(record.iter().map(|f| decode_field(f).into_owned()).collect()),
            Err(e) => {
                return Err(TransformError::InputUnreadable {
                    detail: format!("delimited text at record {}: {e}", rows.len() + 1),
                });
            }
        }
    }
    tracing::debug!(
        rows = rows.len(),
        delimiter = %char::from(delimiter),
        "delimited text read"
    );
    Ok(RawTable::new(rows))
}

/// Decodes one field as UTF-8, or as Windows-1252 when it is not valid UTF-8.
fn decode_field(field: &[u8]) -> Cow<'_, str> {
    match std::str::from_utf8(field) {
        Ok(s) => Cow::Borrowed(s),
        Err(_) => {
            let (cow, _, _) = WINDOWS_1252.decode(field);
            cow
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used)]

    use super::*;

    #[test]
    fn semicolon_wins_ties() {
        assert_eq!(sniff_delimiter(b"a;b,c\n1,2,3,4"), b';');
        assert_eq!(sniff_delimiter(b"a,b,c;d\n"), b',');
        assert_eq!(sniff_delimiter(b""), b';');
    }

    #[test]
    fn bom_is_stripped_and_rows_padded() {
        let table = read_delimited(b"\xEF\xBB\xBFUNIDADE;VALOR\n101;1.234,56\n102\n").expect("read");
        assert_eq!(table.cell(0, 0), "UNIDADE");
        assert_eq!(table.cell(1, 1), "1.234,56");
        assert_eq!(table.row(2), ["102", ""]);
    }

    #[test]
    fn latin1_fields_fall_back() {
        let table = read_delimited(b"\xC1REA;VALOR\n").expect("read");
        assert_eq!(table.cell(0, 0), "ÁREA");
    }

    #[test]
    fn comma_files_with_quoted_decimals() {
        let table = read_delimited(b"UNIDADE,VALOR,TIPO\n101,\"1.234,56\",2Q\n").expect("read");
        assert_eq!(table.cell(1, 1), "1.234,56");
    }
}
