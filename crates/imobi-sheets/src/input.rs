//! Input format sniffing.
use imobi_core::{RawTable, TransformError};

use crate::csv_input::read_delimited;
use crate::sheet::read_workbook;

/// Zip local-file header: xlsx and ods.
const ZIP_MAGIC: &[u8] = b"PK\x03\x04";

/// OLE2 compound document: legacy xls.
const OLE_MAGIC: &[u8] = b"\xD0\xCF\x11\xE0\xA1\xB1\x1A\xE1";

/// Container format of an input, decided by its leading bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    /// Zip container (xlsx, ods).
    Zip,
    /// OLE2 compound document (xls).
    Ole,
    /// Anything else is read as delimited text.
    Text,
}

impl InputFormat {
    /// Sniffs the format from magic bytes.
    pub fn sniff(bytes: &[u8]) -> Self {
        if bytes.starts_with(ZIP_MAGIC) {
            Self::Zip
        } else if bytes.starts_with(OLE_MAGIC) {
            Self::Ole
        } else {
            Self::Text
        }
    }
}

/// Reads any supported input into a raw table.
///
/// # Errors
///
/// [`TransformError::InputUnreadable`] for empty input, binary data that is
/// not a workbook, or a workbook the reader rejects.
pub fn read_table(bytes: &[u8]) -> Result<RawTable, TransformError> {
    if bytes.is_empty() {
        return Err(TransformError::InputUnreadable {
            detail: "input is empty".to_owned(),
        });
    }
    let format = InputFormat::sniff(bytes);
    tracing::debug!(?format, size = bytes.len(), "reading input");
    match format {
        InputFormat::Zip | InputFormat::Ole => read_workbook(bytes),
        InputFormat::Text if bytes.contains(&0) => Err(TransformError::InputUnreadable {
            detail: "binary data that is neither a workbook nor delimited text".to_owned(),
        }),
        InputFormat::Text => read_delimited(bytes),
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used)]

    use super::*;

    #[test]
    fn sniffs_magic_bytes() {
        assert_eq!(InputFormat::sniff(b"PK\x03\x04rest"), InputFormat::Zip);
        assert_eq!(InputFormat::sniff(OLE_MAGIC), InputFormat::Ole);
        assert_eq!(InputFormat::sniff(b"UNIDADE;VALOR"), InputFormat::Text);
    }

    #[test]
    fn empty_and_binary_inputs_are_unreadable() {
        assert!(matches!(
            read_table(b""),
            Err(TransformError::InputUnreadable { .. })
        ));
        assert!(matches!(
            read_table(b"\x00\x01\x02"),
            Err(TransformError::InputUnreadable { .. })
        ));
    }

    #[test]
    fn text_goes_to_the_delimited_reader() {
        let table = read_table(b"UNIDADE;VALOR\n").expect("read");
        assert_eq!(table.width(), 2);
    }
}
