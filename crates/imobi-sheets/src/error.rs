//! Errors produced while writing output artifacts.
use std::fmt;

use imobi_core::TransformError;
use rust_xlsxwriter::XlsxError;

/// All error conditions of the workbook and CSV emitters.
///
/// Emission either completes or returns one of these; no partial bytes ever
/// leave the emitter. At the crate boundary every variant becomes a
/// [`TransformError::Internal`].
#[derive(Debug)]
pub enum EmitError {
    /// `rust_xlsxwriter` rejected a write or could not serialize the workbook.
    Workbook {
        /// Human-readable description of the error.
        detail: String,
    },

    /// The CSV writer failed.
    Csv {
        /// Human-readable description of the error.
        detail: String,
    },

    /// A row or column index exceeds the worksheet limits.
    OutOfBounds {
        /// Which index overflowed and its value.
        detail: String,
    },
}

impl fmt::Display for EmitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Workbook { detail } => write!(f, "workbook write failed: {detail}"),
            Self::Csv { detail } => write!(f, "CSV write failed: {detail}"),
            Self::OutOfBounds { detail } => write!(f, "worksheet index out of bounds: {detail}"),
        }
    }
}

impl std::error::Error for EmitError {}

impl From<XlsxError> for EmitError {
    fn from(e: XlsxError) -> Self {
        Self::Workbook {
            detail: e.to_string(),
        }
    }
}

impl From<csv::Error> for EmitError {
    fn from(e: csv::Error) -> Self {
        Self::Csv {
            detail: e.to_string(),
        }
    }
}

impl From<EmitError> for TransformError {
    fn from(e: EmitError) -> Self {
        TransformError::internal(e.to_string())
    }
}
