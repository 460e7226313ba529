//! Classified failures of a transform.
//!
//! Every failure a host can observe is one of the seven [`ErrorKind`]s. The
//! scanner and resolver never recover: a missing header row, carrier or
//! required column aborts the transform before anything is emitted.
use std::fmt;

use serde::Serialize;

use crate::concept::ColumnConcept;
use crate::pipeline::PipelineState;

/// All error conditions a transform can end in.
#[derive(Debug, thiserror::Error)]
pub enum TransformError {
    /// The input is not a recognizable workbook or delimited text file.
    #[error("input unreadable: {detail}")]
    InputUnreadable {
        /// What the reader reported.
        detail: String,
    },

    /// No row within the scan window reached the header keyword threshold.
    #[error(
        "header row not found in the first {scanned} row(s): no row matched at least \
         {threshold} of the expected column names"
    )]
    HeaderNotFound {
        /// Number of rows inspected.
        scanned: usize,
        /// Keyword matches required for a row to count as the header.
        threshold: usize,
    },

    /// A required concept has no resolvable header.
    #[error("column not found: {concept}; available headers: [{}]", .available.join(", "))]
    ColumnNotFound {
        /// The concept that failed to bind.
        concept: ColumnConcept,
        /// Non-blank headers present in the input.
        available: Vec<String>,
    },

    /// The merged-cell carrier column could not be located.
    #[error("carrier column not found: expected one of [{}] in the header row", .expected.join(", "))]
    CarrierMissing {
        /// Keywords that were searched for.
        expected: Vec<String>,
    },

    /// A numeric parameter is out of range.
    #[error("invalid parameter {name}: {detail}")]
    ParameterInvalid {
        /// Parameter name as the host knows it.
        name: &'static str,
        /// Why it was rejected.
        detail: String,
    },

    /// Every row was filtered out.
    #[error("no rows left after filtering")]
    EmptyAfterFilter,

    /// Anything else, with a captured backtrace for the host to log.
    #[error("internal error: {detail}")]
    Internal {
        /// What went wrong.
        detail: String,
        /// Backtrace captured where the error was raised.
        trace: String,
    },
}

/// The classification of a [`TransformError`], without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// See [`TransformError::InputUnreadable`].
    InputUnreadable,
    /// See [`TransformError::HeaderNotFound`].
    HeaderNotFound,
    /// See [`TransformError::ColumnNotFound`].
    ColumnNotFound,
    /// See [`TransformError::CarrierMissing`].
    CarrierMissing,
    /// See [`TransformError::ParameterInvalid`].
    ParameterInvalid,
    /// See [`TransformError::EmptyAfterFilter`].
    EmptyAfterFilter,
    /// See [`TransformError::Internal`].
    InternalError,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::InputUnreadable => "InputUnreadable",
            Self::HeaderNotFound => "HeaderNotFound",
            Self::ColumnNotFound => "ColumnNotFound",
            Self::CarrierMissing => "CarrierMissing",
            Self::ParameterInvalid => "ParameterInvalid",
            Self::EmptyAfterFilter => "EmptyAfterFilter",
            Self::InternalError => "InternalError",
        })
    }
}

impl TransformError {
    /// Builds an [`TransformError::Internal`] capturing the current backtrace.
    pub fn internal(detail: impl Into<String>) -> Self {
        Self::Internal {
            detail: detail.into(),
            trace: std::backtrace::Backtrace::force_capture().to_string(),
        }
    }

    /// Returns the classification of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InputUnreadable { .. } => ErrorKind::InputUnreadable,
            Self::HeaderNotFound { .. } => ErrorKind::HeaderNotFound,
            Self::ColumnNotFound { .. } => ErrorKind::ColumnNotFound,
            Self::CarrierMissing { .. } => ErrorKind::CarrierMissing,
            Self::ParameterInvalid { .. } => ErrorKind::ParameterInvalid,
            Self::EmptyAfterFilter => ErrorKind::EmptyAfterFilter,
            Self::Internal { .. } => ErrorKind::InternalError,
        }
    }

    /// Maps this error onto the error state the pipeline ends in, given the
    /// state it was in when the error was raised.
    pub fn failed_state(&self, during: PipelineState) -> PipelineState {
        match self {
            Self::InputUnreadable { .. }
            | Self::HeaderNotFound { .. }
            | Self::CarrierMissing { .. } => PipelineState::HeaderError,
            Self::ColumnNotFound { .. } => PipelineState::ColumnError,
            Self::ParameterInvalid { .. } | Self::EmptyAfterFilter | Self::Internal { .. } => {
                match during {
                    PipelineState::Emitting => PipelineState::EmitError,
                    PipelineState::Idle
                    | PipelineState::Reading
                    | PipelineState::Scanned
                    | PipelineState::Resolved
                    | PipelineState::Classified
                    | PipelineState::Grouped
                    | PipelineState::Done
                    | PipelineState::HeaderError
                    | PipelineState::ColumnError
                    | PipelineState::EmitError
                    | PipelineState::Failed => PipelineState::Failed,
                }
            }
        }
    }
}
