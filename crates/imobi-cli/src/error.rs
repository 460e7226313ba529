//! CLI error types with associated exit codes.
//!
//! [`CliError`] is the top-level error type for the `imobi` binary. Every
//! variant maps to a stable exit code (1 or 2) via [`CliError::exit_code`]:
//!
//! - Exit code **2**: input failure. The input could not be read, or no
//!   usable header, carrier or required column was found in it.
//! - Exit code **1**: logical failure. The input was understood but the
//!   request cannot produce an artifact (bad parameters, everything filtered
//!   out, internal errors).
use std::fmt;
use std::path::PathBuf;

use imobi_core::{ErrorKind, TransformError};

/// All error conditions that the `imobi` CLI can produce.
#[derive(Debug)]
pub enum CliError {
    // --- Exit code 2: input failures ---
    /// A file argument could not be found on the filesystem.
    FileNotFound {
        /// The path that was not found.
        path: PathBuf,
    },

    /// The process lacks permission to read a file.
    PermissionDenied {
        /// The path that could not be read.
        path: PathBuf,
    },

    /// The input exceeds the configured `--max-file-size` limit.
    FileTooLarge {
        /// `-` for stdin, or the filesystem path.
        source: String,
        /// The configured size limit in bytes.
        limit: u64,
        /// The actual size in bytes; `None` for stdin.
        actual: Option<u64>,
    },

    /// An I/O error occurred while reading from stdin.
    StdinReadError {
        /// The underlying I/O error message.
        detail: String,
    },

    /// Any other I/O error, including failures writing the output.
    IoError {
        /// The path or stream involved.
        source: String,
        /// The underlying I/O error message.
        detail: String,
    },

    // --- Exit code 1: logical failures ---
    /// A `--stage` pair or `--stage-map` file could not be understood.
    InvalidStageMap {
        /// What was wrong with it.
        detail: String,
    },

    // --- Exit code 1 or 2, by kind ---
    /// The transform itself failed.
    Transform(TransformError),
}

impl CliError {
    /// Returns the process exit code for this error.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::FileNotFound { .. }
            | Self::PermissionDenied { .. }
            | Self::FileTooLarge { .. }
            | Self::StdinReadError { .. }
            | Self::IoError { .. } => 2,

            Self::InvalidStageMap { .. } => 1,

            Self::Transform(e) => match e.kind() {
                ErrorKind::InputUnreadable
                | ErrorKind::HeaderNotFound
                | ErrorKind::ColumnNotFound
                | ErrorKind::CarrierMissing => 2,
                ErrorKind::ParameterInvalid
                | ErrorKind::EmptyAfterFilter
                | ErrorKind::InternalError => 1,
            },
        }
    }

    /// Returns a human-readable error message suitable for printing to stderr.
    pub fn message(&self) -> String {
        match self {
            Self::FileNotFound { path } => {
                format!("error: file not found: {}", path.display())
            }
            Self::PermissionDenied { path } => {
                format!("error: permission denied: {}", path.display())
            }
            Self::FileTooLarge {
                source,
                limit,
                actual: Some(actual),
            } => {
                format!("error: file too large: {source} is {actual} bytes, limit is {limit} bytes")
            }
            Self::FileTooLarge {
                source,
                limit,
                actual: None,
            } => {
                format!("error: file too large: {source} exceeded limit of {limit} bytes")
            }
            Self::StdinReadError { detail } => {
                format!("error: failed to read stdin: {detail}")
            }
            Self::IoError { source, detail } => {
                format!("error: I/O error on {source}: {detail}")
            }
            Self::InvalidStageMap { detail } => {
                format!("error: invalid stage map: {detail}")
            }
            Self::Transform(e) => format!("error: {}: {e}", e.kind()),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message())
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Transform(e) => Some(e),
            Self::FileNotFound { .. }
            | Self::PermissionDenied { .. }
            | Self::FileTooLarge { .. }
            | Self::StdinReadError { .. }
            | Self::IoError { .. }
            | Self::InvalidStageMap { .. } => None,
        }
    }
}

impl From<TransformError> for CliError {
    fn from(e: TransformError) -> Self {
        Self::Transform(e)
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use imobi_core::ColumnConcept;

    use super::*;

    #[test]
    fn file_not_found_is_exit_2() {
        let e = CliError::FileNotFound {
            path: PathBuf::from("tabela.xlsx"),
        };
        assert_eq!(e.exit_code(), 2);
        assert_eq!(e.message(), "error: file not found: tabela.xlsx");
    }

    #[test]
    fn file_too_large_names_both_sizes() {
        let e = CliError::FileTooLarge {
            source: "big.xlsx".to_owned(),
            limit: 1024,
            actual: Some(2048),
        };
        assert_eq!(e.exit_code(), 2);
        assert!(e.message().contains("2048 bytes, limit is 1024"));
    }

    #[test]
    fn stdin_overflow_has_no_actual_size() {
        let e = CliError::FileTooLarge {
            source: "-".to_owned(),
            limit: 10,
            actual: None,
        };
        assert_eq!(e.message(), "error: file too large: - exceeded limit of 10 bytes");
    }

    #[test]
    fn missing_column_is_an_input_failure() {
        let e = CliError::from(TransformError::ColumnNotFound {
            concept: ColumnConcept::Value,
            available: vec!["UNIDADE".to_owned()],
        });
        assert_eq!(e.exit_code(), 2);
        assert!(e.message().starts_with("error: ColumnNotFound: "));
    }

    #[test]
    fn header_and_carrier_failures_are_exit_2() {
        let header = CliError::from(TransformError::HeaderNotFound {
            scanned: 15,
            threshold: 3,
        });
        let carrier = CliError::from(TransformError::CarrierMissing {
            expected: vec!["QUADRA".to_owned()],
        });
        assert_eq!(header.exit_code(), 2);
        assert_eq!(carrier.exit_code(), 2);
    }

    #[test]
    fn logical_failures_are_exit_1() {
        assert_eq!(CliError::from(TransformError::EmptyAfterFilter).exit_code(), 1);
        let param = CliError::from(TransformError::ParameterInvalid {
            name: "installment_years",
            detail: "must be positive".to_owned(),
        });
        assert_eq!(param.exit_code(), 1);
        assert_eq!(CliError::from(TransformError::internal("xlsx")).exit_code(), 1);
        let stage = CliError::InvalidStageMap {
            detail: "missing '='".to_owned(),
        };
        assert_eq!(stage.exit_code(), 1);
    }

    #[test]
    fn transform_errors_expose_their_source() {
        use std::error::Error as _;
        let e = CliError::from(TransformError::EmptyAfterFilter);
        assert!(e.source().is_some());
        assert!(CliError::StdinReadError { detail: "x".to_owned() }.source().is_none());
    }
}
