//! Per-row findings collected while a transform runs.
//!
//! Diagnostics never abort a transform; they travel back to the host next to
//! the output bytes. Row numbers are 1-based, matching what a spreadsheet
//! user sees in the row gutter.
use std::fmt;

use serde::Serialize;

/// How serious a finding is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Input was dropped or reinterpreted.
    Warning,
    /// Informational only.
    Info,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Warning => f.write_str("Warning"),
            Self::Info => f.write_str("Info"),
        }
    }
}

/// Machine-readable identifier of a finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticCode {
    /// A data row appeared before any stage title.
    RowWithoutStage,
    /// A data row appeared before any block title or carrier value.
    RowWithoutBlock,
    /// A block is missing from the caller's block-to-stage map.
    UnmappedBlock,
    /// A block title was followed by no data rows.
    EmptyBlock,
    /// A per-block header did not resolve; the sheet header stays in effect.
    LocalHeaderIgnored,
    /// A value that should be numeric was not.
    NotNumeric,
    /// A lot area was re-read with its separator as thousands.
    LotAreaReinterpreted,
    /// The entry exceeds the value, so nothing is left to finance.
    NothingToFinance,
    /// A row was removed by a caller-supplied filter.
    Filtered,
}

impl DiagnosticCode {
    /// Returns the snake-case code used in serialized output.
    pub fn code(self) -> &'static str {
        match self {
            Self::RowWithoutStage => "row_without_stage",
            Self::RowWithoutBlock => "row_without_block",
            Self::UnmappedBlock => "unmapped_block",
            Self::EmptyBlock => "empty_block",
            Self::LocalHeaderIgnored => "local_header_ignored",
            Self::NotNumeric => "not_numeric",
            Self::LotAreaReinterpreted => "lot_area_reinterpreted",
            Self::NothingToFinance => "nothing_to_finance",
            Self::Filtered => "filtered",
        }
    }
}

/// A single finding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    /// How serious the finding is.
    pub severity: Severity,
    /// Machine-readable identifier.
    pub code: DiagnosticCode,
    /// 1-based input row, when the finding concerns a row.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub row: Option<usize>,
    /// Human-readable description.
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.row {
            Some(row) => write!(f, "row {row}: {}", self.message),
            None => f.write_str(&self.message),
        }
    }
}

/// The diagnostics bundle returned with every transform result.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    /// Creates an empty bundle.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a warning. `row` is the zero-based table row, stored 1-based.
    pub fn warn(&mut self, code: DiagnosticCode, row: Option<usize>, message: impl Into<String>) {
        let message = message.into();
        tracing::warn!(code = code.code(), row = row.map(|r| r + 1), "{message}");
        self.entries.push(Diagnostic {
            severity: Severity::Warning,
            code,
            row: row.map(|r| r + 1),
            message,
        });
    }

    /// Records an informational finding. `row` is zero-based, stored 1-based.
    pub fn info(&mut self, code: DiagnosticCode, row: Option<usize>, message: impl Into<String>) {
        let message = message.into();
        tracing::debug!(code = code.code(), row = row.map(|r| r + 1), "{message}");
        self.entries.push(Diagnostic {
            severity: Severity::Info,
            code,
            row: row.map(|r| r + 1),
            message,
        });
    }

    /// Appends every entry of `other`.
    pub fn extend(&mut self, other: Diagnostics) {
        self.entries.extend(other.entries);
    }

    /// All findings in the order they were recorded.
    pub fn entries(&self) -> &[Diagnostic] {
        &self.entries
    }

    /// Number of warnings.
    pub fn warning_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|d| d.severity == Severity::Warning)
            .count()
    }

    /// Returns `true` when any finding carries `code`.
    pub fn has(&self, code: DiagnosticCode) -> bool {
        self.entries.iter().any(|d| d.code == code)
    }

    /// Returns `true` when nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used)]

    use super::*;

    #[test]
    fn rows_are_stored_one_based() {
        let mut d = Diagnostics::new();
        d.warn(DiagnosticCode::RowWithoutBlock, Some(4), "dropped");
        assert_eq!(d.entries()[0].row, Some(5));
        assert_eq!(d.entries()[0].to_string(), "row 5: dropped");
    }

    #[test]
    fn serializes_as_array_of_objects() {
        let mut d = Diagnostics::new();
        d.warn(DiagnosticCode::UnmappedBlock, None, "BLOCO 09 has no stage");
        d.info(DiagnosticCode::Filtered, Some(0), "ignored project");
        let json = serde_json::to_value(&d).expect("serialize");
        assert_eq!(json[0]["code"], "unmapped_block");
        assert_eq!(json[0]["severity"], "warning");
        assert!(json[0].get("row").is_none());
        assert_eq!(json[1]["row"], 1);
        assert_eq!(d.warning_count(), 1);
    }
}
