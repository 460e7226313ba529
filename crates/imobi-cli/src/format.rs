//! Diagnostic formatting: human-readable and JSON (NDJSON) modes.
//!
//! - **Human mode** (default): one line per diagnostic, color-coded by
//!   severity. Colors are disabled when `--no-color` is set, the `NO_COLOR`
//!   environment variable is present (per <https://no-color.org>), or stderr
//!   is not a TTY.
//! - **JSON mode**: each diagnostic is serialized as a single-line JSON
//!   object (NDJSON), followed by a summary object.
//!
//! Quiet mode suppresses diagnostics and the summary; errors are always
//! printed.
use std::io::{IsTerminal as _, Write};

use imobi_core::{BlockedUnitFacets, Diagnostic, Diagnostics, Severity};
use serde_json::json;

use crate::OutputFormat;
use crate::error::CliError;

/// Returns `true` if ANSI color codes should be emitted to stderr.
pub fn colors_enabled(no_color_flag: bool) -> bool {
    if no_color_flag {
        return false;
    }
    if std::env::var_os("NO_COLOR").is_some() {
        return false;
    }
    std::io::stderr().is_terminal()
}

const ANSI_RED: &str = "\x1b[31m";
const ANSI_YELLOW: &str = "\x1b[33m";
const ANSI_CYAN: &str = "\x1b[36m";
const ANSI_RESET: &str = "\x1b[0m";

/// Configuration for the diagnostic formatter, derived from CLI flags.
#[derive(Debug, Clone, Copy)]
pub struct FormatterConfig {
    /// Human or JSON output.
    pub format: OutputFormat,
    /// Whether ANSI colors are enabled.
    pub colors: bool,
    /// Suppress diagnostics and the summary.
    pub quiet: bool,
}

impl FormatterConfig {
    /// Constructs a [`FormatterConfig`] from the raw CLI flags.
    pub fn from_flags(format: OutputFormat, no_color_flag: bool, quiet: bool) -> Self {
        Self {
            format,
            colors: format == OutputFormat::Human && colors_enabled(no_color_flag),
            quiet,
        }
    }
}

/// Writes a single [`Diagnostic`] in human-readable format.
///
/// Format: `[W] row 12: UNIT value "abc" is not numeric`
///
/// # Errors
///
/// Returns an error only if writing to `writer` fails.
pub fn write_diagnostic_human<W: Write>(
    writer: &mut W,
    diag: &Diagnostic,
    config: &FormatterConfig,
) -> std::io::Result<()> {
    let (tag, color) = match diag.severity {
        Severity::Warning => ("[W]", ANSI_YELLOW),
        Severity::Info => ("[I]", ANSI_CYAN),
    };
    if config.colors {
        writeln!(writer, "{color}{tag}{ANSI_RESET} {diag}")
    } else {
        writeln!(writer, "{tag} {diag}")
    }
}

/// Writes a single [`Diagnostic`] as an NDJSON line.
///
/// # Errors
///
/// Returns an error if serialization or writing fails.
pub fn write_diagnostic_json<W: Write>(writer: &mut W, diag: &Diagnostic) -> std::io::Result<()> {
    serde_json::to_writer(&mut *writer, diag)?;
    writer.write_all(b"\n")
}

/// Writes every diagnostic of a transform, then a summary line.
///
/// Human summary: `price-table: 4096 bytes, 1 warning, 0 info`.
///
/// # Errors
///
/// Returns an error only if writing to `writer` fails.
pub fn write_report<W: Write>(
    writer: &mut W,
    kind: &str,
    bytes: usize,
    diagnostics: &Diagnostics,
    config: &FormatterConfig,
) -> std::io::Result<()> {
    if config.quiet {
        return Ok(());
    }
    let warnings = diagnostics.warning_count();
    let infos = diagnostics.entries().len() - warnings;
    match config.format {
        OutputFormat::Human => {
            for diag in diagnostics.entries() {
                write_diagnostic_human(writer, diag, config)?;
            }
            writeln!(
                writer,
                "{kind}: {bytes} bytes, {warnings} {}, {infos} info",
                pluralize(warnings, "warning", "warnings"),
            )
        }
        OutputFormat::Json => {
            for diag in diagnostics.entries() {
                write_diagnostic_json(writer, diag)?;
            }
            let summary = json!({
                "summary": {"kind": kind, "bytes": bytes, "warnings": warnings, "info": infos}
            });
            writeln!(writer, "{summary}")
        }
    }
}

/// Writes a failure. Errors are printed even in quiet mode.
///
/// # Errors
///
/// Returns an error only if writing to `writer` fails.
pub fn write_error<W: Write>(
    writer: &mut W,
    error: &CliError,
    config: &FormatterConfig,
) -> std::io::Result<()> {
    match config.format {
        OutputFormat::Human if config.colors => {
            writeln!(writer, "{ANSI_RED}{}{ANSI_RESET}", error.message())
        }
        OutputFormat::Human => writeln!(writer, "{}", error.message()),
        OutputFormat::Json => {
            let kind = match error {
                CliError::Transform(e) => e.kind().to_string(),
                CliError::FileNotFound { .. }
                | CliError::PermissionDenied { .. }
                | CliError::FileTooLarge { .. }
                | CliError::StdinReadError { .. }
                | CliError::IoError { .. } => "Io".to_owned(),
                CliError::InvalidStageMap { .. } => "InvalidStageMap".to_owned(),
            };
            let line = json!({
                "error": {"kind": kind, "exit_code": error.exit_code(), "message": error.message()}
            });
            writeln!(writer, "{line}")
        }
    }
}

/// Writes blocked-unit facets: two indented lists, or one JSON object.
///
/// # Errors
///
/// Returns an error if serialization or writing fails.
pub fn write_facets<W: Write>(
    writer: &mut W,
    facets: &BlockedUnitFacets,
    format: OutputFormat,
) -> std::io::Result<()> {
    match format {
        OutputFormat::Human => {
            writeln!(writer, "projects:")?;
            for project in &facets.projects {
                writeln!(writer, "  {project}")?;
            }
            writeln!(writer, "reasons:")?;
            for reason in &facets.reasons {
                writeln!(writer, "  {reason}")?;
            }
            Ok(())
        }
        OutputFormat::Json => {
            serde_json::to_writer(&mut *writer, facets)?;
            writer.write_all(b"\n")
        }
    }
}

/// Returns `singular` when `n == 1`, `plural` otherwise.
pub fn pluralize<'a>(n: usize, singular: &'a str, plural: &'a str) -> &'a str {
    if n == 1 { singular } else { plural }
}
