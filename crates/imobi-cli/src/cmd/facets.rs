//! Implementation of `imobi facets`.
//!
//! Lists the distinct projects and reasons of a blocked-units report so the
//! operator can pick `--ignore-project` and `--ignore-reason` values.
use crate::PathOrStdin;
use crate::cli::OutputFormat;
use crate::error::CliError;
use crate::format;
use crate::io;

/// Runs the `facets` command, printing to stdout.
///
/// # Errors
///
/// Returns [`CliError`] when the report cannot be read or has no usable
/// header.
pub fn run(
    file: &PathOrStdin,
    header_threshold: Option<usize>,
    max_file_size: u64,
    output_format: OutputFormat,
) -> Result<(), CliError> {
    let bytes = io::read_input(file, max_file_size)?;
    let facets = imobi_sheets::blocked_unit_facets(&bytes, header_threshold)?;
    tracing::debug!(
        projects = facets.projects.len(),
        reasons = facets.reasons.len(),
        "facets collected"
    );
    let stdout = std::io::stdout();
    let mut handle = stdout.lock();
    format::write_facets(&mut handle, &facets, output_format).map_err(|e| CliError::IoError {
        source: "stdout".to_owned(),
        detail: e.to_string(),
    })
}
