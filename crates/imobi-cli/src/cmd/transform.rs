//! Implementation of the transform subcommands.
//!
//! Reads the input, runs one pipeline from `imobi-sheets`, writes the
//! artifact to `--output` or stdout and reports diagnostics on stderr.
//!
//! Exit codes:
//! - 0 = artifact written
//! - 1 = parameters rejected, nothing left after filtering, internal error
//! - 2 = input missing or unreadable, or no header, carrier or required column
use std::path::Path;

use imobi_core::{StageMap, TransformParams, TransformRequest};

use crate::PathOrStdin;
use crate::cli::InputArgs;
use crate::error::CliError;
use crate::format::{self, FormatterConfig};
use crate::io;

/// Runs the transform described by `params` over `input.file`.
///
/// Parameters are validated before any input is read.
///
/// # Errors
///
/// Returns [`CliError`] on I/O failures or when the transform fails. Nothing
/// is written to the output on failure.
pub fn run(
    params: TransformParams,
    input: &InputArgs,
    max_file_size: u64,
    config: &FormatterConfig,
) -> Result<(), CliError> {
    let mut request = TransformRequest::new(params);
    request.header_threshold = input.header_threshold;
    request.validate()?;

    let bytes = io::read_input(&input.file, max_file_size)?;
    tracing::debug!(source = %input.file.label(), size = bytes.len(), "input read");
    let output = imobi_sheets::run_transform(&request, &bytes)?;
    io::write_output(input.output.as_deref(), &output.bytes)?;
    tracing::debug!(
        format = output.format.extension(),
        to_stdout = input.output.is_none(),
        "artifact written"
    );

    let stderr = std::io::stderr();
    let mut handle = stderr.lock();
    format::write_report(
        &mut handle,
        request.kind().name(),
        output.bytes.len(),
        &output.diagnostics,
        config,
    )
    .map_err(|e| CliError::IoError {
        source: "stderr".to_owned(),
        detail: e.to_string(),
    })
}

/// Builds the block-to-stage map from repeated `BLOCK=STAGE` pairs or a JSON
/// object file. Returns `None` when neither was given.
///
/// # Errors
///
/// [`CliError::InvalidStageMap`] for a pair without `=` or with an empty
/// side, or a file that is not a JSON object of strings. Reading the file
/// fails like any other input.
pub fn stage_map(
    pairs: &[String],
    file: Option<&Path>,
    max_file_size: u64,
) -> Result<Option<StageMap>, CliError> {
    if let Some(path) = file {
        let bytes = io::read_input(&PathOrStdin::Path(path.to_path_buf()), max_file_size)?;
        let map: StageMap =
            serde_json::from_slice(&bytes).map_err(|e| CliError::InvalidStageMap {
                detail: format!("{}: {e}", path.display()),
            })?;
        return Ok(Some(map));
    }
    if pairs.is_empty() {
        return Ok(None);
    }
    let mut map = StageMap::new();
    for pair in pairs {
        let Some((block, stage)) = pair.split_once('=') else {
            return Err(CliError::InvalidStageMap {
                detail: format!("expected BLOCK=STAGE, got {pair:?}"),
            });
        };
        if block.trim().is_empty() || stage.trim().is_empty() {
            return Err(CliError::InvalidStageMap {
                detail: format!("block and stage must both be non-empty in {pair:?}"),
            });
        }
        map.insert(block, stage);
    }
    Ok(Some(map))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used)]

    use std::io::Write as _;

    use imobi_core::{BlockKey, BlockPrefix};

    use super::*;

    #[test]
    fn pairs_build_a_map() {
        let pairs = vec!["BLOCO 01 = ETAPA 01".to_owned(), "QUADRA 2=ETAPA 02".to_owned()];
        let map = stage_map(&pairs, None, 1024).expect("map").expect("some");
        assert_eq!(map.len(), 2);
        assert_eq!(
            map.lookup(&BlockKey::new("BLOCO 01", BlockPrefix::Bl)),
            Some("ETAPA 01")
        );
    }

    #[test]
    fn no_pairs_no_map() {
        assert!(stage_map(&[], None, 1024).expect("ok").is_none());
    }

    #[test]
    fn pair_without_separator_is_rejected() {
        let result = stage_map(&["BLOCO 01".to_owned()], None, 1024);
        assert!(matches!(result, Err(CliError::InvalidStageMap { .. })));
        let result = stage_map(&["=ETAPA 01".to_owned()], None, 1024);
        assert!(matches!(result, Err(CliError::InvalidStageMap { .. })));
    }

    #[test]
    fn map_file_is_a_json_object() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        file.write_all(br#"{"BLOCO 03": "ETAPA 02"}"#).expect("write");
        let map = stage_map(&[], Some(file.path()), 1024).expect("map").expect("some");
        assert_eq!(
            map.lookup(&BlockKey::new("BLOCO 03", BlockPrefix::Bl)),
            Some("ETAPA 02")
        );
    }

    #[test]
    fn map_file_must_be_an_object() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        file.write_all(b"[1, 2]").expect("write");
        let result = stage_map(&[], Some(file.path()), 1024);
        assert!(matches!(result, Err(CliError::InvalidStageMap { .. })));
    }
}
