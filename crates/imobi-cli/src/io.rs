//! File and stdin I/O with size enforcement.
//!
//! This module is the single place the `imobi` binary touches the
//! filesystem. Inputs are read as raw bytes: workbooks are binary and text
//! encodings are sniffed downstream by `imobi-sheets`.
//!
//! - Disk files: size checked via `std::fs::metadata` before any read.
//! - Stdin: buffered with a `Read::take` cap so allocation is bounded.
//! - All I/O errors are converted to [`CliError`] variants with exit code 2.
use std::io::{Read as _, Write as _};
use std::path::Path;

use crate::PathOrStdin;
use crate::error::CliError;

/// Reads the entire contents of `source`.
///
/// # Errors
///
/// Returns [`CliError`] (exit code 2) when the file is missing, unreadable,
/// or larger than `max_size`.
pub fn read_input(source: &PathOrStdin, max_size: u64) -> Result<Vec<u8>, CliError> {
    match source {
        PathOrStdin::Path(path) => read_file(path, max_size),
        PathOrStdin::Stdin => read_stdin(max_size),
    }
}

fn read_file(path: &Path, max_size: u64) -> Result<Vec<u8>, CliError> {
    let file_size = std::fs::metadata(path)
        .map_err(|e| io_error_to_cli(&e, path))?
        .len();
    if file_size > max_size {
        return Err(CliError::FileTooLarge {
            source: path.display().to_string(),
            limit: max_size,
            actual: Some(file_size),
        });
    }
    std::fs::read(path).map_err(|e| io_error_to_cli(&e, path))
}

/// Maps a disk-file `std::io::Error` to a [`CliError`].
fn io_error_to_cli(e: &std::io::Error, path: &Path) -> CliError {
    let kind = e.kind();
    if kind == std::io::ErrorKind::NotFound {
        CliError::FileNotFound {
            path: path.to_path_buf(),
        }
    } else if kind == std::io::ErrorKind::PermissionDenied {
        CliError::PermissionDenied {
            path: path.to_path_buf(),
        }
    } else {
        CliError::IoError {
            source: path.display().to_string(),
            detail: e.to_string(),
        }
    }
}

/// Reads stdin up to `max_size` bytes; one extra byte detects overflow.
fn read_stdin(max_size: u64) -> Result<Vec<u8>, CliError> {
    let mut buf = Vec::new();
    std::io::stdin()
        .lock()
        .take(max_size.saturating_add(1))
        .read_to_end(&mut buf)
        .map_err(|e| CliError::StdinReadError {
            detail: e.to_string(),
        })?;
    if buf.len() as u64 > max_size {
        return Err(CliError::FileTooLarge {
            source: "-".to_owned(),
            limit: max_size,
            actual: None,
        });
    }
    Ok(buf)
}

/// Writes `bytes` to `output`, or to stdout when `output` is `None`.
///
/// # Errors
///
/// [`CliError::IoError`] naming the destination.
pub fn write_output(output: Option<&Path>, bytes: &[u8]) -> Result<(), CliError> {
    match output {
        Some(path) => std::fs::write(path, bytes).map_err(|e| CliError::IoError {
            source: path.display().to_string(),
            detail: e.to_string(),
        }),
        None => {
            let stdout = std::io::stdout();
            let mut handle = stdout.lock();
            handle
                .write_all(bytes)
                .and_then(|()| handle.flush())
                .map_err(|e| CliError::IoError {
                    source: "stdout".to_owned(),
                    detail: e.to_string(),
                })
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used)]

    use std::io::Write as _;
    use std::path::PathBuf;

    use super::*;

    #[test]
    fn reads_file_bytes_unchanged() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        file.write_all(b"UNIDADE;VALOR\n\xe9\n").expect("write");
        let bytes = read_input(&PathOrStdin::Path(file.path().to_path_buf()), 1024)
            .expect("read");
        assert_eq!(bytes, b"UNIDADE;VALOR\n\xe9\n");
    }

    #[test]
    fn missing_file_is_file_not_found() {
        let result = read_input(
            &PathOrStdin::Path(PathBuf::from("/nonexistent/tabela.xlsx")),
            1024,
        );
        let Err(CliError::FileNotFound { path }) = result else {
            unreachable!("expected FileNotFound");
        };
        assert!(path.ends_with("tabela.xlsx"));
    }

    #[test]
    fn oversized_file_is_rejected_before_reading() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        file.write_all(&[b'x'; 64]).expect("write");
        let result = read_input(&PathOrStdin::Path(file.path().to_path_buf()), 10);
        let Err(CliError::FileTooLarge { limit, actual, .. }) = result else {
            unreachable!("expected FileTooLarge");
        };
        assert_eq!(limit, 10);
        assert_eq!(actual, Some(64));
    }

    #[test]
    fn writes_output_file() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("out.csv");
        write_output(Some(&path), b"BLOCO;UNIDADE\n").expect("write");
        assert_eq!(std::fs::read(&path).expect("read back"), b"BLOCO;UNIDADE\n");
    }

    #[test]
    fn unwritable_output_is_io_error() {
        let result = write_output(Some(Path::new("/nonexistent/dir/out.xlsx")), b"x");
        assert!(matches!(result, Err(CliError::IoError { .. })));
    }
}
