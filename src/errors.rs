use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Error type for argument validation, codec, and filesystem failures.
///
/// Absence of a file on a read path is not an error; read APIs report it as
/// `Ok(None)`.
#[derive(Debug, Error)]
pub enum ExperimentError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("source directory or file '{}' does not exist", .path.display())]
    SourceNotFound { path: PathBuf },
    #[error("malformed record row at line {line}: {details}")]
    MalformedRow { line: u64, details: String },
    #[error("malformed document '{}': {details}", .path.display())]
    MalformedDocument { path: PathBuf, details: String },
    #[error(transparent)]
    Io(#[from] io::Error),
}
