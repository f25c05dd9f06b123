use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LcovError {
    #[error("line {line}: {reason}")]
    Malformed { line: usize, reason: String },
    #[error("no coverage records found")]
    Empty,
}

impl LcovError {
    pub(crate) fn malformed(line: usize, reason: impl Into<String>) -> Self {
        LcovError::Malformed {
            line,
            reason: reason.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Failed to read {origin}: {source}")]
    Read { origin: String, source: io::Error },

    #[error("Invalid coverage report {origin}: {source}")]
    Lcov { origin: String, source: LcovError },

    #[error("Invalid source map {origin}: {source}")]
    SourceMap {
        origin: String,
        source: sourcemap::Error,
    },

    #[error("Failed to write {}: {source}", .path.display())]
    Write { path: PathBuf, source: io::Error },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    #[error("Invalid pattern: {0}")]
    Regex(#[from] regex::Error),

    #[error("{0}")]
    Custom(String),
}

pub type AppResult<T> = Result<T, AppError>;
