// src/error.rs
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CahootsError {
    #[error("I/O error: {source} (path: {path})")]
    Io {
        source: std::io::Error,
        path: PathBuf,
    },

    #[error("metric domain error: union of both line sets is empty after dedup")]
    MetricDomain,

    #[error("malformed record at {path}:{line}: {reason}")]
    Parse {
        path: PathBuf,
        line: usize,
        reason: String,
    },

    #[error("record refers to unknown assignment: {0}")]
    UnknownAssignment(String),

    #[error("clique invariant violated: {0}")]
    InvariantViolation(String),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("Generic error: {0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, CahootsError>;

// Allow `?` on std::io::Error by converting to CahootsError::Io with unknown path.
impl From<std::io::Error> for CahootsError {
    fn from(source: std::io::Error) -> Self {
        CahootsError::Io {
            source,
            path: PathBuf::from("<unknown>"),
        }
    }
}

impl From<walkdir::Error> for CahootsError {
    fn from(e: walkdir::Error) -> Self {
        CahootsError::Other(e.to_string())
    }
}

impl CahootsError {
    /// Wraps an I/O error with the path that caused it.
    #[must_use]
    pub fn io(source: std::io::Error, path: &std::path::Path) -> Self {
        CahootsError::Io {
            source,
            path: path.to_path_buf(),
        }
    }
}
