//! Typed error handling for sumcheck.
//!
//! These are operational failures (unreadable snapshots, bad configuration).
//! Findings about the analyzed code are [`Diagnostic`](crate::Diagnostic)
//! values, never errors.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for sumcheck operations.
#[derive(Error, Debug)]
pub enum SumcheckError {
    /// I/O error when reading files
    #[error("I/O error at {path}: {message}")]
    Io {
        path: PathBuf,
        message: String,
        #[source]
        source: Option<std::io::Error>,
    },

    /// A snapshot that could not be decoded or is internally inconsistent
    #[error("Snapshot error in {path}: {message}")]
    Snapshot {
        path: PathBuf,
        message: String,
        /// Line number (1-indexed) if available
        line: Option<usize>,
        /// Column number (1-indexed) if available
        column: Option<usize>,
    },

    /// Configuration file errors
    #[error("Config error at {path}: {message}")]
    Config { path: PathBuf, message: String },

    /// Invalid argument provided
    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },
}

impl SumcheckError {
    /// Create an I/O error with path context.
    pub fn io(path: impl Into<PathBuf>, err: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            message: err.to_string(),
            source: Some(err),
        }
    }

    /// Create a snapshot error without location.
    pub fn snapshot(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Snapshot {
            path: path.into(),
            message: message.into(),
            line: None,
            column: None,
        }
    }

    /// Create a snapshot error with line/column info.
    pub fn snapshot_at(
        path: impl Into<PathBuf>,
        message: impl Into<String>,
        line: usize,
        column: usize,
    ) -> Self {
        Self::Snapshot {
            path: path.into(),
            message: message.into(),
            line: Some(line),
            column: Some(column),
        }
    }

    /// Create a config error.
    pub fn config(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Config {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create an invalid argument error.
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }
}

/// Convenience type alias for sumcheck results.
pub type SumcheckResult<T> = Result<T, SumcheckError>;

/// Extension trait for converting std::io::Error with path context.
pub trait IoResultExt<T> {
    /// Add path context to an I/O error.
    fn with_path(self, path: impl Into<PathBuf>) -> SumcheckResult<T>;
}

impl<T> IoResultExt<T> for std::io::Result<T> {
    fn with_path(self, path: impl Into<PathBuf>) -> SumcheckResult<T> {
        self.map_err(|e| SumcheckError::io(path, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error() {
        let err = SumcheckError::io(
            PathBuf::from("/test/unit.json"),
            std::io::Error::new(std::io::ErrorKind::NotFound, "file not found"),
        );
        assert!(matches!(err, SumcheckError::Io { .. }));
        assert!(err.to_string().contains("/test/unit.json"));
    }

    #[test]
    fn test_snapshot_error_with_location() {
        let err = SumcheckError::snapshot_at("/units/p.json", "expected value", 10, 5);
        if let SumcheckError::Snapshot { line, column, .. } = &err {
            assert_eq!(*line, Some(10));
            assert_eq!(*column, Some(5));
        } else {
            panic!("Expected Snapshot error");
        }
    }

    #[test]
    fn test_config_error_display() {
        let err = SumcheckError::config("/proj/sumcheck.toml", "expected a value");
        assert_eq!(
            err.to_string(),
            "Config error at /proj/sumcheck.toml: expected a value"
        );
    }

    #[test]
    fn test_io_result_ext() {
        let result: std::io::Result<()> =
            Err(std::io::Error::new(std::io::ErrorKind::NotFound, "missing"));
        let converted = result.with_path("/missing/unit.json");
        assert!(matches!(converted, Err(SumcheckError::Io { .. })));
    }
}
