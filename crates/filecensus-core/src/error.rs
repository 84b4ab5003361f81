//! Error types for catalog runs.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use strum::Display;
use thiserror::Error;

/// Fatal errors raised before or around the traversal.
#[derive(Debug, Error)]
pub enum ScanError {
    /// Permission denied for the root path.
    #[error("Permission denied: {path}")]
    PermissionDenied { path: PathBuf },

    /// Root path not found.
    #[error("Path not found: {path}")]
    NotFound { path: PathBuf },

    /// Generic I/O error.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Invalid configuration.
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// The hashing worker pool could not be started.
    #[error("Failed to start hash workers: {message}")]
    WorkerPool { message: String },

    /// The traversal thread panicked.
    #[error("Traversal thread panicked")]
    ProducerPanicked,
}

impl ScanError {
    /// Create an I/O error with path context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        match source.kind() {
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied { path },
            std::io::ErrorKind::NotFound => Self::NotFound { path },
            _ => Self::Io { path, source },
        }
    }
}

/// Kind of scan warning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize, Deserialize)]
#[strum(serialize_all = "kebab-case")]
pub enum WarningKind {
    /// A directory could not be opened or listed; its subtree was skipped.
    PathAccess,
    /// Entry metadata could not be read; the entry was skipped.
    Metadata,
    /// File contents could not be read; the record carries no hash.
    HashUnavailable,
}

/// Non-fatal warning encountered during traversal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanWarning {
    /// Path where the warning occurred.
    pub path: PathBuf,
    /// Human-readable message.
    pub message: String,
    /// Kind of warning.
    pub kind: WarningKind,
}

impl ScanWarning {
    /// Create a new scan warning.
    pub fn new(path: impl Into<PathBuf>, message: impl Into<String>, kind: WarningKind) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
            kind,
        }
    }

    /// A directory that could not be opened or listed.
    pub fn path_access(path: impl Into<PathBuf>, error: impl std::fmt::Display) -> Self {
        let path = path.into();
        Self {
            message: format!("Cannot access {}: {error}", path.display()),
            path,
            kind: WarningKind::PathAccess,
        }
    }

    /// Metadata that could not be read.
    pub fn metadata(path: impl Into<PathBuf>, error: impl std::fmt::Display) -> Self {
        let path = path.into();
        Self {
            message: format!("Cannot read metadata of {}: {error}", path.display()),
            path,
            kind: WarningKind::Metadata,
        }
    }

    /// A file that could not be hashed.
    pub fn hash_unavailable(path: impl Into<PathBuf>, error: &std::io::Error) -> Self {
        let path = path.into();
        Self {
            message: format!("Failed to calculate hash for {}: {error}", path.display()),
            path,
            kind: WarningKind::HashUnavailable,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_error_io() {
        let err = ScanError::io(
            "/test/path",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        assert!(matches!(err, ScanError::PermissionDenied { .. }));

        let err = ScanError::io(
            "/test/path",
            std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        );
        assert!(matches!(err, ScanError::NotFound { .. }));
    }

    #[test]
    fn test_hash_warning_creation() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let warning = ScanWarning::hash_unavailable("/test/file.bin", &io);
        assert_eq!(warning.kind, WarningKind::HashUnavailable);
        assert!(warning.message.contains("/test/file.bin"));
        assert!(warning.message.contains("denied"));
    }

    #[test]
    fn test_warning_kind_display() {
        assert_eq!(WarningKind::PathAccess.to_string(), "path-access");
        assert_eq!(WarningKind::HashUnavailable.to_string(), "hash-unavailable");
    }
}
