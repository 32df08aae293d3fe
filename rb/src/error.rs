//! Browser error types

use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result alias for browser operations
pub type Result<T> = std::result::Result<T, BrowseError>;

/// Errors that can occur while resolving, listing or reading paths
#[derive(Debug, Error)]
pub enum BrowseError {
    #[error("Access denied. File path '{path}' is outside the base directory {}.", root.display())]
    OutOfBounds { path: String, root: PathBuf },

    #[error("'{}' {reason}.", path.display())]
    NotFound { path: PathBuf, reason: String },

    #[error("File '{}' is {size} bytes and exceeds the maximum allowed size of {limit} bytes.", path.display())]
    TooLarge { path: PathBuf, size: u64, limit: u64 },

    #[error("Unable to decode '{}' with encoding '{encoding}'. Try a different encoding.", path.display())]
    Decode { path: PathBuf, encoding: String },

    #[error("Permission denied when trying to read '{}'.", path.display())]
    Permission { path: PathBuf },

    #[error("Error reading '{}': {message}", path.display())]
    Unknown { path: PathBuf, message: String },
}

/// The kind of a [`BrowseError`], without its payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    OutOfBounds,
    NotFound,
    TooLarge,
    Decode,
    Permission,
    Unknown,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::OutOfBounds => "out-of-bounds",
            Self::NotFound => "not-found",
            Self::TooLarge => "too-large",
            Self::Decode => "decode",
            Self::Permission => "permission",
            Self::Unknown => "unknown",
        };
        write!(f, "{}", name)
    }
}

impl BrowseError {
    /// Discriminate the error without matching on fields
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::OutOfBounds { .. } => ErrorKind::OutOfBounds,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::TooLarge { .. } => ErrorKind::TooLarge,
            Self::Decode { .. } => ErrorKind::Decode,
            Self::Permission { .. } => ErrorKind::Permission,
            Self::Unknown { .. } => ErrorKind::Unknown,
        }
    }

    /// Map an I/O failure on `path` to the matching kind
    pub fn from_io(path: &Path, err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::NotFound => Self::NotFound {
                path: path.to_path_buf(),
                reason: "does not exist".to_string(),
            },
            io::ErrorKind::PermissionDenied => Self::Permission {
                path: path.to_path_buf(),
            },
            _ => Self::Unknown {
                path: path.to_path_buf(),
                message: err.to_string(),
            },
        }
    }

    pub(crate) fn not_found(path: &Path, reason: impl Into<String>) -> Self {
        Self::NotFound {
            path: path.to_path_buf(),
            reason: reason.into(),
        }
    }
}
