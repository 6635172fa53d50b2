//! Structured error types for configuration loading.

use serde::Serialize;
use std::path::PathBuf;

/// Error codes for programmatic error handling.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // Construction errors
    ExecutableNotFound,

    // Layer errors
    FileNotFound,
    InvalidDocument,

    // Internal errors
    InternalError,
}

/// Errors produced while constructing a loader or applying its layers.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("Failed to locate executable: {source}")]
    ExecutableDir {
        #[source]
        source: std::io::Error,
    },

    #[error("Executable path has no parent directory: {}", path.display())]
    ExecutableDirUnknown { path: PathBuf },

    #[error("Failed to read config file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config file {}: {source}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to encode config target: {source}")]
    Encode {
        #[source]
        source: serde_json::Error,
    },
}

impl LoadError {
    pub fn code(&self) -> ErrorCode {
        match self {
            LoadError::ExecutableDir { .. } | LoadError::ExecutableDirUnknown { .. } => {
                ErrorCode::ExecutableNotFound
            }
            LoadError::Read { .. } => ErrorCode::FileNotFound,
            LoadError::Decode { .. } => ErrorCode::InvalidDocument,
            LoadError::Encode { .. } => ErrorCode::InternalError,
        }
    }

    /// The config file this error refers to, if any.
    pub fn path(&self) -> Option<&std::path::Path> {
        match self {
            LoadError::Read { path, .. } | LoadError::Decode { path, .. } => Some(path.as_path()),
            LoadError::ExecutableDirUnknown { path } => Some(path.as_path()),
            _ => None,
        }
    }
}

/// Result type for loader operations.
pub type LoadResult<T> = std::result::Result<T, LoadError>;
