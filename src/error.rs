//! Error types for the maplog library
//!
//! This module defines all error types that can occur during maplog
//! operations. Errors originating below the interactive loop (hashing,
//! archiving, serialization) are fatal to the running operation; errors
//! originating from user input are recovered in place by re-prompting.

use std::path::PathBuf;
use thiserror::Error;

/// Type alias for Results in the maplog library
pub type Result<T> = std::result::Result<T, MaplogError>;

/// Main error type for all maplog operations
#[derive(Debug, Error)]
pub enum MaplogError {
    /// I/O errors during file operations
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Input log file does not exist at load time
    #[error("File not found: {path:?}")]
    MissingFile {
        /// Path that was expected to exist
        path: PathBuf,
    },

    /// Errors during bincode serialization/deserialization
    #[error("Bincode error: {0}")]
    Bincode(String),

    /// Log file is structurally invalid (bad magic, truncated body)
    #[error("Invalid log file: {0}")]
    InvalidLog(String),

    /// Operation not applicable to the selected entry (rename on an
    /// un-nameable category, move past a boundary, index out of range)
    #[error("Unsupported operation: {0}")]
    UnsupportedOperation(String),

    /// User input did not match any offered menu key
    #[error("Invalid choice: '{0}'")]
    InvalidChoice(String),
}

// Implement conversions for bincode 2.0 error types
impl From<bincode::error::DecodeError> for MaplogError {
    fn from(err: bincode::error::DecodeError) -> Self {
        MaplogError::Bincode(err.to_string())
    }
}

impl From<bincode::error::EncodeError> for MaplogError {
    fn from(err: bincode::error::EncodeError) -> Self {
        MaplogError::Bincode(err.to_string())
    }
}

impl MaplogError {
    /// Create an unsupported-operation error with a custom message
    pub fn unsupported(msg: impl Into<String>) -> Self {
        MaplogError::UnsupportedOperation(msg.into())
    }

    /// Create an invalid-log error with a custom message
    pub fn invalid_log(msg: impl Into<String>) -> Self {
        MaplogError::InvalidLog(msg.into())
    }

    /// Check if this error is recoverable by re-prompting the user
    pub fn is_recoverable(&self) -> bool {
        matches!(self, MaplogError::InvalidChoice(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = MaplogError::unsupported("rename on docking point");
        assert_eq!(
            err.to_string(),
            "Unsupported operation: rename on docking point"
        );
    }

    #[test]
    fn test_error_recoverable() {
        assert!(MaplogError::InvalidChoice("x".to_string()).is_recoverable());
        assert!(!MaplogError::MissingFile {
            path: PathBuf::from("map.log"),
        }
        .is_recoverable());
    }
}
