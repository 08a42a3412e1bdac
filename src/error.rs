//! Error types for the defogger engine.
//!
//! This module provides structured error handling using thiserror. Most
//! failures inside the scan pipeline are contained per candidate and never
//! surface here; these types cover the boundaries where an operation can
//! fail as a whole (target resolution, reporting, archive expansion).

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for defogger operations.
#[derive(Debug, Error)]
pub enum DefoggerError {
    /// A matched token failed to decode despite matching the pattern
    #[error("Malformed {encoding} candidate: {message}")]
    MalformedEncoding { encoding: String, message: String },

    /// Decoded bytes do not form valid text
    #[error("Decoded bytes are not valid UTF-8")]
    NonUtf8Decode,

    /// Archive sniffing or entry extraction failed
    #[error("Archive extraction failed: {0}")]
    ArchiveExtraction(String),

    /// The input target is neither a directory nor a file
    #[error("Cannot resolve target {0:?}: not a file or directory")]
    TargetResolution(PathBuf),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization errors from the report layer
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for DefoggerError {
    fn from(err: serde_json::Error) -> Self {
        DefoggerError::Serialization(err.to_string())
    }
}

/// Result type alias for defogger operations
pub type Result<T> = std::result::Result<T, DefoggerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = DefoggerError::MalformedEncoding {
            encoding: "base64".to_string(),
            message: "invalid padding".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Malformed base64 candidate: invalid padding"
        );

        let err = DefoggerError::TargetResolution(PathBuf::from("no/such/thing"));
        assert!(err.to_string().contains("no/such/thing"));
    }

    #[test]
    fn test_io_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: DefoggerError = io.into();
        assert!(matches!(err, DefoggerError::Io(_)));
    }
}
