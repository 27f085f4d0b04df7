//! # Error Types
//!
//! Structured error types for ply_core. Every failure names the field or
//! input that caused it so callers can report it without re-deriving context.
//!
//! ## Example
//!
//! ```rust
//! use ply_core::errors::{PlyError, PlyResult};
//!
//! fn check_fraction(vf: f64) -> PlyResult<()> {
//!     if !(0.0..=1.0).contains(&vf) {
//!         return Err(PlyError::out_of_range(vf.to_string(), "Fraction must lie in [0, 1]"));
//!     }
//!     Ok(())
//! }
//!
//! assert!(check_fraction(1.5).is_err());
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for ply_core operations
pub type PlyResult<T> = Result<T, PlyError>;

/// Structured error type for material, estimator and file operations.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum PlyError {
    /// A scalar input is malformed, missing or outside its physical domain
    #[error("Invalid argument for '{field}': {value} - {reason}")]
    InvalidArgument {
        field: String,
        value: String,
        reason: String,
    },

    /// A fiber volume fraction lies outside [0, 1] or off the sample grid
    #[error("Out of range: {value} - {reason}")]
    OutOfRange { value: String, reason: String },

    /// Batch input is missing required structure
    #[error("Invalid format in {source_name}: {reason}")]
    InvalidFormat { source_name: String, reason: String },

    /// A named material or composite is not in the library
    #[error("Not found: {name}")]
    NotFound { name: String },

    /// File I/O error
    #[error("File error: {operation} on '{path}' - {reason}")]
    FileError {
        operation: String,
        path: String,
        reason: String,
    },

    /// File is locked by another user/process
    #[error("File locked: '{path}' is locked by {locked_by} since {locked_at}")]
    FileLocked {
        path: String,
        locked_by: String,
        locked_at: String,
    },

    /// JSON serialization/deserialization error
    #[error("Serialization error: {reason}")]
    SerializationError { reason: String },

    /// Schema version mismatch
    #[error("Version mismatch: file version {file_version}, expected {expected_version}")]
    VersionMismatch {
        file_version: String,
        expected_version: String,
    },
}

impl PlyError {
    /// Create an InvalidArgument error
    pub fn invalid_argument(
        field: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        PlyError::InvalidArgument {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create an OutOfRange error
    pub fn out_of_range(value: impl Into<String>, reason: impl Into<String>) -> Self {
        PlyError::OutOfRange {
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create an InvalidFormat error
    pub fn invalid_format(source_name: impl Into<String>, reason: impl Into<String>) -> Self {
        PlyError::InvalidFormat {
            source_name: source_name.into(),
            reason: reason.into(),
        }
    }

    /// Create a NotFound error
    pub fn not_found(name: impl Into<String>) -> Self {
        PlyError::NotFound { name: name.into() }
    }

    /// Create a FileError
    pub fn file_error(
        operation: impl Into<String>,
        path: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        PlyError::FileError {
            operation: operation.into(),
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a FileLocked error
    pub fn file_locked(
        path: impl Into<String>,
        locked_by: impl Into<String>,
        locked_at: impl Into<String>,
    ) -> Self {
        PlyError::FileLocked {
            path: path.into(),
            locked_by: locked_by.into(),
            locked_at: locked_at.into(),
        }
    }

    /// Check if this is a recoverable error (e.g., can retry)
    pub fn is_recoverable(&self) -> bool {
        matches!(self, PlyError::FileLocked { .. })
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            PlyError::InvalidArgument { .. } => "INVALID_ARGUMENT",
            PlyError::OutOfRange { .. } => "OUT_OF_RANGE",
            PlyError::InvalidFormat { .. } => "INVALID_FORMAT",
            PlyError::NotFound { .. } => "NOT_FOUND",
            PlyError::FileError { .. } => "FILE_ERROR",
            PlyError::FileLocked { .. } => "FILE_LOCKED",
            PlyError::SerializationError { .. } => "SERIALIZATION_ERROR",
            PlyError::VersionMismatch { .. } => "VERSION_MISMATCH",
        }
    }
}

impl From<serde_json::Error> for PlyError {
    fn from(e: serde_json::Error) -> Self {
        PlyError::SerializationError {
            reason: e.to_string(),
        }
    }
}
