//! Error types for migration operations
//!
//! Only conditions that must stop a migration run are errors. Anything the
//! converters can skip over (unknown fields, unsupported value shapes,
//! lossy rewrites) is recorded in [`crate::diagnostics::Diagnostics`] instead.
//!
//! Each variant has:
//! - A stable error code (e.g., `UNSUPPORTED_CRITERION`)
//! - A category for grouping
//! - A fatal flag telling the walker whether the batch must stop
//!
//! # Example
//!
//! ```rust
//! use collection_core::error::{MigrationError, ErrorCategory};
//!
//! fn report(err: &MigrationError) {
//!     match err.category() {
//!         ErrorCategory::Conversion => println!("Fix the criteria or registry"),
//!         ErrorCategory::NotFound => println!("Object missing"),
//!         _ => println!("Other error"),
//!     }
//!
//!     if err.is_fatal() {
//!         println!("Batch aborted: {}", err.error_code());
//!     }
//! }
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for migration operations
pub type Result<T> = std::result::Result<T, MigrationError>;

/// Error category for grouping related errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// A legacy criterion could not be converted safely
    Conversion,
    /// Registry, catalog or config input is malformed
    Validation,
    /// Content object not found
    NotFound,
    /// Content object has an unexpected shape
    Conflict,
    /// Storage and serialization failures
    External,
    /// Internal error
    Internal,
}

/// Errors that can occur while migrating content
#[derive(Error, Debug)]
pub enum MigrationError {
    // ═══════════════════════════════════════════════════════════════════════
    // Conversion errors (abort the whole batch)
    // ═══════════════════════════════════════════════════════════════════════

    /// Criterion type has no converter in the dispatch table
    #[error("Unsupported criterion {criterion_type} on field '{field}'. No converter is registered for this type.")]
    UnsupportedCriterion { criterion_type: String, field: String },

    /// Derived date operation is not permitted for the field or cannot be resolved
    #[error("Invalid operation {operation} for criterion: {criterion_type} on field '{field}'. Fix the registry and re-run the migration.")]
    InvalidDateOperation {
        operation: String,
        criterion_type: String,
        field: String,
    },

    // ═══════════════════════════════════════════════════════════════════════
    // Input errors (registry, catalog, config)
    // ═══════════════════════════════════════════════════════════════════════

    /// Registry manifest is malformed
    #[error("Invalid registry manifest: {reason}")]
    InvalidRegistry { reason: String },

    /// Failed to read a registry or catalog file
    #[error("Failed to load registry from '{path}': {reason}")]
    RegistryLoadError { path: String, reason: String },

    /// Migration configuration is malformed
    #[error("Invalid migration config: {reason}")]
    InvalidConfig { reason: String },

    // ═══════════════════════════════════════════════════════════════════════
    // Content errors
    // ═══════════════════════════════════════════════════════════════════════

    /// No content object at the given path
    #[error("Content not found: '{path}'")]
    ContentNotFound { path: String },

    /// Failed to read or write a content file
    #[error("Failed to load content from '{path}': {reason}")]
    ContentLoadError { path: String, reason: String },

    /// Object at the path is not of the type the migrator expects
    #[error("Unexpected content type at '{path}': expected {expected}, got {actual}")]
    UnexpectedContentType {
        path: String,
        expected: String,
        actual: String,
    },

    // ═══════════════════════════════════════════════════════════════════════
    // Infrastructure errors
    // ═══════════════════════════════════════════════════════════════════════

    /// Content store lock is poisoned (panic occurred while holding lock)
    #[error("Content store lock poisoned. This is a bug; please report it.")]
    StorageLocked,

    /// JSON serialization or deserialization failed
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// I/O operation failed
    #[error("IO error: {message}")]
    IoError { message: String },
}

impl MigrationError {
    /// Returns true if this error must abort the batch walk
    ///
    /// Registry and config input errors are raised before any walk starts and
    /// are not fatal. Every error that reaches the walker is.
    pub fn is_fatal(&self) -> bool {
        !matches!(
            self,
            MigrationError::InvalidRegistry { .. }
                | MigrationError::RegistryLoadError { .. }
                | MigrationError::InvalidConfig { .. }
        )
    }

    /// Returns the error category for grouping
    pub fn category(&self) -> ErrorCategory {
        match self {
            MigrationError::UnsupportedCriterion { .. }
            | MigrationError::InvalidDateOperation { .. } => ErrorCategory::Conversion,

            MigrationError::InvalidRegistry { .. }
            | MigrationError::RegistryLoadError { .. }
            | MigrationError::InvalidConfig { .. } => ErrorCategory::Validation,

            MigrationError::ContentNotFound { .. } => ErrorCategory::NotFound,

            MigrationError::UnexpectedContentType { .. } => ErrorCategory::Conflict,

            MigrationError::ContentLoadError { .. }
            | MigrationError::JsonError(_)
            | MigrationError::IoError { .. } => ErrorCategory::External,

            MigrationError::StorageLocked => ErrorCategory::Internal,
        }
    }

    /// Returns the stable error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            MigrationError::UnsupportedCriterion { .. } => "UNSUPPORTED_CRITERION",
            MigrationError::InvalidDateOperation { .. } => "INVALID_DATE_OPERATION",
            MigrationError::InvalidRegistry { .. } => "INVALID_REGISTRY",
            MigrationError::RegistryLoadError { .. } => "REGISTRY_LOAD_ERROR",
            MigrationError::InvalidConfig { .. } => "INVALID_CONFIG",
            MigrationError::ContentNotFound { .. } => "CONTENT_NOT_FOUND",
            MigrationError::ContentLoadError { .. } => "CONTENT_LOAD_ERROR",
            MigrationError::UnexpectedContentType { .. } => "UNEXPECTED_CONTENT_TYPE",
            MigrationError::StorageLocked => "STORAGE_LOCKED",
            MigrationError::JsonError(_) => "JSON_ERROR",
            MigrationError::IoError { .. } => "IO_ERROR",
        }
    }

    /// Converts this error to a JSON-serializable response object
    pub fn to_error_response(&self) -> ErrorResponse {
        ErrorResponse {
            error: ErrorDetail {
                code: self.error_code().to_string(),
                message: self.to_string(),
                category: self.category(),
                fatal: self.is_fatal(),
            },
        }
    }
}

impl From<std::io::Error> for MigrationError {
    fn from(e: std::io::Error) -> Self {
        MigrationError::IoError {
            message: e.to_string(),
        }
    }
}

/// JSON-serializable error response for the CLI report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error details
    pub error: ErrorDetail,
}

/// Error detail for JSON responses
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetail {
    /// Stable error code (e.g., "UNSUPPORTED_CRITERION")
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Error category
    pub category: ErrorCategory,
    /// Whether the batch was aborted
    pub fatal: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(
            MigrationError::UnsupportedCriterion {
                criterion_type: "ATFooCriterion".to_string(),
                field: "Title".to_string(),
            }
            .error_code(),
            "UNSUPPORTED_CRITERION"
        );
        assert_eq!(MigrationError::StorageLocked.error_code(), "STORAGE_LOCKED");
    }

    #[test]
    fn test_conversion_errors_are_fatal() {
        assert!(MigrationError::UnsupportedCriterion {
            criterion_type: "ATFooCriterion".to_string(),
            field: "Title".to_string(),
        }
        .is_fatal());
        assert!(MigrationError::InvalidDateOperation {
            operation: "plone.app.querystring.operation.date.today".to_string(),
            criterion_type: "ATDateCriteria".to_string(),
            field: "created".to_string(),
        }
        .is_fatal());
        assert!(!MigrationError::InvalidConfig {
            reason: "bad".to_string()
        }
        .is_fatal());
    }

    #[test]
    fn test_input_errors_share_classification() {
        let input_errors = [
            MigrationError::InvalidRegistry {
                reason: "bad key".to_string(),
            },
            MigrationError::RegistryLoadError {
                path: "registry.json".to_string(),
                reason: "missing".to_string(),
            },
            MigrationError::InvalidConfig {
                reason: "empty namespace".to_string(),
            },
        ];
        for err in &input_errors {
            assert!(!err.is_fatal(), "{}", err.error_code());
            assert!(!err.to_error_response().error.fatal);
            assert_eq!(err.category(), ErrorCategory::Validation);
        }
    }

    #[test]
    fn test_error_categories() {
        assert_eq!(
            MigrationError::ContentNotFound {
                path: "/plone/news".to_string()
            }
            .category(),
            ErrorCategory::NotFound
        );
        assert_eq!(
            MigrationError::InvalidRegistry {
                reason: "x".to_string()
            }
            .category(),
            ErrorCategory::Validation
        );
    }

    #[test]
    fn test_error_message_names_the_type() {
        let err = MigrationError::UnsupportedCriterion {
            criterion_type: "ATFooCriterion".to_string(),
            field: "Title".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("ATFooCriterion"));
        assert!(msg.contains("Title"));
    }

    #[test]
    fn test_error_response_serialization() {
        let err = MigrationError::ContentNotFound {
            path: "/plone/topic".to_string(),
        };
        let response = err.to_error_response();

        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("CONTENT_NOT_FOUND"));
        assert!(json.contains("not_found"));

        let parsed: ErrorResponse = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.error.code, "CONTENT_NOT_FOUND");
        assert!(parsed.error.fatal);
    }
}
