//! Error types for the conversion pipeline and the HTTP adapter.
//!
//! Two layers:
//!
//! - [`ConvertError`] - failures of the core conversion function
//! - [`ServerError`] - failures of the HTTP boundary (size limit, bad requests)
//!
//! Error conversion is automatic via `From` implementations,
//! allowing `?` to work across error boundaries.

use thiserror::Error;

// =============================================================================
// Conversion Errors (core)
// =============================================================================

/// Errors raised by the core conversion function.
///
/// Note that malformed rows are NOT an error: inconsistent column counts are
/// reconciled by padding and synthetic header names, so a messy CSV still
/// converts. Only a missing source or a failed JSON encoding aborts a call.
#[derive(Debug, Error)]
pub enum ConvertError {
    /// Source is empty or contains only whitespace.
    #[error("No CSV data provided: the source is empty")]
    EmptyInput,

    /// Failed to read the source file.
    #[error("Failed to read source: {0}")]
    Io(#[from] std::io::Error),

    /// JSON encoding failed. No partial output is produced.
    #[error("JSON encoding failed: {0}")]
    Serialize(#[from] serde_json::Error),
}

// =============================================================================
// Server Errors (HTTP boundary)
// =============================================================================

/// Errors raised by the HTTP form handler before or around the core call.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Uploaded or pasted source exceeds the accepted size.
    #[error("Source exceeds the maximum accepted size of {limit_bytes} bytes")]
    SizeLimit { limit_bytes: usize },

    /// Request is missing a usable source or is otherwise malformed.
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// The core conversion failed.
    #[error(transparent)]
    Convert(#[from] ConvertError),
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for core conversion operations.
pub type ConvertResult<T> = Result<T, ConvertError>;

/// Result type for server operations.
pub type ServerResult<T> = Result<T, ServerError>;
