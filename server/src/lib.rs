//! # csv2json - CSV to JSON conversion
//!
//! Converts tabular text (CSV) into structured JSON, either from the command
//! line or through a web form that accepts a file upload or pasted text.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │  CSV source │────▶│   Parser    │────▶│   Convert   │────▶│  JSON text  │
//! │ (file/text) │     │ (enc+delim) │     │ (head+cast) │     │  (array)    │
//! └─────────────┘     └─────────────┘     └─────────────┘     └─────────────┘
//! ```
//!
//! The conversion is a pure function with no shared state; the HTTP server
//! and the CLI are thin adapters around it.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use csv2json::{convert_str, ConversionOptions};
//!
//! let output = convert_str("id;name\n1;Apfel", &ConversionOptions::default())?;
//! assert_eq!(output.json, r#"[{"id":1,"name":"Apfel"}]"#);
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Error types and result aliases
//! - [`parser`] - Encoding detection, delimiter detection, tokenization
//! - [`convert`] - Headers, casting and the conversion pipeline
//! - [`api`] - HTTP form server

// Core modules
pub mod error;

// Parsing
pub mod parser;

// Conversion
pub mod convert;

// HTTP API
pub mod api;

// =============================================================================
// Re-exports - Error types
// =============================================================================

pub use error::{ConvertError, ConvertResult, ServerError, ServerResult};

// =============================================================================
// Re-exports - Parsing
// =============================================================================

pub use parser::{decode_content, detect_delimiter, detect_encoding, tokenize};

// =============================================================================
// Re-exports - Conversion
// =============================================================================

pub use convert::{
    cast_field, convert_bytes, convert_file, convert_str, derive_headers, synthetic_headers,
    ConversionOptions, ConvertOutput, DelimiterChoice,
};

// =============================================================================
// Re-exports - API
// =============================================================================

pub use api::types::{error_response, ConvertResponse, ResponseMetadata};

// Server
pub mod server {
    pub use crate::api::server::{start_server, MAX_UPLOAD_BYTES};
}
