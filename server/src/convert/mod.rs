//! Conversion of tokenized rows into a JSON document.
//!
//! - [`headers`] - header derivation, dedup and width reconciliation
//! - [`cast`] - optional string-to-value coercion
//! - [`pipeline`] - the `convert_*` entry points tying all stages together

pub mod cast;
pub mod headers;
pub mod pipeline;

pub use cast::cast_field;
pub use headers::{derive_headers, grow_headers, synthetic_headers};
pub use pipeline::{
    convert_bytes, convert_file, convert_str, ConversionOptions, ConvertOutput, DelimiterChoice,
};
