//! The conversion pipeline: source in, JSON text out.
//!
//! # Example
//!
//! ```rust,ignore
//! use csv2json::{convert_str, ConversionOptions};
//!
//! let output = convert_str("id;name\n1;Apfel", &ConversionOptions::default())?;
//! println!("{}", output.json);
//! ```

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::Path;

use super::cast::cast_field;
use super::headers::{derive_headers, grow_headers, synthetic_headers};
use crate::error::{ConvertError, ConvertResult};
use crate::parser;

/// User-facing delimiter names, as offered by the form and the CLI.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum DelimiterChoice {
    /// Detect from the first non-empty line.
    #[default]
    Auto,
    /// `,`
    Comma,
    /// `;`
    Semicolon,
    /// Tab character.
    Tab,
    /// `|`
    Pipe,
}

impl DelimiterChoice {
    /// The concrete delimiter character, or `None` for auto-detection.
    pub fn resolve(self) -> Option<char> {
        match self {
            DelimiterChoice::Auto => None,
            DelimiterChoice::Comma => Some(','),
            DelimiterChoice::Semicolon => Some(';'),
            DelimiterChoice::Tab => Some('\t'),
            DelimiterChoice::Pipe => Some('|'),
        }
    }

    /// Map a form value to a choice. Unknown values fall back to auto.
    pub fn from_form_value(value: &str) -> Self {
        match value {
            "comma" => DelimiterChoice::Comma,
            "semicolon" => DelimiterChoice::Semicolon,
            "tab" => DelimiterChoice::Tab,
            "pipe" => DelimiterChoice::Pipe,
            _ => DelimiterChoice::Auto,
        }
    }
}

/// Options for a single conversion. Immutable per invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionOptions {
    /// Field delimiter. `None` means detect from the first non-empty line.
    pub delimiter: Option<char>,

    /// Quoting character wrapping fields that contain delimiters or newlines.
    pub enclosure: char,

    /// Character representing a literal enclosure inside an enclosed field.
    pub escape: char,

    /// Treat the first row as column names.
    pub headers: bool,

    /// Coerce cells to null/bool/number where they match.
    pub cast: bool,

    /// Drop rows consisting of a single empty field.
    pub skip_empty: bool,

    /// Pretty-print the JSON output.
    pub pretty: bool,
}

impl Default for ConversionOptions {
    fn default() -> Self {
        Self {
            delimiter: None,
            enclosure: '"',
            escape: '\\',
            headers: true,
            cast: true,
            skip_empty: true,
            pretty: false,
        }
    }
}

/// Result of a conversion: the JSON text plus metadata for display.
#[derive(Debug, Clone, Serialize)]
pub struct ConvertOutput {
    /// The serialized JSON document.
    pub json: String,

    /// Detected or assumed source encoding.
    pub encoding: String,

    /// Resolved delimiter.
    pub delimiter: char,

    /// Final header set, including any synthetic names.
    pub headers: Vec<String>,

    /// Number of records in the document.
    pub record_count: usize,
}

/// Convert in-memory CSV text.
pub fn convert_str(source: &str, options: &ConversionOptions) -> ConvertResult<ConvertOutput> {
    convert_decoded(source, "utf-8".to_string(), options)
}

/// Convert raw CSV bytes, detecting the encoding first.
pub fn convert_bytes(bytes: &[u8], options: &ConversionOptions) -> ConvertResult<ConvertOutput> {
    let encoding = parser::detect_encoding(bytes);
    let content = parser::decode_content(bytes, &encoding);
    convert_decoded(&content, encoding, options)
}

/// Convert a CSV file from disk.
pub fn convert_file<P: AsRef<Path>>(
    path: P,
    options: &ConversionOptions,
) -> ConvertResult<ConvertOutput> {
    let bytes = parser::read_source(path)?;
    convert_bytes(&bytes, options)
}

/// Run the pipeline stages on decoded text.
fn convert_decoded(
    content: &str,
    encoding: String,
    options: &ConversionOptions,
) -> ConvertResult<ConvertOutput> {
    let content = parser::strip_bom(content);

    if content.trim().is_empty() {
        return Err(ConvertError::EmptyInput);
    }

    let delimiter = options
        .delimiter
        .unwrap_or_else(|| parser::detect_delimiter(content));

    let rows = parser::tokenize(
        content,
        delimiter,
        options.enclosure,
        options.escape,
        options.skip_empty,
    );

    let mut rows = rows.into_iter();
    let mut headers: Vec<String> = if options.headers {
        rows.next()
            .map(|first| derive_headers(&first))
            .unwrap_or_default()
    } else {
        Vec::new()
    };

    let mut records: Vec<Value> = Vec::new();

    for row in rows {
        // Without a header row the first data row fixes the initial width.
        if !options.headers && headers.is_empty() {
            headers = synthetic_headers(row.len());
        }

        // A wider row grows the header set for itself and everything after
        // it. Records already emitted keep their narrower shape.
        grow_headers(&mut headers, row.len());

        let mut record = Map::new();
        for (i, name) in headers.iter().enumerate() {
            let value = match row.get(i) {
                Some(raw) if options.cast => cast_field(raw),
                Some(raw) => Value::String(raw.clone()),
                None => Value::Null,
            };
            record.insert(name.clone(), value);
        }
        records.push(Value::Object(record));
    }

    let record_count = records.len();
    let document = Value::Array(records);

    let json = if options.pretty {
        serde_json::to_string_pretty(&document)?
    } else {
        serde_json::to_string(&document)?
    };

    Ok(ConvertOutput {
        json,
        encoding,
        delimiter,
        headers,
        record_count,
    })
}
