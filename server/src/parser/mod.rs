//! Source acquisition: encoding detection, delimiter detection and row
//! tokenization.
//!
//! Everything here produces plain rows of strings. Header handling and value
//! casting live in [`crate::convert`].

use crate::error::{ConvertError, ConvertResult};
use std::path::Path;

/// Delimiter candidates, tried in this order. On a tie the earlier candidate
/// wins.
pub const DELIMITER_CANDIDATES: [char; 4] = [',', ';', '\t', '|'];

/// Detect the encoding of raw bytes using chardet.
pub fn detect_encoding(bytes: &[u8]) -> String {
    let (charset, _, _) = chardet::detect(bytes);

    // Normalize charset names
    match charset.to_lowercase().as_str() {
        "ascii" | "utf-8" | "utf8" => "utf-8".to_string(),
        "iso-8859-1" | "iso-8859-15" | "latin-1" | "latin1" => "iso-8859-1".to_string(),
        "windows-1252" | "cp1252" => "windows-1252".to_string(),
        other => other.to_string(),
    }
}

/// Decode bytes to a string using the given encoding.
///
/// Unknown encodings fall back to lossy UTF-8, so decoding never fails;
/// unmappable bytes become replacement characters rather than aborting the
/// conversion.
pub fn decode_content(bytes: &[u8], encoding: &str) -> String {
    match encoding.to_lowercase().as_str() {
        "iso-8859-1" | "iso-8859-15" | "latin-1" | "latin1" => {
            encoding_rs::ISO_8859_15.decode(bytes).0.into_owned()
        }
        "windows-1252" | "cp1252" => encoding_rs::WINDOWS_1252.decode(bytes).0.into_owned(),
        _ => String::from_utf8_lossy(bytes).into_owned(),
    }
}

/// Strip a leading UTF-8 byte-order-mark, if present.
pub fn strip_bom(content: &str) -> &str {
    content.strip_prefix('\u{feff}').unwrap_or(content)
}

/// Detect the delimiter by counting candidate occurrences in the first
/// non-empty line.
///
/// Falls back to comma when the line is empty or absent.
pub fn detect_delimiter(content: &str) -> char {
    let first_line = content.lines().find(|line| !line.is_empty()).unwrap_or("");

    let mut best_sep = ',';
    let mut best_count = 0;

    for &sep in &DELIMITER_CANDIDATES {
        let count = first_line.matches(sep).count();
        if count > best_count {
            best_count = count;
            best_sep = sep;
        }
    }

    best_sep
}

/// Split source text into rows of string fields.
///
/// Enclosed fields may contain the delimiter, the enclosure and line breaks;
/// doubled enclosures and escape sequences unescape to a literal enclosure
/// character. Blank lines never produce a row. With `skip_empty`, rows that
/// consist of a single empty field (e.g. a line holding only `""`) are
/// dropped as well. Records the reader cannot make sense of are skipped, not
/// fatal.
pub fn tokenize(
    content: &str,
    delimiter: char,
    enclosure: char,
    escape: char,
    skip_empty: bool,
) -> Vec<Vec<String>> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter as u8)
        .quote(enclosure as u8)
        .escape(Some(escape as u8))
        .flexible(true)
        .has_headers(false)
        .from_reader(strip_bom(content).as_bytes());

    let mut rows = Vec::new();

    for record in reader.records() {
        let record = match record {
            Ok(r) => r,
            Err(_) => continue,
        };

        if skip_empty && record.len() <= 1 && record.get(0).map_or(true, |f| f.trim().is_empty()) {
            continue;
        }

        rows.push(record.iter().map(|field| field.to_string()).collect());
    }

    rows
}

/// Read a source file into raw bytes.
pub fn read_source<P: AsRef<Path>>(path: P) -> ConvertResult<Vec<u8>> {
    std::fs::read(path.as_ref()).map_err(ConvertError::from)
}
