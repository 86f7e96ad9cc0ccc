//! Header derivation and row/column width reconciliation.

use std::collections::HashSet;

/// Synthetic name for the column at `index` (zero-based).
fn synthetic_name(index: usize) -> String {
    format!("col{}", index + 1)
}

/// Generate `col1..colN` for a headerless source.
pub fn synthetic_headers(count: usize) -> Vec<String> {
    (0..count).map(synthetic_name).collect()
}

/// Derive column names from the first tokenized row.
///
/// Each header is trimmed; an empty result gets a synthetic `col{N}` name.
/// Duplicates are suffixed `_2`, `_3`, ... in order of appearance, with the
/// counter starting at 2 per base name.
pub fn derive_headers(fields: &[String]) -> Vec<String> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut headers = Vec::with_capacity(fields.len());

    for (i, raw) in fields.iter().enumerate() {
        let trimmed = raw.trim();
        let base = if trimmed.is_empty() {
            synthetic_name(i)
        } else {
            trimmed.to_string()
        };

        let mut name = base.clone();
        let mut k = 1usize;
        while seen.contains(&name) {
            k += 1;
            name = format!("{}_{}", base, k);
        }

        seen.insert(name.clone());
        headers.push(name);
    }

    headers
}

/// Grow the header set to `width` with synthetic names.
///
/// Called per data row, so the set widens as soon as a wider row shows up and
/// stays widened for the rows that follow. Records emitted before the growth
/// keep their narrower shape; they are not revisited.
pub fn grow_headers(headers: &mut Vec<String>, width: usize) {
    while headers.len() < width {
        headers.push(synthetic_name(headers.len()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn owned(fields: &[&str]) -> Vec<String> {
        fields.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_plain_headers_pass_through() {
        assert_eq!(
            derive_headers(&owned(&["id", "name", "price"])),
            vec!["id", "name", "price"]
        );
    }

    #[test]
    fn test_headers_are_trimmed() {
        assert_eq!(derive_headers(&owned(&["  id ", "name"])), vec!["id", "name"]);
    }

    #[test]
    fn test_duplicate_headers_get_suffixes() {
        assert_eq!(
            derive_headers(&owned(&["id", "name", "id"])),
            vec!["id", "name", "id_2"]
        );
    }

    #[test]
    fn test_triplicate_headers_count_up() {
        assert_eq!(
            derive_headers(&owned(&["id", "id", "id"])),
            vec!["id", "id_2", "id_3"]
        );
    }

    #[test]
    fn test_suffix_skips_taken_names() {
        // "id_2" is already claimed, so the duplicate of "id" moves on to _3.
        assert_eq!(
            derive_headers(&owned(&["id", "id_2", "id", "id"])),
            vec!["id", "id_2", "id_3", "id_4"]
        );
    }

    #[test]
    fn test_empty_header_becomes_synthetic() {
        assert_eq!(
            derive_headers(&owned(&["id", "", "price"])),
            vec!["id", "col2", "price"]
        );
        assert_eq!(derive_headers(&owned(&["id", "   ", "price"]))[1], "col2");
    }

    #[test]
    fn test_synthetic_headers_from_count() {
        assert_eq!(synthetic_headers(3), vec!["col1", "col2", "col3"]);
        assert!(synthetic_headers(0).is_empty());
    }

    #[test]
    fn test_grow_headers_appends_synthetics() {
        let mut headers = vec!["id".to_string(), "name".to_string()];
        grow_headers(&mut headers, 4);
        assert_eq!(headers, vec!["id", "name", "col3", "col4"]);

        // Never shrinks.
        grow_headers(&mut headers, 2);
        assert_eq!(headers.len(), 4);
    }
}
