//! Text primitives shared by the builder, the resolver and the aggregation helpers.

use unicode_normalization::{char::is_combining_mark, UnicodeNormalization};

/// Split a multi-valued cell on newlines and commas.
///
/// Tokens are trimmed and empty tokens are dropped, so `"A,\n B,,"` yields
/// `["A", "B"]`. Order follows the cell.
pub fn split_multi_value(raw: &str) -> Vec<String> {
    raw.split(['\n', ','])
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect()
}

/// Same as [`split_multi_value`] but keeps only the first occurrence of each token.
pub fn split_unique(raw: &str) -> Vec<String> {
    let mut tokens = split_multi_value(raw);
    let mut seen = std::collections::HashSet::new();
    tokens.retain(|token| seen.insert(token.clone()));
    tokens
}

/// Collapse every whitespace run (spaces, tabs, CR, LF) into one space and trim.
pub fn clean_name(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Stable key for a group label: trimmed, lower-cased, whitespace runs → `-`.
pub fn normalize_key(raw: &str) -> String {
    raw.split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("-")
}

/// Base-strength collation key: ignores case and diacritics.
pub fn collation_key(raw: &str) -> String {
    raw.nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Locale-style sort at base strength. Equal keys keep their relative order.
pub fn sort_collated(items: &mut [String]) {
    items.sort_by_cached_key(|item| collation_key(item));
}
