//! Text normalization for extracted values. Pure transforms, no I/O.

/// Delimiter used in exported rows. [`escape_field`] keeps it out of values.
pub const FIELD_DELIMITER: char = ';';

/// Normalize a raw price string: keep digits and whitespace only, collapse
/// whitespace runs to a single space, trim. Callers apply this only to
/// non-sentinel prices; sentinels pass through untouched.
pub fn normalize_price(raw: &str) -> String {
    let digits: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || c.is_whitespace())
        .collect();
    digits.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Escape a value destined for a delimited row: the delimiter becomes a
/// comma, newlines and carriage returns become single spaces. Keeps raw
/// joined output lines structurally intact.
pub fn escape_field(value: &str) -> String {
    value
        .replace(FIELD_DELIMITER, ",")
        .replace(['\n', '\r'], " ")
}
