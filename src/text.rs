//! String normalization

/// Collapse every whitespace run into a single space and trim both ends.
///
/// ```
/// use teigraph::normalize_string;
/// assert_eq!(normalize_string("  This is a    test   string.  "), "This is a test string.");
/// ```
pub fn normalize_string(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}
