//! Helper utility functions

/// Parse a computed `z-index` the way `parseInt(..) || 0` would
pub fn parse_z_index(value: &str) -> i32 {
    let value = value.trim();
    let end = value
        .char_indices()
        .find(|&(i, c)| !(c.is_ascii_digit() || (i == 0 && (c == '-' || c == '+'))))
        .map(|(i, _)| i)
        .unwrap_or(value.len());
    value[..end].parse().unwrap_or(0)
}

/// Parse a computed `opacity`, defaulting to fully opaque
pub fn parse_opacity(value: &str) -> f64 {
    value.trim().parse().unwrap_or(1.0)
}

/// Collapse runs of whitespace to one space and trim the ends
pub fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Case-insensitive check for any keyword inside any of the haystacks.
/// Keywords must already be lower-case.
pub fn find_keyword<'a>(haystacks: &[&str], keywords: &'a [String]) -> Option<&'a str> {
    keywords
        .iter()
        .find(|keyword| haystacks.iter().any(|h| h.contains(keyword.as_str())))
        .map(|k| k.as_str())
}
