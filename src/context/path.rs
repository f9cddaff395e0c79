//! Request path canonicalization for exact-match configuration lookup.

/// Canonicalize a request path.
///
/// - empty input becomes `/`
/// - a single trailing `/` is stripped from any non-root path
///
/// No other rewriting happens (no prefix or wildcard semantics).
pub fn normalize_path(path: &str) -> String {
    if path.is_empty() {
        return "/".to_string();
    }
    if path.len() > 1 {
        if let Some(stripped) = path.strip_suffix('/') {
            return stripped.to_string();
        }
    }
    path.to_string()
}

/// Normalize an optional path field, treating absence like the empty string.
pub fn normalize_opt_path(path: Option<&str>) -> String {
    normalize_path(path.unwrap_or(""))
}
