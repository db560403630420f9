//! Canonical identifier derivation from snake-case path segments.
//!
//! Directory and file names are expected to use snake case; the namespace
//! and symbol names derived from them use camel case. The conversion is
//! pure and total: anything that is not an underscore-lowercase pair passes
//! through unchanged.

/// Converts a snake_case segment to its canonical CamelCase identifier.
///
/// The first character is uppercased. Every underscore directly followed by
/// a lowercase letter is removed and that letter uppercased. All other
/// characters pass through unchanged.
///
/// ```
/// use autoload_core::canonical::canonicalize;
///
/// assert_eq!(canonicalize("line_item"), "LineItem");
/// assert_eq!(canonicalize("run"), "Run");
/// assert_eq!(canonicalize("a_b_c"), "ABC");
/// ```
pub fn canonicalize(segment: &str) -> String {
    let mut out = String::with_capacity(segment.len());
    let mut chars = segment.chars().peekable();
    let mut first = true;
    while let Some(ch) = chars.next() {
        match chars.peek() {
            Some(&next) if ch == '_' && next.is_lowercase() => {
                chars.next();
                out.extend(next.to_uppercase());
            }
            _ if first => out.extend(ch.to_uppercase()),
            _ => out.push(ch),
        }
        first = false;
    }
    out
}

/// Returns the path with any leading or trailing separators removed.
pub fn clean_path(path: &str) -> &str {
    path.trim_start_matches('/').trim_end_matches('/')
}

/// Returns the nested canonical namespace names for a directory path.
///
/// The first `depth` segments are ignored; the remaining segments are
/// canonicalized in order. `"."` and paths with no segments past `depth`
/// yield an empty list.
///
/// ```
/// use autoload_core::canonical::module_names;
///
/// assert_eq!(module_names(".", 0), Vec::<String>::new());
/// assert_eq!(module_names("app/models/billing", 2), vec!["Billing"]);
/// assert_eq!(module_names("app/models/billing", 3), Vec::<String>::new());
/// ```
pub fn module_names(dir_path: &str, depth: usize) -> Vec<String> {
    let cleaned = clean_path(dir_path);
    if cleaned.is_empty() || cleaned == "." {
        return Vec::new();
    }
    let segments: Vec<&str> = cleaned.split('/').collect();
    if depth >= segments.len() {
        return Vec::new();
    }
    segments[depth..].iter().map(|s| canonicalize(s)).collect()
}
