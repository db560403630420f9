//! Glob expansion over a directory tree.
//!
//! A pattern is an ordered list of segments. `**` as a whole segment
//! matches zero or more directory levels; `*` inside a segment matches any
//! run of characters within one path component (so `*` alone matches
//! exactly one component, `*.rb` one component with that suffix). Matching
//! is applied to each file's path relative to the expansion root.
//!
//! Results are regular files only, lexicographically sorted and
//! deduplicated, so downstream namespace construction is reproducible
//! across runs.

use std::path::{Path, PathBuf};

use autoload_core::ExpandError;
use walkdir::WalkDir;

/// Enumerate files under `root` matching the pattern segments.
///
/// Returned paths are prefixed with `root` (absolute whenever `root` is).
/// A traversal error aborts only this call.
#[cfg_attr(feature = "profiling", profiling::function)]
pub fn expand(root: &Path, segments: &[&str]) -> Result<Vec<PathBuf>, ExpandError> {
    let mut matches = Vec::new();

    for entry in WalkDir::new(root) {
        let entry = entry.map_err(|source| ExpandError::Walk {
            path: source
                .path()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| root.to_path_buf()),
            source,
        })?;

        if !entry.file_type().is_file() {
            continue;
        }
        let Ok(rel) = entry.path().strip_prefix(root) else {
            continue;
        };
        let Some(components) = rel
            .iter()
            .map(|c| c.to_str())
            .collect::<Option<Vec<&str>>>()
        else {
            // Non-UTF-8 components can never match a pattern.
            continue;
        };

        if matches_segments(segments, &components) {
            matches.push(entry.into_path());
        }
    }

    matches.sort();
    matches.dedup();
    Ok(matches)
}

/// Match pattern segments against path components.
fn matches_segments(pattern: &[&str], components: &[&str]) -> bool {
    match pattern.split_first() {
        None => components.is_empty(),
        Some((&"**", rest)) => {
            (0..=components.len()).any(|skip| matches_segments(rest, &components[skip..]))
        }
        Some((segment, rest)) => match components.split_first() {
            Some((component, remaining)) => {
                matches_component(segment, component) && matches_segments(rest, remaining)
            }
            None => false,
        },
    }
}

/// Match one segment against one component; `*` matches any run of
/// characters. Classic two-pointer wildcard match with backtracking.
fn matches_component(pattern: &str, component: &str) -> bool {
    let pat: Vec<char> = pattern.chars().collect();
    let text: Vec<char> = component.chars().collect();
    let (mut p, mut t) = (0, 0);
    let mut star: Option<(usize, usize)> = None;

    while t < text.len() {
        if p < pat.len() && pat[p] != '*' && pat[p] == text[t] {
            p += 1;
            t += 1;
        } else if p < pat.len() && pat[p] == '*' {
            star = Some((p, t));
            p += 1;
        } else if let Some((sp, st)) = star {
            p = sp + 1;
            t = st + 1;
            star = Some((sp, st + 1));
        } else {
            return false;
        }
    }
    while p < pat.len() && pat[p] == '*' {
        p += 1;
    }
    p == pat.len()
}
