//! Spec file discovery under a session root

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;
use wildmatch::WildMatch;

/// Glob metacharacters recognised in patterns
fn has_glob(pattern: &str) -> bool {
    pattern.contains(['*', '?', '['])
}

fn has_separator(pattern: &str) -> bool {
    pattern.contains('/') || pattern.contains(std::path::MAIN_SEPARATOR)
}

/// Shell-style match where `*` and `?` never cross a `/`
fn glob_match_segments(pattern: &str, candidate: &str) -> bool {
    let pattern_parts: Vec<&str> = pattern.split('/').collect();
    let candidate_parts: Vec<&str> = candidate.split('/').collect();

    pattern_parts.len() == candidate_parts.len()
        && pattern_parts
            .iter()
            .zip(&candidate_parts)
            .all(|(p, c)| WildMatch::new(p).matches(c))
}

/// Root-relative path with `/` separators
fn relative_slash_path(root: &Path, path: &Path) -> String {
    let rel = path.strip_prefix(root).unwrap_or(path);
    rel.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// Whether a single file matches a single pattern
pub fn matches_pattern(pattern: &str, relative: &str, base: &str) -> bool {
    if !has_glob(pattern) && !has_separator(pattern) {
        return base == pattern;
    }

    if has_separator(pattern) {
        let pattern = pattern.replace(std::path::MAIN_SEPARATOR, "/");
        glob_match_segments(&pattern, relative)
    } else {
        WildMatch::new(pattern).matches(base)
    }
}

/// Walk `root` and return every file matching one of `patterns`.
///
/// Results keep walk order (sorted by file name within a directory) with
/// duplicates removed. An empty result means no spec was found.
pub fn discover(root: &Path, patterns: &[String]) -> Result<Vec<PathBuf>, walkdir::Error> {
    let mut matches = Vec::new();

    for entry in WalkDir::new(root).follow_links(false).sort_by_file_name() {
        let entry = entry?;
        let path = entry.path();
        // symlinked files count; symlinked directories are not descended
        if !path.is_file() {
            continue;
        }

        let relative = relative_slash_path(root, path);
        let base = entry.file_name().to_string_lossy();

        if patterns.iter().any(|pat| matches_pattern(pat, &relative, &base)) {
            tracing::debug!(path = %path.display(), "Spec candidate");
            matches.push(path.to_path_buf());
        }
    }

    Ok(distinct(matches))
}

fn distinct(paths: Vec<PathBuf>) -> Vec<PathBuf> {
    let mut seen = HashSet::with_capacity(paths.len());
    paths.into_iter().filter(|p| seen.insert(p.clone())).collect()
}
