use std::path::{Component, Path, PathBuf};

use globset::{GlobBuilder, GlobMatcher};
use nk_core::{ErrorInfo, NkError};
use walkdir::WalkDir;

/// A candidate replicate directory found under the aggregation root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunDir {
    pub path: PathBuf,
    /// Path relative to the root, `/`-separated.
    pub relative: String,
    /// Name of the directory containing the run, when it lies below the root.
    pub treatment: Option<String>,
}

fn build_matcher(pattern: &str) -> Result<GlobMatcher, NkError> {
    GlobBuilder::new(pattern)
        .literal_separator(true)
        .build()
        .map(|glob| glob.compile_matcher())
        .map_err(|err| {
            NkError::Config(
                ErrorInfo::new("glob", err.to_string()).with_context("pattern", pattern),
            )
        })
}

fn pattern_depth(pattern: &str) -> usize {
    if pattern.contains("**") {
        usize::MAX
    } else {
        pattern.split('/').filter(|part| !part.is_empty()).count()
    }
}

fn normalise(path: &Path) -> Vec<String> {
    path.components()
        .filter_map(|component| match component {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect()
}

// Dot-prefixed entries are only visited where the pattern component at that
// depth itself starts with a dot.
fn hidden_allowed(components: &[&str], depth: usize) -> bool {
    depth
        .checked_sub(1)
        .and_then(|idx| components.get(idx))
        .is_some_and(|component| component.starts_with('.'))
}

/// Lists directories under `root` whose relative path matches `pattern`,
/// sorted by path. Hidden entries are skipped unless the pattern names them.
pub fn discover_runs(root: &Path, pattern: &str) -> Result<Vec<RunDir>, NkError> {
    let matcher = build_matcher(pattern)?;
    let components: Vec<&str> = pattern.split('/').filter(|part| !part.is_empty()).collect();
    let mut runs = Vec::new();
    let walker = WalkDir::new(root)
        .min_depth(1)
        .max_depth(pattern_depth(pattern))
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| {
            entry.depth() == 0
                || !entry.file_name().to_string_lossy().starts_with('.')
                || hidden_allowed(&components, entry.depth())
        });
    for entry in walker {
        let entry = entry.map_err(|err| {
            NkError::Io(
                ErrorInfo::new("discover-walk", err.to_string())
                    .with_context("root", root.display().to_string()),
            )
        })?;
        if !entry.file_type().is_dir() {
            continue;
        }
        let Ok(rel) = entry.path().strip_prefix(root) else {
            continue;
        };
        if !matcher.is_match(rel) {
            continue;
        }
        let parts = normalise(rel);
        let treatment = parts.len().checked_sub(2).map(|idx| parts[idx].clone());
        runs.push(RunDir {
            path: entry.path().to_path_buf(),
            relative: parts.join("/"),
            treatment,
        });
    }
    Ok(runs)
}

#[cfg(test)]
mod tests {
    use super::{hidden_allowed, pattern_depth};

    #[test]
    fn depth_follows_pattern_components() {
        assert_eq!(pattern_depth("*/[0-9]*"), 2);
        assert_eq!(pattern_depth("nk_*"), 1);
        assert_eq!(pattern_depth("runs/**/[0-9]*"), usize::MAX);
    }

    #[test]
    fn hidden_components_only_when_named() {
        assert!(!hidden_allowed(&["*", "[0-9]*"], 1));
        assert!(hidden_allowed(&[".archive", "[0-9]*"], 1));
        assert!(!hidden_allowed(&[".archive", "[0-9]*"], 2));
        assert!(!hidden_allowed(&["**"], 5));
    }
}
