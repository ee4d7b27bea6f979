//! Source collection by recursive glob.
//!
//! Each configured pattern is matched against every path below the project
//! root, at any depth: `*.py` behaves like `**/*.py`. `*` never crosses a
//! path separator and dot-prefixed names are matched like any other, so
//! hidden-file policy is left entirely to the copier.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use glob::{MatchOptions, Pattern};
use walkdir::WalkDir;

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// A configured source pattern in its recursive, matchable form.
#[derive(Debug, Clone)]
pub struct SourcePattern {
    pattern: Pattern,
    directories_only: bool,
}

impl SourcePattern {
    /// Glob text actually matched against project-relative paths.
    pub fn as_str(&self) -> &str {
        self.pattern.as_str()
    }

    /// Whether the pattern was written with a trailing `/`.
    pub fn directories_only(&self) -> bool {
        self.directories_only
    }

    pub fn matches(&self, relative: &Path, is_dir: bool) -> bool {
        (is_dir || !self.directories_only)
            && self.pattern.matches_path_with(relative, MATCH_OPTIONS)
    }
}

/// Compile a configured pattern into its recursive form.
///
/// Leading `./` segments are dropped and a trailing `/` restricts the
/// pattern to directories, so `./src` and `src/` both select `src`.
pub fn compile_pattern(pattern: &str) -> Result<SourcePattern, CollectError> {
    let mut normalized = pattern;
    while let Some(rest) = normalized.strip_prefix("./") {
        normalized = rest.trim_start_matches('/');
    }
    let trimmed = normalized.trim_end_matches('/');
    let directories_only = trimmed.len() != normalized.len();

    if trimmed.is_empty() || trimmed == "." {
        return Err(CollectError::EmptyPattern(pattern.to_owned()));
    }

    let recursive = if trimmed.starts_with("**/") || trimmed == "**" {
        trimmed.to_owned()
    } else {
        format!("**/{trimmed}")
    };
    let compiled = Pattern::new(&recursive).map_err(|e| CollectError::InvalidPattern {
        pattern: pattern.to_owned(),
        source: e,
    })?;
    Ok(SourcePattern {
        pattern: compiled,
        directories_only,
    })
}

/// Compile every configured pattern, failing on the first invalid one.
pub fn compile_patterns(patterns: &[String]) -> Result<Vec<SourcePattern>, CollectError> {
    patterns.iter().map(|p| compile_pattern(p)).collect()
}

/// Expand `patterns` under `project_dir` into the set of matching files and
/// directories (absolute paths, deduplicated across patterns).
///
/// Symlinked directories are not descended into; a symlink whose own path
/// matches is still returned.
pub fn collect_matches(
    patterns: &[String],
    project_dir: &Path,
) -> Result<BTreeSet<PathBuf>, CollectError> {
    let compiled = compile_patterns(patterns)?;
    Ok(collect_compiled(&compiled, project_dir))
}

/// [`collect_matches`] over patterns that were already compiled.
pub fn collect_compiled(patterns: &[SourcePattern], project_dir: &Path) -> BTreeSet<PathBuf> {
    let mut matches = BTreeSet::new();
    if patterns.is_empty() {
        return matches;
    }

    for entry in WalkDir::new(project_dir).min_depth(1).follow_links(false) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!(
                    path = ?e.path(),
                    error = %e,
                    "failed to read directory entry; skipping"
                );
                continue;
            }
        };

        let Ok(relative) = entry.path().strip_prefix(project_dir) else {
            continue;
        };
        let is_dir = entry.file_type().is_dir();
        if patterns
            .iter()
            .any(|pattern| pattern.matches(relative, is_dir))
        {
            tracing::trace!(path = %relative.display(), "matched");
            matches.insert(entry.into_path());
        }
    }

    tracing::debug!(
        patterns = ?patterns.iter().map(SourcePattern::as_str).collect::<Vec<_>>(),
        matched = matches.len(),
        "source patterns expanded"
    );
    matches
}

#[derive(Debug, thiserror::Error)]
pub enum CollectError {
    #[error("source pattern {0:?} selects nothing once normalized")]
    EmptyPattern(String),

    #[error("invalid glob pattern {pattern:?}")]
    InvalidPattern {
        pattern: String,
        source: glob::PatternError,
    },
}
