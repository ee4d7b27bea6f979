//! Copying collected sources into the staging directory.
//!
//! Every matched object lands at its project-relative path inside staging.
//! Directories are merged into whatever the dependency install already put
//! there. With hidden-file filtering on, [`is_hidden`] decides for both
//! directly matched files and entries met while walking a matched directory.

use std::collections::BTreeSet;
use std::path::{Component, Path, PathBuf};

use walkdir::WalkDir;

/// Whether a project-relative path has any `.`-prefixed component.
pub fn is_hidden(relative: &Path) -> bool {
    relative.components().any(|component| match component {
        Component::Normal(name) => name.to_string_lossy().starts_with('.'),
        _ => false,
    })
}

/// What the copier did with each matched object.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CopyReport {
    /// Staging-relative paths written (files and directory roots)
    pub copied: Vec<PathBuf>,
    /// Project-relative paths excluded as hidden
    pub hidden: Vec<PathBuf>,
    /// Project-relative paths that were neither file nor directory
    pub unsupported: Vec<PathBuf>,
}

impl CopyReport {
    pub fn skipped(&self) -> usize {
        self.hidden.len() + self.unsupported.len()
    }
}

/// Copy every path in `matches` from `project_dir` into `staging_dir`.
pub fn copy_matches(
    matches: &BTreeSet<PathBuf>,
    project_dir: &Path,
    staging_dir: &Path,
    ignore_hidden_files: bool,
) -> Result<CopyReport, CopyError> {
    tracing::info!(count = matches.len(), "copying matching objects");

    let mut report = CopyReport::default();
    for object in matches {
        let relative = object
            .strip_prefix(project_dir)
            .map_err(|_| CopyError::OutsideProject {
                path: object.clone(),
                project: project_dir.to_path_buf(),
            })?;
        let destination = staging_dir.join(relative);

        if ignore_hidden_files && is_hidden(relative) {
            tracing::warn!(path = %object.display(), "skipping hidden path");
            report.hidden.push(relative.to_path_buf());
        } else if object.is_file() {
            tracing::debug!(from = %object.display(), to = %destination.display(), "copying file");
            copy_file(object, &destination)?;
            report.copied.push(relative.to_path_buf());
        } else if object.is_dir() {
            tracing::debug!(from = %object.display(), to = %destination.display(), "copying directory");
            copy_dir(object, project_dir, &destination, ignore_hidden_files, &mut report)?;
            report.copied.push(relative.to_path_buf());
        } else {
            tracing::warn!(path = %object.display(), "path is neither a file nor a directory; skipping");
            report.unsupported.push(relative.to_path_buf());
        }
    }

    tracing::info!(
        copied = report.copied.len(),
        skipped = report.skipped(),
        "source copy finished"
    );
    Ok(report)
}

fn copy_file(from: &Path, to: &Path) -> Result<(), CopyError> {
    if let Some(parent) = to.parent() {
        std::fs::create_dir_all(parent).map_err(|e| CopyError::CreateDir {
            path: parent.to_path_buf(),
            source: e,
        })?;
    }
    std::fs::copy(from, to).map_err(|e| CopyError::CopyFile {
        path: from.to_path_buf(),
        source: e,
    })?;
    Ok(())
}

/// Recursively merge `source` into `destination`, pruning hidden entries.
fn copy_dir(
    source: &Path,
    project_dir: &Path,
    destination: &Path,
    ignore_hidden_files: bool,
    report: &mut CopyReport,
) -> Result<(), CopyError> {
    std::fs::create_dir_all(destination).map_err(|e| CopyError::CreateDir {
        path: destination.to_path_buf(),
        source: e,
    })?;

    let mut hidden = Vec::new();
    let walker = WalkDir::new(source)
        .min_depth(1)
        .follow_links(true)
        .into_iter()
        .filter_entry(|entry| {
            let Ok(relative) = entry.path().strip_prefix(project_dir) else {
                return true;
            };
            if ignore_hidden_files && is_hidden(relative) {
                tracing::warn!(path = %entry.path().display(), "skipping hidden path");
                hidden.push(relative.to_path_buf());
                return false;
            }
            true
        });

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) if is_dangling(&e) => {
                let path = e.path().unwrap_or(source);
                tracing::warn!(path = %path.display(), error = %e, "path is neither a file nor a directory; skipping");
                report
                    .unsupported
                    .push(project_relative(path, project_dir)?);
                continue;
            }
            Err(e) => {
                return Err(CopyError::Walk {
                    path: source.to_path_buf(),
                    source: e,
                });
            }
        };

        let relative = entry
            .path()
            .strip_prefix(source)
            .map_err(|_| CopyError::OutsideProject {
                path: entry.path().to_path_buf(),
                project: project_dir.to_path_buf(),
            })?;
        let target = destination.join(relative);
        let file_type = entry.file_type();

        if file_type.is_dir() {
            std::fs::create_dir_all(&target).map_err(|e| CopyError::CreateDir {
                path: target.clone(),
                source: e,
            })?;
        } else if file_type.is_file() {
            copy_file(entry.path(), &target)?;
        } else {
            tracing::warn!(path = %entry.path().display(), "path is neither a file nor a directory; skipping");
            report
                .unsupported
                .push(project_relative(entry.path(), project_dir)?);
        }
    }

    report.hidden.append(&mut hidden);
    Ok(())
}

fn project_relative(path: &Path, project_dir: &Path) -> Result<PathBuf, CopyError> {
    path.strip_prefix(project_dir)
        .map(Path::to_path_buf)
        .map_err(|_| CopyError::OutsideProject {
            path: path.to_path_buf(),
            project: project_dir.to_path_buf(),
        })
}

/// Broken symlinks and symlink loops are skipped rather than failing the run.
fn is_dangling(error: &walkdir::Error) -> bool {
    error.loop_ancestor().is_some()
        || error
            .io_error()
            .is_some_and(|e| e.kind() == std::io::ErrorKind::NotFound)
}

#[derive(Debug, thiserror::Error)]
pub enum CopyError {
    #[error("matched path {path} is not inside project {project}")]
    OutsideProject { path: PathBuf, project: PathBuf },

    #[error("failed to create directory {path}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to copy file {path}")]
    CopyFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to walk directory {path}")]
    Walk {
        path: PathBuf,
        source: walkdir::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_paths_are_not_hidden() {
        assert!(!is_hidden(Path::new("handler.py")));
        assert!(!is_hidden(Path::new("src/pkg/mod.py")));
        assert!(!is_hidden(Path::new("src/my.module/a.py")));
    }

    #[test]
    fn dot_component_anywhere_is_hidden() {
        assert!(is_hidden(Path::new(".env")));
        assert!(is_hidden(Path::new("src/.hidden/config.py")));
        assert!(is_hidden(Path::new("src/.hidden")));
        assert!(is_hidden(Path::new("a/b/.c")));
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        fn visible_segment() -> impl Strategy<Value = String> {
            "[a-zA-Z0-9_][a-zA-Z0-9_.-]{0,10}"
        }

        proptest! {
            #[test]
            fn visible_segments_never_hidden(
                segments in proptest::collection::vec(visible_segment(), 1..6),
            ) {
                let path: PathBuf = segments.iter().collect();
                prop_assert!(!is_hidden(&path));
            }

            #[test]
            fn one_dot_segment_always_hidden(
                segments in proptest::collection::vec(visible_segment(), 0..5),
                hidden in "\\.[a-z0-9_]{1,8}",
                position in 0usize..6,
            ) {
                let mut segments = segments;
                let position = position.min(segments.len());
                segments.insert(position, hidden);
                let path: PathBuf = segments.iter().collect();
                prop_assert!(is_hidden(&path));
            }
        }
    }
}
