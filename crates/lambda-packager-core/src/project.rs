//! Project layout and dependency source selection.
//!
//! A project is a directory holding Python sources and, optionally, one of
//! two dependency descriptions:
//!
//! - `requirements.txt`: installed with full dependency resolution
//! - a Poetry manifest (`pyproject.toml` with `[tool.poetry]`, or a
//!   `poetry.lock` beside it): exported to requirements format and installed
//!   without resolution, since the lock already pins the full closure

use std::path::{Path, PathBuf};

use crate::config::PYPROJECT_FILE;

/// Plain requirements file at the project root.
pub const REQUIREMENTS_FILE: &str = "requirements.txt";

/// Poetry lock file at the project root.
pub const POETRY_LOCK_FILE: &str = "poetry.lock";

/// Archive location, relative to the project root.
pub const ARCHIVE_RELATIVE_PATH: &str = "dist/lambda.zip";

/// Where a run gets its third-party dependencies from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DependencySource {
    /// `requirements.txt` at the project root, installed with resolution.
    Requirements { path: PathBuf },
    /// Poetry-managed project; the lock is exported into the staging area
    /// and installed with resolution disabled.
    Poetry { project_dir: PathBuf },
    /// Nothing to install.
    None,
}

impl DependencySource {
    /// Path of the requirements file the installer should consume.
    ///
    /// For Poetry this is where the export will be written inside `staging_dir`.
    pub fn requirements_path(&self, staging_dir: &Path) -> Option<PathBuf> {
        match self {
            Self::Requirements { path } => Some(path.clone()),
            Self::Poetry { .. } => Some(staging_dir.join(REQUIREMENTS_FILE)),
            Self::None => None,
        }
    }

    /// Whether the installer must skip transitive dependency resolution.
    pub fn no_deps(&self) -> bool {
        matches!(self, Self::Poetry { .. })
    }

    /// Short human-readable name.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Requirements { .. } => "requirements.txt",
            Self::Poetry { .. } => "poetry export",
            Self::None => "none",
        }
    }
}

impl std::fmt::Display for DependencySource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Resolved locations inside a project directory.
///
/// # Examples
///
/// ```no_run
/// use lambda_packager_core::ProjectLayout;
/// use std::path::Path;
///
/// let layout = ProjectLayout::discover(Path::new(".")).unwrap();
/// println!("archive: {}", layout.archive_path().display());
/// println!("dependencies: {}", layout.dependency_source());
/// ```
#[derive(Debug, Clone)]
pub struct ProjectLayout {
    /// Absolute path to the project directory
    pub root: PathBuf,
}

impl ProjectLayout {
    /// Resolve `project_dir` to an absolute, existing directory.
    ///
    /// # Errors
    ///
    /// - [`Error::ProjectDirMissing`](crate::Error::ProjectDirMissing) if the path is not a directory
    /// - [`Error::ProjectDirResolve`](crate::Error::ProjectDirResolve) if it cannot be canonicalized
    pub fn discover(project_dir: &Path) -> crate::Result<Self> {
        if !project_dir.is_dir() {
            return Err(crate::Error::ProjectDirMissing {
                path: project_dir.to_path_buf(),
            });
        }
        let root = project_dir
            .canonicalize()
            .map_err(|e| crate::Error::ProjectDirResolve {
                path: project_dir.to_path_buf(),
                source: e,
            })?;
        tracing::debug!(root = %root.display(), "project directory resolved");
        Ok(Self { root })
    }

    pub fn requirements_file(&self) -> PathBuf {
        self.root.join(REQUIREMENTS_FILE)
    }

    pub fn pyproject_file(&self) -> PathBuf {
        self.root.join(PYPROJECT_FILE)
    }

    pub fn poetry_lock_file(&self) -> PathBuf {
        self.root.join(POETRY_LOCK_FILE)
    }

    pub fn archive_path(&self) -> PathBuf {
        self.root.join(ARCHIVE_RELATIVE_PATH)
    }

    /// Select the dependency strategy for this project.
    ///
    /// Priority:
    /// 1. `requirements.txt` at the root
    /// 2. Poetry manifest
    /// 3. None
    pub fn dependency_source(&self) -> DependencySource {
        let requirements = self.requirements_file();
        if requirements.is_file() {
            tracing::info!(path = %requirements.display(), "using requirements.txt file in project directory");
            return DependencySource::Requirements { path: requirements };
        }

        if self.uses_poetry() {
            tracing::info!(path = %self.pyproject_file().display(), "using poetry lock export");
            return DependencySource::Poetry {
                project_dir: self.root.clone(),
            };
        }

        tracing::warn!("no dependency source found, none will be packaged");
        DependencySource::None
    }

    /// Whether the project is managed by Poetry.
    ///
    /// True when `pyproject.toml` exists and either declares `[tool.poetry]`
    /// or has a `poetry.lock` next to it.
    pub fn uses_poetry(&self) -> bool {
        let pyproject = self.pyproject_file();
        if !pyproject.is_file() {
            return false;
        }
        if self.poetry_lock_file().is_file() {
            return true;
        }

        let content = match std::fs::read_to_string(&pyproject) {
            Ok(c) => c,
            Err(e) => {
                tracing::warn!(path = %pyproject.display(), error = %e, "failed to read pyproject.toml; assuming poetry is not used");
                return false;
            }
        };
        match toml::from_str::<toml::Table>(&content) {
            Ok(document) => declares_poetry(&document),
            Err(e) => {
                tracing::warn!(path = %pyproject.display(), error = %e, "failed to parse pyproject.toml; assuming poetry is not used");
                false
            }
        }
    }
}

fn declares_poetry(document: &toml::Table) -> bool {
    document
        .get("tool")
        .and_then(|tool| tool.get("poetry"))
        .is_some_and(toml::Value::is_table)
}
