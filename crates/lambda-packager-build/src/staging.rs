use std::path::{Path, PathBuf};

const STAGING_PREFIX: &str = "lambda-packager-";

/// Scratch directory where dependencies and sources are assembled.
///
/// Created empty under the system temp directory and removed on drop unless
/// [`keep`](Self::keep) is called.
#[derive(Debug)]
pub struct StagingDirectory {
    dir: tempfile::TempDir,
}

impl StagingDirectory {
    /// Create a fresh staging directory for `project_dir`.
    ///
    /// Fails if the new directory would sit inside the project, since the
    /// collector would then pick up staged files as project sources.
    pub fn create_for(project_dir: &Path) -> Result<Self, StagingError> {
        let dir = tempfile::Builder::new()
            .prefix(STAGING_PREFIX)
            .tempdir()
            .map_err(|e| StagingError::Create { source: e })?;

        let staged = dir.path().canonicalize().map_err(|e| StagingError::Resolve {
            path: dir.path().to_path_buf(),
            source: e,
        })?;
        if staged.starts_with(project_dir) {
            return Err(StagingError::InsideProject {
                staging: staged,
                project: project_dir.to_path_buf(),
            });
        }

        tracing::debug!(path = %dir.path().display(), "staging directory created");
        Ok(Self { dir })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Leave the directory on disk and return its path.
    pub fn keep(self) -> PathBuf {
        self.dir.keep()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StagingError {
    #[error("failed to create staging directory")]
    Create { source: std::io::Error },

    #[error("failed to resolve staging directory {path}")]
    Resolve {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("staging directory {staging} lies inside project {project}; point TMPDIR elsewhere")]
    InsideProject { staging: PathBuf, project: PathBuf },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn staging_is_fresh_and_empty() {
        let project = tempfile::TempDir::new().unwrap();
        let staging = StagingDirectory::create_for(project.path()).unwrap();

        assert!(staging.path().is_dir());
        assert_eq!(std::fs::read_dir(staging.path()).unwrap().count(), 0);
        assert_ne!(staging.path(), project.path());
    }

    #[test]
    fn staging_directories_are_unique() {
        let project = tempfile::TempDir::new().unwrap();
        let first = StagingDirectory::create_for(project.path()).unwrap();
        let second = StagingDirectory::create_for(project.path()).unwrap();

        assert_ne!(first.path(), second.path());
    }

    #[test]
    fn staging_removed_on_drop() {
        let project = tempfile::TempDir::new().unwrap();
        let staging = StagingDirectory::create_for(project.path()).unwrap();
        let path = staging.path().to_path_buf();
        drop(staging);

        assert!(!path.exists());
    }

    #[test]
    fn keep_leaves_directory_on_disk() {
        let project = tempfile::TempDir::new().unwrap();
        let staging = StagingDirectory::create_for(project.path()).unwrap();
        let path = staging.keep();

        assert!(path.is_dir());
        std::fs::remove_dir_all(&path).unwrap();
    }
}
