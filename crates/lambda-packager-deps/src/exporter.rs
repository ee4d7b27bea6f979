use std::path::{Path, PathBuf};

use crate::executor::{CommandExecutor, RealExecutor};
use crate::process::{CommandSpec, ProcessError, args};

/// Converts a dependency manager's lock file into requirements format.
pub trait Exporter {
    /// Write the locked dependency closure of `project_dir` to `destination`.
    fn export(&self, project_dir: &Path, destination: &Path) -> Result<String, ExportError>;
}

/// `poetry export` run from the project directory.
pub struct PoetryExporter<E: CommandExecutor = RealExecutor> {
    poetry: String,
    executor: E,
}

impl PoetryExporter<RealExecutor> {
    pub fn new(poetry: &str) -> Self {
        Self::with_executor(poetry, RealExecutor)
    }
}

impl<E: CommandExecutor> PoetryExporter<E> {
    pub fn with_executor(poetry: &str, executor: E) -> Self {
        Self {
            poetry: poetry.to_owned(),
            executor,
        }
    }
}

impl<E: CommandExecutor> Exporter for PoetryExporter<E> {
    fn export(&self, project_dir: &Path, destination: &Path) -> Result<String, ExportError> {
        let destination_str = destination
            .to_str()
            .ok_or_else(|| ExportError::InvalidPath(destination.to_path_buf()))?;

        let command = CommandSpec::new(
            &self.poetry,
            args([
                "export",
                "--format",
                "requirements.txt",
                "--output",
                destination_str,
                "--without-hashes",
            ]),
        )
        .in_dir(project_dir.to_path_buf());

        tracing::info!(destination = %destination.display(), "exporting poetry lock to requirements format");
        let output = self
            .executor
            .exec(&command)
            .map_err(|e| ExportError::Poetry { source: e })?;

        if !destination.is_file() {
            return Err(ExportError::NotWritten(destination.to_path_buf()));
        }
        Ok(output)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("path is not valid UTF-8: {0}")]
    InvalidPath(PathBuf),

    #[error("poetry export failed")]
    Poetry { source: ProcessError },

    #[error("lock export reported success but wrote nothing to {0}")]
    NotWritten(PathBuf),
}
