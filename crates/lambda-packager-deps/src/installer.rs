use std::path::{Path, PathBuf};

use crate::executor::{CommandExecutor, RealExecutor};
use crate::process::{CommandSpec, ProcessError, args};

/// Materializes the packages listed in a requirements file into a directory.
pub trait Installer {
    /// Install every requirement in `requirements` under `target`.
    ///
    /// With `no_deps`, transitive dependencies are not pulled in. Returns the
    /// installer's captured output.
    fn install(
        &self,
        requirements: &Path,
        target: &Path,
        no_deps: bool,
    ) -> Result<String, InstallError>;
}

/// `pip install -r <requirements> --target <target>` run through a Python
/// interpreter, parameterized over the executor for testability.
pub struct PipInstaller<E: CommandExecutor = RealExecutor> {
    python: String,
    executor: E,
}

impl PipInstaller<RealExecutor> {
    pub fn new(python: &str) -> Self {
        Self::with_executor(python, RealExecutor)
    }
}

impl<E: CommandExecutor> PipInstaller<E> {
    pub fn with_executor(python: &str, executor: E) -> Self {
        Self {
            python: python.to_owned(),
            executor,
        }
    }

    fn command(
        &self,
        requirements: &Path,
        target: &Path,
        no_deps: bool,
    ) -> Result<CommandSpec, InstallError> {
        let requirements_str = requirements
            .to_str()
            .ok_or_else(|| InstallError::InvalidPath(requirements.to_path_buf()))?;
        let target_str = target
            .to_str()
            .ok_or_else(|| InstallError::InvalidPath(target.to_path_buf()))?;

        let mut argv = args([
            "-m",
            "pip",
            "install",
            "-r",
            requirements_str,
            "--target",
            target_str,
        ]);
        if no_deps {
            argv.push("--no-deps".to_owned());
        }
        Ok(CommandSpec::new(&self.python, argv))
    }
}

impl<E: CommandExecutor> Installer for PipInstaller<E> {
    fn install(
        &self,
        requirements: &Path,
        target: &Path,
        no_deps: bool,
    ) -> Result<String, InstallError> {
        let command = self.command(requirements, target, no_deps)?;
        tracing::info!(target = %target.display(), no_deps, "installing pip requirements");
        self.executor
            .exec(&command)
            .map_err(|e| InstallError::Pip { source: e })
    }
}

/// Validate `requirements` and hand it to `installer`.
///
/// A missing file is an error: the caller expected dependencies and an
/// archive without them would be broken. A file listing no requirements
/// (only blank lines and comments) installs nothing and returns `Ok(None)`.
pub fn install_requirements<I: Installer + ?Sized>(
    installer: &I,
    requirements: &Path,
    target: &Path,
    no_deps: bool,
) -> Result<Option<String>, InstallError> {
    if !requirements.is_file() {
        return Err(InstallError::RequirementsNotFound(requirements.to_path_buf()));
    }

    let content = std::fs::read_to_string(requirements).map_err(|e| InstallError::Read {
        path: requirements.to_path_buf(),
        source: e,
    })?;
    if !has_requirements(&content) {
        tracing::warn!(path = %requirements.display(), "requirements file lists no packages, nothing to install");
        return Ok(None);
    }

    let output = installer.install(requirements, target, no_deps)?;
    tracing::debug!(output = %output.trim(), "installer finished");
    Ok(Some(output))
}

/// Whether requirements-format `content` names at least one requirement.
pub fn has_requirements(content: &str) -> bool {
    content.lines().any(|line| {
        let line = line.trim();
        !line.is_empty() && !line.starts_with('#')
    })
}

#[derive(Debug, thiserror::Error)]
pub enum InstallError {
    #[error("could not find requirements.txt file at '{}'", .0.display())]
    RequirementsNotFound(PathBuf),

    #[error("failed to read requirements file {path}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("path is not valid UTF-8: {0}")]
    InvalidPath(PathBuf),

    #[error("pip install failed")]
    Pip { source: ProcessError },
}
