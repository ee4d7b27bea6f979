use std::path::{Path, PathBuf};

use lambda_packager_core::{DependencySource, PackagerConfig, PackagerOptions, ProjectLayout};
use lambda_packager_deps::{
    ExportError, Exporter, InstallError, Installer, PipInstaller, PoetryExporter,
    install_requirements,
};

use crate::archive::{ArchiveError, ArchiveSummary, create_archive};
use crate::collect::{CollectError, SourcePattern, collect_compiled, compile_patterns};
use crate::copy::{CopyError, CopyReport, copy_matches};
use crate::staging::{StagingDirectory, StagingError};

/// Result of a successful packaging run.
#[derive(Debug)]
pub struct PackageOutcome {
    pub archive: ArchiveSummary,
    pub dependency_source: DependencySource,
    /// Captured installer output, if the installer ran.
    pub installer_output: Option<String>,
    pub copy_report: CopyReport,
    /// Staging directory left on disk (only when keeping was requested).
    pub staging_dir: Option<PathBuf>,
}

/// Packaging pipeline, parameterized over its installer and exporter for
/// testability.
pub struct Packager<I: Installer = PipInstaller, X: Exporter = PoetryExporter> {
    layout: ProjectLayout,
    config: PackagerConfig,
    installer: I,
    exporter: X,
    keep_staging: bool,
}

impl Packager<PipInstaller, PoetryExporter> {
    pub fn new(layout: ProjectLayout, config: PackagerConfig, options: &PackagerOptions) -> Self {
        Self::with_collaborators(
            layout,
            config,
            PipInstaller::new(&options.python),
            PoetryExporter::new(&options.poetry),
        )
        .keep_staging(options.keep_staging)
    }
}

impl<I: Installer, X: Exporter> Packager<I, X> {
    pub fn with_collaborators(
        layout: ProjectLayout,
        config: PackagerConfig,
        installer: I,
        exporter: X,
    ) -> Self {
        Self {
            layout,
            config,
            installer,
            exporter,
            keep_staging: false,
        }
    }

    pub fn keep_staging(mut self, keep: bool) -> Self {
        self.keep_staging = keep;
        self
    }

    pub fn layout(&self) -> &ProjectLayout {
        &self.layout
    }

    /// Build `dist/lambda.zip` from a fresh staging directory.
    ///
    /// Steps: compile source patterns → select dependency source → install →
    /// collect sources → copy into staging → archive. Any failure aborts
    /// before the archive is written; a bad pattern aborts before anything
    /// is installed.
    pub fn run(&self) -> Result<PackageOutcome, PackageError> {
        let patterns = compile_patterns(&self.config.src_patterns)?;
        let staging = StagingDirectory::create_for(&self.layout.root)?;
        let result = self.assemble(&patterns, staging.path());

        let staging_dir = if self.keep_staging {
            let path = staging.keep();
            tracing::info!(path = %path.display(), "staging directory kept");
            Some(path)
        } else {
            None
        };

        let mut outcome = result?;
        outcome.staging_dir = staging_dir;
        Ok(outcome)
    }

    fn assemble(
        &self,
        patterns: &[SourcePattern],
        staging_dir: &Path,
    ) -> Result<PackageOutcome, PackageError> {
        let dependency_source = self.layout.dependency_source();
        let installer_output = self.install_dependencies(&dependency_source, staging_dir)?;

        let matches = collect_compiled(patterns, &self.layout.root);
        let copy_report = copy_matches(
            &matches,
            &self.layout.root,
            staging_dir,
            self.config.ignore_hidden_files,
        )?;

        let archive = create_archive(staging_dir, &self.layout.archive_path())?;

        Ok(PackageOutcome {
            archive,
            dependency_source,
            installer_output,
            copy_report,
            staging_dir: None,
        })
    }

    fn install_dependencies(
        &self,
        source: &DependencySource,
        staging_dir: &Path,
    ) -> Result<Option<String>, PackageError> {
        let Some(requirements) = source.requirements_path(staging_dir) else {
            return Ok(None);
        };

        if let DependencySource::Poetry { project_dir } = source {
            let output = self.exporter.export(project_dir, &requirements)?;
            tracing::debug!(output = %output.trim(), "lock export finished");
        }

        Ok(install_requirements(
            &self.installer,
            &requirements,
            staging_dir,
            source.no_deps(),
        )?)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PackageError {
    #[error(transparent)]
    Staging(#[from] StagingError),

    #[error("dependency export failed")]
    Export(#[from] ExportError),

    #[error("dependency installation failed")]
    Install(#[from] InstallError),

    #[error("source collection failed")]
    Collect(#[from] CollectError),

    #[error("copying sources into staging failed")]
    Copy(#[from] CopyError),

    #[error("archive creation failed")]
    Archive(#[from] ArchiveError),
}
