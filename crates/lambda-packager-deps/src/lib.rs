//! External dependency tooling for lambda-packager.
//!
//! Two collaborator seams are exposed as traits so the packaging pipeline can
//! run against fakes:
//!
//! - [`Installer`]: materializes a requirements file into a directory
//!   ([`PipInstaller`] runs `python -m pip install --target`)
//! - [`Exporter`]: turns a lock file into requirements format
//!   ([`PoetryExporter`] runs `poetry export`)
//!
//! Both sit on [`CommandExecutor`], which runs a process to completion with
//! captured output.

pub mod doctor;
pub mod executor;
pub mod exporter;
pub mod installer;
pub mod process;

pub use doctor::{CheckResult, Doctor, DoctorReport};
pub use executor::{CommandExecutor, RealExecutor};
pub use exporter::{ExportError, Exporter, PoetryExporter};
pub use installer::{InstallError, Installer, PipInstaller, install_requirements};
pub use process::{CommandSpec, ProcessError};
