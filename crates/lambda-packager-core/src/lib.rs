//! Core types and configuration for lambda-packager.
//!
//! This crate defines the `[tool.lambda_packager]` schema ([`PackagerConfig`]),
//! project layout and dependency source selection ([`ProjectLayout`],
//! [`DependencySource`]), and shared error types.

pub mod config;
pub mod error;
pub mod project;

pub use config::{PYPROJECT_FILE, PackagerConfig, PackagerOptions, TOOL_NAMESPACE};
pub use error::{Error, Result};
pub use project::{
    ARCHIVE_RELATIVE_PATH, DependencySource, POETRY_LOCK_FILE, ProjectLayout, REQUIREMENTS_FILE,
};
