use std::path::Path;

use serde::{Deserialize, Serialize};

/// Project metadata file that may carry a `[tool.lambda_packager]` table.
pub const PYPROJECT_FILE: &str = "pyproject.toml";

/// Table name under `[tool]` holding packager settings.
pub const TOOL_NAMESPACE: &str = "lambda_packager";

/// `[tool.lambda_packager]` configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackagerConfig {
    /// Glob patterns selecting project sources, expanded recursively
    /// (`*.py` matches at any depth).
    #[serde(default = "default_src_patterns")]
    pub src_patterns: Vec<String>,
    /// Exclude any path with a `.`-prefixed component from the archive.
    #[serde(default = "default_ignore_hidden_files")]
    pub ignore_hidden_files: bool,
}

/// Runtime options supplied by the caller rather than by project metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackagerOptions {
    /// Python interpreter used to run `pip`
    pub python: String,
    /// Poetry executable used for lock export
    pub poetry: String,
    /// Keep the staging directory on disk after the run
    pub keep_staging: bool,
}

impl Default for PackagerConfig {
    fn default() -> Self {
        Self {
            src_patterns: default_src_patterns(),
            ignore_hidden_files: default_ignore_hidden_files(),
        }
    }
}

impl Default for PackagerOptions {
    fn default() -> Self {
        Self {
            python: default_python(),
            poetry: default_poetry(),
            keep_staging: false,
        }
    }
}

impl PackagerConfig {
    /// Load from `pyproject.toml` in the given directory, or return defaults
    /// if the file or the `[tool.lambda_packager]` table is absent.
    pub fn load(project_dir: &Path) -> crate::Result<Self> {
        let config_path = project_dir.join(PYPROJECT_FILE);
        if !config_path.is_file() {
            tracing::warn!(path = %config_path.display(), "no config file found, using defaults");
            return Ok(Self::default());
        }

        let content =
            std::fs::read_to_string(&config_path).map_err(|e| crate::Error::ConfigLoad {
                path: config_path.clone(),
                source: e,
            })?;
        Self::from_pyproject_str(&content, &config_path)
    }

    /// Parse the packager table out of `pyproject.toml` content.
    ///
    /// `path` is only used for error reporting.
    pub fn from_pyproject_str(content: &str, path: &Path) -> crate::Result<Self> {
        let document: toml::Table =
            toml::from_str(content).map_err(|e| crate::Error::ConfigParse {
                path: path.to_path_buf(),
                source: e,
            })?;

        let Some(section) = document
            .get("tool")
            .and_then(|tool| tool.get(TOOL_NAMESPACE))
        else {
            tracing::warn!(
                path = %path.display(),
                "no [tool.{TOOL_NAMESPACE}] table found, using defaults"
            );
            return Ok(Self::default());
        };

        let mut unknown_keys: Vec<String> = Vec::new();
        let config: Self = serde_ignored::deserialize(section.clone(), |key| {
            unknown_keys.push(key.to_string());
        })
        .map_err(|e| crate::Error::ConfigParse {
            path: path.to_path_buf(),
            source: e,
        })?;

        for key in &unknown_keys {
            tracing::warn!(key = %key, "unknown key in [tool.{TOOL_NAMESPACE}] ignored");
        }

        config.validate()?;
        Ok(config)
    }

    /// Reject patterns that could reach outside the project directory.
    pub fn validate(&self) -> crate::Result<()> {
        for pattern in &self.src_patterns {
            validate_pattern(pattern)?;
        }
        Ok(())
    }
}

fn validate_pattern(pattern: &str) -> crate::Result<()> {
    let invalid = |reason| crate::Error::InvalidPattern {
        pattern: pattern.to_owned(),
        reason,
    };

    if pattern.trim().is_empty() {
        return Err(invalid("pattern is empty"));
    }
    if pattern.starts_with('/') || pattern.starts_with('\\') || Path::new(pattern).has_root() {
        return Err(invalid("absolute patterns are not allowed"));
    }
    if pattern.split(['/', '\\']).any(|segment| segment == "..") {
        return Err(invalid("parent directory references are not allowed"));
    }
    Ok(())
}

fn default_src_patterns() -> Vec<String> {
    vec!["*.py".to_owned()]
}

fn default_ignore_hidden_files() -> bool {
    true
}

fn default_python() -> String {
    "python3".to_owned()
}

fn default_poetry() -> String {
    "poetry".to_owned()
}
