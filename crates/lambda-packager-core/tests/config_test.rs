use lambda_packager_core::{Error, PackagerConfig, PackagerOptions};
use std::path::Path;
use tempfile::TempDir;

#[test]
fn load_returns_defaults_when_no_config_file() {
    let tmp = TempDir::new().unwrap();
    let config = PackagerConfig::load(tmp.path()).unwrap();

    assert_eq!(config.src_patterns, vec!["*.py"]);
    assert!(config.ignore_hidden_files);
    assert_eq!(config, PackagerConfig::default());
}

#[test]
fn load_returns_defaults_when_namespace_missing() {
    let tmp = TempDir::new().unwrap();
    let toml = r#"
[project]
name = "my-function"

[tool.black]
line-length = 100
"#;
    std::fs::write(tmp.path().join("pyproject.toml"), toml).unwrap();

    let config = PackagerConfig::load(tmp.path()).unwrap();
    assert_eq!(config, PackagerConfig::default());
}

#[test]
fn load_parses_full_config() {
    let tmp = TempDir::new().unwrap();
    let toml = r#"
[tool.poetry]
name = "my-function"

[tool.lambda_packager]
src_patterns = ["src", "**/*.json", "*.py"]
ignore_hidden_files = false
"#;
    std::fs::write(tmp.path().join("pyproject.toml"), toml).unwrap();

    let config = PackagerConfig::load(tmp.path()).unwrap();

    assert_eq!(config.src_patterns, vec!["src", "**/*.json", "*.py"]);
    assert!(!config.ignore_hidden_files);
}

#[test]
fn load_merges_partial_config_with_defaults() {
    let tmp = TempDir::new().unwrap();
    let toml = r#"
[tool.lambda_packager]
ignore_hidden_files = false
"#;
    std::fs::write(tmp.path().join("pyproject.toml"), toml).unwrap();

    let config = PackagerConfig::load(tmp.path()).unwrap();

    assert_eq!(config.src_patterns, vec!["*.py"]);
    assert!(!config.ignore_hidden_files);
}

#[test]
fn load_ignores_unknown_keys() {
    let tmp = TempDir::new().unwrap();
    let toml = r#"
[tool.lambda_packager]
src_patterns = ["handler.py"]
output = "build/out.zip"
"#;
    std::fs::write(tmp.path().join("pyproject.toml"), toml).unwrap();

    let config = PackagerConfig::load(tmp.path()).unwrap();
    assert_eq!(config.src_patterns, vec!["handler.py"]);
}

#[test]
fn load_rejects_wrong_value_type() {
    let tmp = TempDir::new().unwrap();
    let toml = r#"
[tool.lambda_packager]
ignore_hidden_files = "yes"
"#;
    std::fs::write(tmp.path().join("pyproject.toml"), toml).unwrap();

    let result = PackagerConfig::load(tmp.path());
    assert!(matches!(result, Err(Error::ConfigParse { .. })));
}

#[test]
fn load_rejects_malformed_toml() {
    let tmp = TempDir::new().unwrap();
    std::fs::write(tmp.path().join("pyproject.toml"), "[tool.lambda_packager\n").unwrap();

    let result = PackagerConfig::load(tmp.path());
    let err = result.unwrap_err().to_string();
    assert!(err.contains("failed to parse config"), "got: {err}");
    assert!(err.contains("pyproject.toml"), "got: {err}");
}

#[test]
fn load_rejects_escaping_pattern() {
    let tmp = TempDir::new().unwrap();
    let toml = r#"
[tool.lambda_packager]
src_patterns = ["../shared/*.py"]
"#;
    std::fs::write(tmp.path().join("pyproject.toml"), toml).unwrap();

    let result = PackagerConfig::load(tmp.path());
    assert!(matches!(result, Err(Error::InvalidPattern { .. })));
}

#[test]
fn from_pyproject_str_reports_given_path() {
    let result = PackagerConfig::from_pyproject_str(
        "[tool.lambda_packager]\nsrc_patterns = 3\n",
        Path::new("/somewhere/pyproject.toml"),
    );
    let err = result.unwrap_err().to_string();
    assert!(err.contains("/somewhere/pyproject.toml"), "got: {err}");
}

#[test]
fn options_default_to_python3_and_poetry() {
    let options = PackagerOptions::default();
    assert_eq!(options.python, "python3");
    assert_eq!(options.poetry, "poetry");
    assert!(!options.keep_staging);
}
