use std::path::{Path, PathBuf};

use arch_lint::rules::{NoErrorSwallowing, NoSilentResultDrop};
use arch_lint::{Analyzer, Severity};

const WORKSPACE_CRATES: [&str; 4] = [
    "lambda-packager-core",
    "lambda-packager-deps",
    "lambda-packager-build",
    "lambda-packager-cli",
];

fn crates_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .expect("crates directory")
        .to_path_buf()
}

/// Library and binary sources must neither swallow errors (AL003) nor drop
/// `Result`s silently (AL013). Integration tests are out of scope; each
/// crate's `src/` is analyzed on its own so a report names the crate.
#[test]
fn crate_sources_propagate_errors() {
    let mut reports = Vec::new();

    for name in WORKSPACE_CRATES {
        let src = crates_dir().join(name).join("src");
        assert!(src.is_dir(), "missing source directory {}", src.display());

        let analyzer = Analyzer::builder()
            .root(src.as_path())
            .exclude("**/target/**")
            .rule(NoErrorSwallowing::new())
            .rule(NoSilentResultDrop::new())
            .build()
            .expect("build analyzer");
        let result = analyzer.analyze().expect("analyze");

        if result.has_violations_at(Severity::Warning) {
            reports.push(format!(
                "{name}:\n{}",
                result.format_test_report(Severity::Warning)
            ));
        }
    }

    assert!(reports.is_empty(), "{}", reports.join("\n"));
}
