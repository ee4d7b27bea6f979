use lambda_packager_core::{PackagerConfig, ProjectLayout};
use lambda_packager_deps::{CheckResult, Doctor};
use std::path::Path;

pub fn doctor(project_dir: &Path, python: &str, poetry: &str) -> anyhow::Result<()> {
    let layout = ProjectLayout::discover(project_dir)?;
    let poetry_required = !layout.requirements_file().is_file() && layout.uses_poetry();

    let mut report = Doctor::new().check(python, poetry, poetry_required);

    // Config file check
    let pyproject = layout.pyproject_file();
    report.config_file = match PackagerConfig::load(&layout.root) {
        Ok(_) if pyproject.is_file() => CheckResult::ok("pyproject.toml"),
        Ok(_) => CheckResult::ok("Not found (defaults)"),
        Err(e) => CheckResult::fail(&e.to_string()),
    };

    println!();
    println!("{report}");

    if !report.all_passed() {
        anyhow::bail!("some checks failed; see above for details");
    }

    Ok(())
}
