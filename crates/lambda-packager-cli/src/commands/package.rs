use lambda_packager_build::Packager;
use lambda_packager_core::{PackagerConfig, PackagerOptions, ProjectLayout};
use std::path::Path;

pub fn package(
    project_dir: &Path,
    python: &str,
    poetry: &str,
    keep_staging: bool,
) -> anyhow::Result<()> {
    let layout = ProjectLayout::discover(project_dir)?;
    let config = PackagerConfig::load(&layout.root)?;
    let options = PackagerOptions {
        python: python.to_owned(),
        poetry: poetry.to_owned(),
        keep_staging,
    };

    let outcome = Packager::new(layout, config, &options).run()?;

    println!("Dependencies: {}", outcome.dependency_source);
    println!(
        "Sources: {} copied, {} skipped",
        outcome.copy_report.copied.len(),
        outcome.copy_report.skipped()
    );
    if let Some(staging) = &outcome.staging_dir {
        println!("Staging kept at {}", staging.display());
    }
    println!(
        "Created {} ({} files, {} directories)",
        outcome.archive.path.display(),
        outcome.archive.files,
        outcome.archive.directories
    );
    Ok(())
}
