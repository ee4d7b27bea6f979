use lambda_packager_core::{PackagerConfig, ProjectLayout};
use std::path::Path;

pub fn show_config(project_dir: &Path) -> anyhow::Result<()> {
    let layout = ProjectLayout::discover(project_dir)?;
    let config = PackagerConfig::load(&layout.root)?;
    let source = layout.dependency_source();

    println!("Project:             {}", layout.root.display());
    println!("src_patterns:        {:?}", config.src_patterns);
    println!("ignore_hidden_files: {}", config.ignore_hidden_files);
    println!("Dependencies:        {source}");
    if source.no_deps() {
        println!("                     (installed with --no-deps)");
    }
    println!("Archive:             {}", layout.archive_path().display());
    Ok(())
}
