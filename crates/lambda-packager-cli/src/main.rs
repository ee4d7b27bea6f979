mod commands;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "lambda-packager",
    about = "Package Python serverless functions and their dependencies into a zip"
)]
#[command(version)]
struct Cli {
    /// Enable debug logging (overridden by RUST_LOG)
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build dist/lambda.zip from sources and dependencies
    Package {
        #[command(flatten)]
        project: ProjectArgs,
        #[command(flatten)]
        tools: ToolArgs,
        /// Keep the staging directory after packaging
        #[arg(long)]
        keep_staging: bool,
    },
    /// Show the effective configuration and dependency source
    Config {
        #[command(flatten)]
        project: ProjectArgs,
    },
    /// Check that python, pip, and poetry are usable
    Doctor {
        #[command(flatten)]
        project: ProjectArgs,
        #[command(flatten)]
        tools: ToolArgs,
    },
}

#[derive(Args)]
struct ProjectArgs {
    /// Project directory (defaults to the current directory)
    #[arg(long, short = 'C', default_value = ".")]
    project_dir: PathBuf,
}

#[derive(Args)]
struct ToolArgs {
    /// Python interpreter used to run pip
    #[arg(long, env = "LAMBDA_PACKAGER_PYTHON", default_value = "python3")]
    python: String,
    /// Poetry executable used for lock export
    #[arg(long, env = "LAMBDA_PACKAGER_POETRY", default_value = "poetry")]
    poetry: String,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let fallback = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(fallback)),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Package {
            project,
            tools,
            keep_staging,
        } => commands::package(&project.project_dir, &tools.python, &tools.poetry, keep_staging)?,
        Commands::Config { project } => commands::show_config(&project.project_dir)?,
        Commands::Doctor { project, tools } => {
            commands::doctor(&project.project_dir, &tools.python, &tools.poetry)?
        }
    }

    Ok(())
}
