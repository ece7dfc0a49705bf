use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod build;
mod commands;
mod config;
mod util;

#[derive(Parser)]
#[command(version, about = "Generate static project snapshot pages for a portfolio site")]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    /// The command to execute (defaults to `build`)
    #[command(subcommand)]
    command: Option<SnapfolioCommand>,
}

#[derive(Args)]
struct GlobalArgs {
    /// Root of the portfolio site; pages are written to <OUTPUT>/projects/<slug>/
    #[arg(short, long, global = true, default_value = ".")]
    output: PathBuf,

    /// A YAML file replacing the built-in project table
    #[arg(short, long = "config", global = true)]
    config_file: Option<PathBuf>,

    /// Log progress details (overrides RUST_LOG)
    #[arg(short, long, global = true, default_value = "false")]
    verbose: bool,
}

#[derive(Parser, Default)]
struct BuildArgs {
    /// A theme directory whose templates/snapshot.html replaces the built-in page
    #[arg(short, long)]
    templates: Option<PathBuf>,
}

#[derive(Parser)]
struct CleanArgs {
    /// Only print what would be deleted
    #[arg(short, long, default_value = "false")]
    dry_run: bool,
}

#[derive(Subcommand)]
enum SnapfolioCommand {
    /// Generate a snapshot page for every configured project
    Build(BuildArgs),

    /// Delete the generated folders of every configured project
    Clean(CleanArgs),
}

impl Default for SnapfolioCommand {
    fn default() -> Self {
        SnapfolioCommand::Build(BuildArgs::default())
    }
}

fn main() -> Result<(), anyhow::Error> {
    let args = Cli::parse();

    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN
    let filter = if args.global.verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match args.command.unwrap_or_default() {
        SnapfolioCommand::Build(build_args) => {
            commands::build::run(&args.global, &build_args)?;
        }
        SnapfolioCommand::Clean(clean_args) => {
            commands::clean::run(&args.global, &clean_args)?;
        }
    }

    Ok(())
}
