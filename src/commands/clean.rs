use std::path::{Path, PathBuf};

use crate::{CleanArgs, GlobalArgs, build::output::project_dir, config::SnapshotConfig};

pub fn run(global: &GlobalArgs, args: &CleanArgs) -> Result<(), anyhow::Error> {
    let config = SnapshotConfig::load_from_arg(global.config_file.as_deref())?;

    let removed = clean_projects(&global.output, &config, args.dry_run)?;
    for path in &removed {
        if args.dry_run {
            println!("Would delete {}", path.display());
        } else {
            println!("Deleted {}", path.display());
        }
    }
    if removed.is_empty() {
        println!("Nothing to clean");
    }

    Ok(())
}

/// Delete the output folder of every configured project.
///
/// Only `projects/<slug>` folders for configured slugs are touched; anything
/// else under the output root is left alone. Returns the folders that were
/// (or, on a dry run, would be) deleted.
fn clean_projects(
    output_root: &Path,
    config: &SnapshotConfig,
    dry_run: bool,
) -> Result<Vec<PathBuf>, std::io::Error> {
    let mut removed = Vec::new();
    for project in &config.projects {
        let dir = project_dir(output_root, &project.slug);
        if !dir.exists() {
            continue;
        }
        if !dry_run {
            std::fs::remove_dir_all(&dir)?;
        }
        removed.push(dir);
    }
    Ok(removed)
}
