// src/commands/install.rs

//! `pak install` - install every configured requirements file

use anyhow::Result;
use outpak::install::{DryRunRunner, Installer, SystemRunner};
use outpak::requirements::PackageList;
use std::path::Path;
use tracing::info;

use super::load_environment;

pub fn cmd_install(config_path: Option<&Path>, quiet: bool, dry_run: bool) -> Result<()> {
    let (_, env) = load_environment(config_path)?;
    let quiet = quiet || env.run_silently;
    if quiet {
        info!("Running in silent mode");
    }

    let files = env.requirement_files();
    if files.is_empty() {
        println!("No requirements files found for environment '{}'", env.name);
        return Ok(());
    }

    // Parse everything before touching the system
    let packages = PackageList::from_files(&files, &env.default_session())?;
    info!("Found {} packages in {} files", packages.len(), files.len());

    let installed = if dry_run {
        Installer::for_environment(DryRunRunner::new(), &env)
            .with_quiet(quiet)
            .install_all(&packages)?
    } else {
        Installer::for_environment(SystemRunner::new(), &env)
            .with_quiet(quiet)
            .install_all(&packages)?
    };

    if !dry_run {
        println!("Installed {} packages", installed);
    }
    Ok(())
}
