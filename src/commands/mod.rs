// src/commands/mod.rs
//! Command handlers for the pak CLI

mod check;
mod install;
mod parse;

pub use check::cmd_check;
pub use install::cmd_install;
pub use parse::cmd_parse;

use anyhow::{Context, Result};
use outpak::config::{self, Environment, PakConfig};
use std::path::Path;

/// Load the config and select the environment for this run
fn load_environment(config_path: Option<&Path>) -> Result<(PakConfig, Environment)> {
    let path = config::config_path(config_path);
    let config = config::parse_config_file(&path)
        .with_context(|| format!("Failed to load config {}", path.display()))?;
    let env = config.current_environment()?;
    Ok((config, env))
}
