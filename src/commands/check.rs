// src/commands/check.rs

//! `pak check` - validate the config

use anyhow::Result;
use std::path::Path;

use super::load_environment;

pub fn cmd_check(config_path: Option<&Path>) -> Result<()> {
    let (config, env) = load_environment(config_path)?;

    println!("Config OK ({} environments)", config.envs.len());
    println!("Environment: {}", env.name);
    println!("  Clone dir: {}", env.clone_dir.display());
    if let Some(index) = &env.index_url {
        println!("  Index: {}", index);
    }
    for extra in &env.extra_index_urls {
        println!("  Extra index: {}", extra);
    }
    if let Some(venv) = &env.virtualenv {
        println!("  Virtualenv: {}", venv.display());
    }
    println!("  Git token: {}", if env.tokens.git.is_some() { "set" } else { "not set" });
    println!(
        "  Bitbucket token: {}",
        if env.tokens.bitbucket.is_some() { "set" } else { "not set" }
    );
    println!("  Files:");
    for file in &env.files {
        let state = if file.is_file() { "" } else { " (missing)" };
        println!("    {}{}", file.display(), state);
    }

    Ok(())
}
