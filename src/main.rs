// src/main.rs

mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing subscriber for logging
    let default_level = if cli.quiet { "warn" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .with_target(false)
        .init();

    let config = cli.config.as_deref();

    match cli.command {
        Commands::Install { dry_run } => commands::cmd_install(config, cli.quiet, dry_run),
        Commands::Parse {
            files,
            json,
            index_url,
            extra_index_url,
        } => commands::cmd_parse(&files, json, index_url, extra_index_url),
        Commands::Check => commands::cmd_check(config),
    }
}
