// src/cli.rs
//! CLI definitions for pak
//!
//! The command implementations live in the `commands` module.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "pak")]
#[command(author = "Outpak Contributors")]
#[command(version)]
#[command(about = "Install pip requirements, cloning private git dependencies with access tokens", long_about = None)]
pub struct Cli {
    /// Call pip with -q and only log warnings
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Full path to the config file
    #[arg(short, long, global = true, env = "OUTPAK_FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Install every package from the environment's requirements files
    Install {
        /// Print the commands instead of running them
        #[arg(long)]
        dry_run: bool,
    },

    /// Parse requirements files and print the packages found
    Parse {
        /// Requirements files, read in order
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,

        /// Index URL each file starts with
        #[arg(short = 'i', long)]
        index_url: Option<String>,

        /// Extra index URLs each file starts with
        #[arg(long)]
        extra_index_url: Vec<String>,
    },

    /// Validate the config and show the selected environment
    Check,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_args() {
        let cli = Cli::parse_from(["pak", "-q", "parse", "a.txt", "b.txt", "--json", "-i", "https://idx"]);
        assert!(cli.quiet);
        match cli.command {
            Commands::Parse {
                files,
                json,
                index_url,
                extra_index_url,
            } => {
                assert_eq!(files, vec![PathBuf::from("a.txt"), PathBuf::from("b.txt")]);
                assert!(json);
                assert_eq!(index_url.as_deref(), Some("https://idx"));
                assert!(extra_index_url.is_empty());
            }
            _ => panic!("expected parse"),
        }
    }
}
