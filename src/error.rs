// src/error.rs

//! Crate-wide error type

use crate::config::ConfigError;
use crate::install::InstallError;
use crate::requirements::ParseError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced by the library
#[derive(Debug, Error)]
pub enum Error {
    #[error("{}: {source}", path.display())]
    Requirements {
        path: PathBuf,
        #[source]
        source: ParseError,
    },

    #[error("Cannot read {}: {source}", path.display())]
    RequirementsIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("File {} not recognized, requirements files must end in .txt", .0.display())]
    UnsupportedRequirementFile(PathBuf),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Install(#[from] InstallError),
}

/// Result type used throughout the library
pub type Result<T> = std::result::Result<T, Error>;
