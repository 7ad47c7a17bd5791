// src/lib.rs

//! Outpak
//!
//! Installs the Python dependencies listed in pip requirements files,
//! including private git repositories that need an access token to clone.
//!
//! # Architecture
//!
//! - `requirements`: parses requirements files into package descriptors
//! - `config`: loads `pak.yml` and selects the project environment
//! - `install`: turns descriptors into `git` and `pip` commands and runs them

pub mod config;
mod error;
pub mod install;
pub mod requirements;

pub use config::{Environment, PakConfig, Tokens};
pub use error::{Error, Result};
pub use install::{CommandRunner, DryRunRunner, Installer, SystemRunner};
pub use requirements::{
    PackageDescriptor, PackageList, ParseError, Requirement, SessionState, parse_requirements,
};
