// src/install/mod.rs

//! Package installation
//!
//! Turns parsed requirements into `git` and `pip` commands:
//!
//! - VCS requirements are cloned into `<clone_dir>/<name>` with the token
//!   matching their host, moved to their ref, then installed with
//!   `pip install .` from the checkout
//! - passthrough requirements go to pip exactly as written
//! - plain requirements are rebuilt as `name<op>version`
//!
//! Packages install one after another. The first failure stops the run.

mod command;
mod runner;

pub use command::{
    ToolCommand, git_checkout, git_clone, git_fetch_all, git_list_branches, git_reset_hard,
    is_branch, pip_install, pip_install_checkout,
};
pub use runner::{CommandRunner, DryRunRunner, SystemRunner};

use crate::config::{Environment, Tokens};
use crate::requirements::{PackageDescriptor, Requirement, VcsRequirement};
use std::path::PathBuf;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors that stop an install run
#[derive(Debug, Error)]
pub enum InstallError {
    #[error("{0} not found in PATH")]
    ToolNotFound(String),

    #[error("Failed to run '{command}': {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Command '{command}' failed with exit code {}", code.map(|c| c.to_string()).unwrap_or_else(|| "unknown".to_string()))]
    CommandFailed { command: String, code: Option<i32> },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for install operations
pub type InstallResult<T> = Result<T, InstallError>;

/// Installs packages through a [`CommandRunner`]
pub struct Installer<R: CommandRunner> {
    runner: R,
    clone_dir: PathBuf,
    tokens: Tokens,
    quiet: bool,
}

impl<R: CommandRunner> Installer<R> {
    pub fn new(runner: R, clone_dir: impl Into<PathBuf>, tokens: Tokens) -> Self {
        Self {
            runner,
            clone_dir: clone_dir.into(),
            tokens,
            quiet: false,
        }
    }

    /// Build an installer for a selected environment
    pub fn for_environment(runner: R, env: &Environment) -> Self {
        Self::new(runner, &env.clone_dir, env.tokens.clone()).with_quiet(env.run_silently)
    }

    /// Pass `-q` to every pip call
    pub fn with_quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    pub fn into_runner(self) -> R {
        self.runner
    }

    /// Install every package in order, stopping at the first failure
    pub fn install_all<'a>(&mut self, packages: impl IntoIterator<Item = &'a PackageDescriptor>) -> InstallResult<usize> {
        let mut installed = 0;
        for package in packages {
            self.install(package)?;
            installed += 1;
        }
        Ok(installed)
    }

    /// Install one package
    pub fn install(&mut self, package: &PackageDescriptor) -> InstallResult<()> {
        match &package.requirement {
            Requirement::Vcs(vcs) => {
                info!(
                    "Installing {}{} using token",
                    package.name(),
                    vcs.git_ref
                        .as_deref()
                        .map(|r| format!(" at {}", r))
                        .unwrap_or_default()
                );
                self.install_from_clone(package, vcs)
            }
            _ => match pip_install(package, self.quiet) {
                Some(command) => {
                    info!("Installing {} using pip", package);
                    self.runner.run(&command)?;
                    Ok(())
                }
                None => {
                    debug!("Line {}: {} names no package, skipping", package.line_number, package);
                    Ok(())
                }
            },
        }
    }

    fn install_from_clone(&mut self, package: &PackageDescriptor, vcs: &VcsRequirement) -> InstallResult<()> {
        let workdir = self.clone_dir.join(&vcs.name);
        let checkout = workdir.join(&vcs.name);

        self.runner.recreate_dir(&workdir)?;

        let token = self.tokens.for_host(&vcs.clone_url);
        if token.is_none() {
            warn!("No token configured for {}, cloning anonymously", vcs.clone_url);
        }
        self.runner.run(&git_clone(&vcs.clone_url, token, &workdir))?;

        if let Some(git_ref) = &vcs.git_ref {
            self.runner.run(&git_fetch_all(&checkout))?;
            let branches = self.runner.run(&git_list_branches(&checkout))?;
            if is_branch(&branches, git_ref) {
                self.runner.run(&git_checkout(&checkout, git_ref))?;
            } else {
                self.runner.run(&git_reset_hard(&checkout, git_ref))?;
            }
        }

        self.runner
            .run(&pip_install_checkout(package, self.quiet, &checkout))?;
        Ok(())
    }
}
