// src/config/mod.rs

//! Project configuration (`pak.yml`)
//!
//! The config names the environment variables holding git credentials, the
//! variable that selects a project environment, and per environment the
//! clone directory and requirements files to install.
//!
//! # Example pak.yml
//!
//! ```yaml
//! token_key: GIT_TOKEN
//! bitbucket_key: BITBUCKET_PASS
//! env_key: PROJECT_ENV
//! envs:
//!   prod:
//!     key_value: production
//!     clone_dir: /tmp/pak
//!     files:
//!       - requirements.txt
//!   dev:
//!     key_value: development
//!     clone_dir: $HOME/.cache/pak
//!     files: [requirements.txt, requirements-dev.txt]
//!     index_url: https://pypi.example/simple
//!     use_virtual: true
//! ```

pub mod parser;

pub use parser::{EnvironmentConfig, PakConfig, expand_vars, parse_config_file, parse_config_file_with, parse_config_str};

use crate::requirements::{SessionState, existing_files};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

/// Default config file name, looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "pak.yml";

/// Env var that overrides the default config location
pub const CONFIG_ENV_VAR: &str = "OUTPAK_FILE";

/// Env var set by an activated Python virtualenv
pub const VIRTUAL_ENV_VAR: &str = "VIRTUAL_ENV";

/// Errors that can occur when loading the project configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Cannot open {}: {source}", path.display())]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot read config: {0}")]
    ParseError(#[from] serde_yaml::Error),

    #[error("Invalid config {}:\n  {}", path.display(), problems.join("\n  "))]
    Invalid { path: PathBuf, problems: Vec<String> },

    #[error("Please set {0}")]
    MissingEnvironmentVariable(String),

    #[error("No configuration found for environment '{0}'")]
    UnknownEnvironment(String),

    #[error("Please set your {0} token")]
    MissingToken(String),

    #[error("{0} must hold a Bitbucket app password in username:password format")]
    InvalidBitbucketPassword(String),

    #[error("Environment '{0}' requires a virtual environment, but none is active")]
    VirtualEnvNotFound(String),
}

/// Result type for config operations
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Config path from an explicit argument, `$OUTPAK_FILE`, or `./pak.yml`
pub fn config_path(explicit: Option<&Path>) -> PathBuf {
    if let Some(path) = explicit {
        return path.to_path_buf();
    }
    match std::env::var(CONFIG_ENV_VAR) {
        Ok(path) if !path.is_empty() => PathBuf::from(path),
        _ => PathBuf::from(DEFAULT_CONFIG_FILE),
    }
}

/// Credentials for cloning private repositories
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Tokens {
    pub git: Option<String>,
    pub bitbucket: Option<String>,
}

impl Tokens {
    /// Pick the token for a clone URL: Bitbucket hosts get the app password
    pub fn for_host(&self, clone_url: &str) -> Option<&str> {
        if clone_url.contains("bitbucket") {
            self.bitbucket.as_deref()
        } else {
            self.git.as_deref()
        }
    }
}

impl std::fmt::Debug for Tokens {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tokens")
            .field("git", &self.git.as_ref().map(|_| "***"))
            .field("bitbucket", &self.bitbucket.as_ref().map(|_| "***"))
            .finish()
    }
}

/// The environment chosen for this run, with paths resolved
#[derive(Debug, Clone)]
pub struct Environment {
    pub name: String,
    pub clone_dir: PathBuf,
    pub files: Vec<PathBuf>,
    pub index_url: Option<String>,
    pub extra_index_urls: Vec<String>,
    pub run_silently: bool,
    /// Active virtualenv, when the environment sets `use_virtual`
    pub virtualenv: Option<PathBuf>,
    pub tokens: Tokens,
}

impl Environment {
    /// Session every requirements file starts from
    pub fn default_session(&self) -> SessionState {
        SessionState::with_defaults(self.index_url.clone(), self.extra_index_urls.clone())
    }

    /// Configured files that exist; missing ones are skipped with a warning
    pub fn requirement_files(&self) -> Vec<PathBuf> {
        for missing in self.files.iter().filter(|f| !f.is_file()) {
            warn!("Requirements file {} not found, skipping", missing.display());
        }
        existing_files(self.files.iter().cloned())
    }
}

impl PakConfig {
    /// Select the environment named by `$<env_key>` using the process environment
    pub fn current_environment(&self) -> ConfigResult<Environment> {
        self.select_environment(&|name| std::env::var(name).ok())
    }

    /// Select the environment with an explicit variable lookup
    pub fn select_environment(&self, lookup: &dyn Fn(&str) -> Option<String>) -> ConfigResult<Environment> {
        let env_key = self.env_key.clone().unwrap_or_default();
        let value = lookup(&env_key)
            .filter(|v| !v.is_empty())
            .ok_or_else(|| ConfigError::MissingEnvironmentVariable(env_key.clone()))?;

        let (name, env) = self
            .envs
            .iter()
            .find(|(_, env)| env.key_value.as_deref() == Some(value.as_str()))
            .ok_or_else(|| ConfigError::UnknownEnvironment(value.clone()))?;

        info!("Using configuration for environment: {}", name);

        let virtualenv = if env.use_virtual {
            let prefix = lookup(VIRTUAL_ENV_VAR)
                .filter(|v| !v.is_empty())
                .ok_or_else(|| ConfigError::VirtualEnvNotFound(name.clone()))?;
            info!("Running in virtual environment: {}", prefix);
            Some(PathBuf::from(prefix))
        } else {
            None
        };

        let tokens = self.read_tokens(lookup)?;

        Ok(Environment {
            name: name.clone(),
            clone_dir: self.resolve(env.clone_dir.as_deref().unwrap_or_default()),
            files: env
                .files
                .iter()
                .flatten()
                .map(|f| self.resolve(f))
                .collect(),
            index_url: env.index_url.clone(),
            extra_index_urls: env.extra_index_urls.clone(),
            run_silently: env.run_silently,
            virtualenv,
            tokens,
        })
    }

    /// Read every configured token; a configured but unset variable is fatal
    fn read_tokens(&self, lookup: &dyn Fn(&str) -> Option<String>) -> ConfigResult<Tokens> {
        let read = |var: &str| {
            lookup(var)
                .filter(|t| !t.is_empty())
                .ok_or_else(|| ConfigError::MissingToken(var.to_string()))
        };

        let git = self.git_token_key().map(read).transpose()?;
        let bitbucket = self.bitbucket_key.as_deref().map(read).transpose()?;

        if let (Some(var), Some(password)) = (&self.bitbucket_key, &bitbucket) {
            if !password.contains(':') {
                return Err(ConfigError::InvalidBitbucketPassword(var.clone()));
            }
        }

        Ok(Tokens { git, bitbucket })
    }
}
