// src/install/runner.rs

//! Command execution backends

use super::command::ToolCommand;
use super::{InstallError, InstallResult};
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use std::process::{Command, Stdio};
use tracing::{debug, info};

/// Executes install commands
///
/// Implementations run commands strictly one at a time; a failing command
/// is reported as an error and nothing after it runs.
pub trait CommandRunner {
    /// Run a command, returning its captured stdout (empty unless captured)
    fn run(&mut self, command: &ToolCommand) -> InstallResult<String>;

    /// Remove and recreate a directory
    fn recreate_dir(&mut self, dir: &Path) -> InstallResult<()>;
}

/// Runs commands on the host with `std::process::Command`
#[derive(Debug, Default)]
pub struct SystemRunner {
    located: HashSet<String>,
}

impl SystemRunner {
    pub fn new() -> Self {
        Self::default()
    }

    fn ensure_tool(&mut self, program: &str) -> InstallResult<()> {
        if self.located.contains(program) {
            return Ok(());
        }
        let path = which::which(program).map_err(|_| InstallError::ToolNotFound(program.to_string()))?;
        debug!("Using {} at {}", program, path.display());
        self.located.insert(program.to_string());
        Ok(())
    }
}

impl CommandRunner for SystemRunner {
    fn run(&mut self, command: &ToolCommand) -> InstallResult<String> {
        self.ensure_tool(&command.program)?;
        info!("Running: {}", command);

        let mut cmd = Command::new(&command.program);
        cmd.args(&command.args).stdin(Stdio::null());
        if let Some(cwd) = &command.cwd {
            cmd.current_dir(cwd);
        }

        if command.capture {
            let output = cmd
                .stderr(Stdio::inherit())
                .output()
                .map_err(|e| InstallError::Spawn {
                    command: command.to_string(),
                    source: e,
                })?;
            if !output.status.success() {
                return Err(InstallError::CommandFailed {
                    command: command.to_string(),
                    code: output.status.code(),
                });
            }
            Ok(String::from_utf8_lossy(&output.stdout).into_owned())
        } else {
            let status = cmd.status().map_err(|e| InstallError::Spawn {
                command: command.to_string(),
                source: e,
            })?;
            if !status.success() {
                return Err(InstallError::CommandFailed {
                    command: command.to_string(),
                    code: status.code(),
                });
            }
            Ok(String::new())
        }
    }

    fn recreate_dir(&mut self, dir: &Path) -> InstallResult<()> {
        if dir.exists() {
            debug!("Removing existing clone directory {}", dir.display());
            fs::remove_dir_all(dir)?;
        }
        fs::create_dir_all(dir)?;
        Ok(())
    }
}

/// Prints commands instead of running them
///
/// Captured commands return empty output, so refs are always treated as
/// commits (`git reset --hard`) in a dry run.
#[derive(Debug, Default)]
pub struct DryRunRunner {
    pub printed: Vec<String>,
}

impl DryRunRunner {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CommandRunner for DryRunRunner {
    fn run(&mut self, command: &ToolCommand) -> InstallResult<String> {
        let line = command.to_string();
        println!("{}", line);
        self.printed.push(line);
        Ok(String::new())
    }

    fn recreate_dir(&mut self, dir: &Path) -> InstallResult<()> {
        let line = format!("rm -rf {0} && mkdir -p {0}", dir.display());
        println!("{}", line);
        self.printed.push(line);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recreate_dir_clears_contents() {
        let dir = tempfile::tempdir().unwrap();
        let clone_dir = dir.path().join("repo");
        fs::create_dir_all(clone_dir.join("stale")).unwrap();

        SystemRunner::new().recreate_dir(&clone_dir).unwrap();
        assert!(clone_dir.is_dir());
        assert!(!clone_dir.join("stale").exists());
    }

    #[test]
    fn test_missing_tool() {
        let mut runner = SystemRunner::new();
        let err = runner
            .run(&ToolCommand::new("definitely-not-a-real-tool-4821"))
            .unwrap_err();
        assert!(matches!(err, InstallError::ToolNotFound(_)));
    }

    #[test]
    fn test_dry_run_records() {
        let mut runner = DryRunRunner::new();
        runner
            .run(&ToolCommand::new("pip").args(["install", "django"]))
            .unwrap();
        runner.recreate_dir(Path::new("/tmp/pak/repo")).unwrap();
        assert_eq!(
            runner.printed,
            ["pip install django", "rm -rf /tmp/pak/repo && mkdir -p /tmp/pak/repo"]
        );
    }
}
