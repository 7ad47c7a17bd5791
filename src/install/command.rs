// src/install/command.rs

//! Command construction for git and pip
//!
//! Everything here is pure: commands are values that a
//! [`CommandRunner`](super::CommandRunner) executes later.

use crate::requirements::{PackageDescriptor, Requirement};
use std::fmt;
use std::path::{Path, PathBuf};

/// One external command to run
#[derive(Clone, PartialEq, Eq)]
pub struct ToolCommand {
    pub program: String,
    pub args: Vec<String>,
    /// Working directory (inherited when `None`)
    pub cwd: Option<PathBuf>,
    /// Capture stdout instead of streaming it to the terminal
    pub capture: bool,
    /// Text masked when the command is displayed or logged
    secret: Option<String>,
}

impl ToolCommand {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            cwd: None,
            capture: false,
            secret: None,
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cwd = Some(dir.into());
        self
    }

    pub fn captured(mut self) -> Self {
        self.capture = true;
        self
    }

    fn redact(mut self, secret: &str) -> Self {
        self.secret = Some(secret.to_string());
        self
    }
}

impl fmt::Display for ToolCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(cwd) = &self.cwd {
            write!(f, "cd {} && ", cwd.display())?;
        }
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            let arg = match &self.secret {
                Some(secret) if !secret.is_empty() => arg.replace(secret, "***"),
                _ => arg.clone(),
            };
            if arg.is_empty() || arg.contains(|c: char| c.is_whitespace() || "<>;\"'".contains(c)) {
                write!(f, " \"{}\"", arg.replace('"', "\\\""))?;
            } else {
                write!(f, " {}", arg)?;
            }
        }
        Ok(())
    }
}

impl fmt::Debug for ToolCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ToolCommand({})", self)
    }
}

/// `-i` / `--extra-index-url` / `-q` / option prefix shared by every pip call
fn pip_prefix(package: &PackageDescriptor, quiet: bool) -> ToolCommand {
    let mut cmd = ToolCommand::new("pip").arg("install");
    if let Some(index) = package.index_url() {
        cmd = cmd.args(["-i", index]);
    }
    for extra in package.extra_indexes() {
        cmd = cmd.args(["--extra-index-url", extra.as_str()]);
    }
    if quiet {
        cmd = cmd.arg("-q");
    }
    if let Some(option) = package.option {
        cmd = cmd.arg(option.flag());
    }
    cmd
}

/// `pip install` for a plain or passthrough requirement
///
/// Returns `None` for VCS requirements, which install from a checkout, and
/// for bare option lines that name no package.
pub fn pip_install(package: &PackageDescriptor, quiet: bool) -> Option<ToolCommand> {
    let target = match &package.requirement {
        Requirement::Passthrough(r) if r.line.is_empty() => return None,
        Requirement::Passthrough(r) => r.line.clone(),
        Requirement::Plain(r) => match &r.specifier {
            Some(spec) => format!("{}{}{}", r.name, spec.comparator, spec.version),
            None => r.name.clone(),
        },
        Requirement::Vcs(_) => return None,
    };
    Some(pip_prefix(package, quiet).arg(target))
}

/// `pip install .` inside a cloned repository
pub fn pip_install_checkout(package: &PackageDescriptor, quiet: bool, checkout: &Path) -> ToolCommand {
    pip_prefix(package, quiet).arg(".").current_dir(checkout)
}

/// `git clone https://[token@]host/path`
pub fn git_clone(clone_url: &str, token: Option<&str>, into: &Path) -> ToolCommand {
    let url = match token {
        Some(token) => format!("https://{}@{}", token, clone_url),
        None => format!("https://{}", clone_url),
    };
    let cmd = ToolCommand::new("git").arg("clone").arg(url).current_dir(into);
    match token {
        Some(token) => cmd.redact(token),
        None => cmd,
    }
}

pub fn git_fetch_all(checkout: &Path) -> ToolCommand {
    ToolCommand::new("git").args(["fetch", "--all"]).current_dir(checkout)
}

pub fn git_list_branches(checkout: &Path) -> ToolCommand {
    ToolCommand::new("git")
        .args(["branch", "-a"])
        .current_dir(checkout)
        .captured()
}

pub fn git_checkout(checkout: &Path, git_ref: &str) -> ToolCommand {
    ToolCommand::new("git").args(["checkout", git_ref]).current_dir(checkout)
}

pub fn git_reset_hard(checkout: &Path, git_ref: &str) -> ToolCommand {
    ToolCommand::new("git")
        .args(["reset", "--hard", git_ref])
        .current_dir(checkout)
}

/// Whether `git branch -a` output lists `git_ref` as a local or remote branch
///
/// Remote branches match as `remotes/<remote>/<ref>`, so `login` does not
/// match `remotes/origin/feature/login`.
pub fn is_branch(branch_output: &str, git_ref: &str) -> bool {
    branch_output.lines().any(|line| {
        let branch = line.trim().trim_start_matches("* ");
        let branch = branch.split(" -> ").next().unwrap_or_default();
        if branch == git_ref {
            return true;
        }
        branch
            .strip_prefix("remotes/")
            .and_then(|remote_branch| remote_branch.split_once('/'))
            .is_some_and(|(_, name)| name == git_ref)
    })
}
