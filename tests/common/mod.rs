// tests/common/mod.rs

//! Shared test utilities and helpers for integration tests.

#![allow(dead_code)]

use outpak::install::{CommandRunner, InstallResult, ToolCommand};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Requirements file exercising every classification rule
pub const MIXED_REQUIREMENTS: &str = r#"# Production dependencies
-i https://pypi.internal.example/simple

django==2.0.0
requests[security]>=2.18.0  # pinned for TLS fixes
SomeProject[foo, bar]
simplejson
SomeProject ==5.4 ; python_version < '2.7'

--extra-index-url https://extra.example/simple
-e git+git@github.com:org/repo@1.0.0#egg=repo
git+https://bitbucket.org/team/tool.git@develop#egg=tool
hg+http://hg.myproject.org/MyProject#egg=MyProject
https://git.myproject.org/Archive@commit1234#egg=Archive
--no-binary grpcio==1.30.0
"#;

/// Write files into a fresh temp dir.
///
/// Returns (TempDir, paths) - keep the TempDir alive to prevent cleanup.
pub fn write_files(files: &[(&str, &str)]) -> (TempDir, Vec<PathBuf>) {
    let dir = tempfile::tempdir().unwrap();
    let paths = files
        .iter()
        .map(|(name, content)| {
            let path = dir.path().join(name);
            std::fs::write(&path, content).unwrap();
            path
        })
        .collect();
    (dir, paths)
}

/// Runner that records every command instead of executing it
#[derive(Default)]
pub struct RecordingRunner {
    pub commands: Vec<ToolCommand>,
    pub dirs: Vec<PathBuf>,
    /// Output returned for captured commands (`git branch -a`)
    pub branches: String,
}

impl RecordingRunner {
    pub fn rendered(&self) -> Vec<String> {
        self.commands.iter().map(|c| c.to_string()).collect()
    }
}

impl CommandRunner for RecordingRunner {
    fn run(&mut self, command: &ToolCommand) -> InstallResult<String> {
        self.commands.push(command.clone());
        if command.capture {
            Ok(self.branches.clone())
        } else {
            Ok(String::new())
        }
    }

    fn recreate_dir(&mut self, dir: &Path) -> InstallResult<()> {
        self.dirs.push(dir.to_path_buf());
        Ok(())
    }
}
