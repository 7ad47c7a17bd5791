// src/requirements/list.rs

//! Package list assembly across requirements files

use super::{PackageDescriptor, SessionState, parse_requirements};
use crate::error::{Error, Result};
use std::path::{Path, PathBuf};
use tracing::info;

/// Extension a requirements file must carry
pub const REQUIREMENTS_EXTENSION: &str = "txt";

/// Ordered packages from one or more requirements files
///
/// Files keep their order and lines keep their order within a file.
/// Repeated names are kept as separate entries.
#[derive(Debug, Clone, Default)]
pub struct PackageList {
    packages: Vec<PackageDescriptor>,
}

impl PackageList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse every file in order, each with a fresh copy of `defaults`
    ///
    /// Fails on the first unreadable or unparsable file; no partial list
    /// is returned.
    pub fn from_files<P: AsRef<Path>>(files: &[P], defaults: &SessionState) -> Result<Self> {
        let mut list = Self::new();
        for file in files {
            let mut session = defaults.clone();
            list.read_file(file.as_ref(), &mut session)?;
        }
        Ok(list)
    }

    /// Parse one file with an explicit session, appending its packages
    ///
    /// Returns the number of packages the file contributed.
    pub fn read_file(&mut self, path: &Path, session: &mut SessionState) -> Result<usize> {
        if path.extension().and_then(|e| e.to_str()) != Some(REQUIREMENTS_EXTENSION) {
            return Err(Error::UnsupportedRequirementFile(path.to_path_buf()));
        }

        info!("Reading {}", path.display());
        let source = std::fs::read_to_string(path).map_err(|e| Error::RequirementsIo {
            path: path.to_path_buf(),
            source: e,
        })?;

        let packages = parse_requirements(&source, session).map_err(|e| Error::Requirements {
            path: path.to_path_buf(),
            source: e,
        })?;

        let count = packages.len();
        self.packages.extend(packages);
        Ok(count)
    }

    pub fn packages(&self) -> &[PackageDescriptor] {
        &self.packages
    }

    pub fn len(&self) -> usize {
        self.packages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PackageDescriptor> {
        self.packages.iter()
    }
}

impl IntoIterator for PackageList {
    type Item = PackageDescriptor;
    type IntoIter = std::vec::IntoIter<PackageDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.packages.into_iter()
    }
}

impl<'a> IntoIterator for &'a PackageList {
    type Item = &'a PackageDescriptor;
    type IntoIter = std::slice::Iter<'a, PackageDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.packages.iter()
    }
}

/// Paths of the files that exist, in the given order
pub fn existing_files(paths: impl IntoIterator<Item = PathBuf>) -> Vec<PathBuf> {
    paths.into_iter().filter(|p| p.is_file()).collect()
}
