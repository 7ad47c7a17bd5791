// src/requirements/mod.rs

//! pip requirements file parsing
//!
//! Reads a `requirements.txt` and turns every requirement line into a
//! [`PackageDescriptor`] the installer can act on. Parsing is done in three
//! stages:
//!
//! - [`LogicalLines`] joins continuations and drops comments
//! - [`Directive`] handles `-i`, `--extra-index-url` and `--no-index`
//! - [`classify`] maps what is left to a plain, VCS or passthrough requirement
//!
//! Version constraints and environment markers are never evaluated; they
//! are carried through to pip as text.
//!
//! # Example
//!
//! ```ignore
//! use outpak::requirements::{parse_requirements, SessionState};
//!
//! let mut session = SessionState::new();
//! let packages = parse_requirements("-i https://pypi.example/simple\ndjango==2.0.0\n", &mut session)?;
//! assert_eq!(packages[0].name(), "django");
//! assert_eq!(packages[0].index_url(), Some("https://pypi.example/simple"));
//! ```

mod classifier;
mod descriptor;
mod directive;
mod list;
mod reader;
mod session;
pub mod vcs;

pub use classifier::{classify, classify_str};
pub use descriptor::{
    Comparator, InstallOption, PackageDescriptor, PassthroughRequirement, PlainRequirement,
    Requirement, VcsRequirement, VersionSpec,
};
pub use directive::{Directive, strip_option};
pub use list::{PackageList, REQUIREMENTS_EXTENSION, existing_files};
pub use reader::{LogicalLine, LogicalLines, strip_comment};
pub use session::{IndexSnapshot, SessionState};

use thiserror::Error;
use tracing::debug;

/// Errors that abort parsing of a requirements file
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("Line {line_number}: '{line}' not allowed, list additional requirement files in pak.yml instead")]
    DisallowedNestedFile { line_number: usize, line: String },

    #[error("Line {line_number}: missing URL after {directive} in '{line}'")]
    MalformedDirectiveArgument {
        line_number: usize,
        directive: String,
        line: String,
    },

    #[error("Line {line_number}: cannot parse '{line}'")]
    UnclassifiableLine { line_number: usize, line: String },
}

impl ParseError {
    /// Physical line the error was raised for
    pub fn line_number(&self) -> usize {
        match self {
            Self::DisallowedNestedFile { line_number, .. }
            | Self::MalformedDirectiveArgument { line_number, .. }
            | Self::UnclassifiableLine { line_number, .. } => *line_number,
        }
    }
}

/// Result type for requirements parsing
pub type ParseResult<T> = Result<T, ParseError>;

/// Parse the full text of one requirements file
///
/// Directives update `session` as they are met. The first error stops the
/// parse and nothing parsed so far is returned.
pub fn parse_requirements(source: &str, session: &mut SessionState) -> ParseResult<Vec<PackageDescriptor>> {
    let mut packages = Vec::new();

    for line in LogicalLines::new(source) {
        let line = line?;

        if let Some(directive) = Directive::parse(&line)? {
            directive.apply(session);
            continue;
        }

        packages.push(classify(&line, session)?);
    }

    debug!("Parsed {} requirements", packages.len());
    Ok(packages)
}
