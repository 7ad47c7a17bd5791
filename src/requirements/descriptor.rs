// src/requirements/descriptor.rs

//! Package descriptors produced by the classifier
//!
//! Each requirement line becomes one [`PackageDescriptor`]. The shape of the
//! requirement is a tagged [`Requirement`]:
//!
//! - `Plain` - structured name with an optional version specifier
//! - `Vcs` - a git repository to clone, with an optional ref
//! - `Passthrough` - text handed to pip verbatim
//!
//! The flat accessors on [`PackageDescriptor`] (`name()`, `signal()`,
//! `clone_url()`, ...) give the installer a uniform view over all three.

use super::session::IndexSnapshot;
use serde::{Serialize, Serializer};
use std::fmt;

/// Version comparator, stored as the character before `=`
///
/// `==` is `Eq`, `>=` is `Ge`, `<=` is `Le` and `~=` is `Compatible`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Comparator {
    Eq,
    Ge,
    Le,
    Compatible,
}

impl Comparator {
    /// Parse the leading character of a two-character operator
    pub fn from_signal(c: char) -> Option<Self> {
        match c {
            '=' => Some(Self::Eq),
            '>' => Some(Self::Ge),
            '<' => Some(Self::Le),
            '~' => Some(Self::Compatible),
            _ => None,
        }
    }

    /// The signal character (`=`, `>`, `<`, `~`)
    pub fn signal(&self) -> char {
        match self {
            Self::Eq => '=',
            Self::Ge => '>',
            Self::Le => '<',
            Self::Compatible => '~',
        }
    }

    /// The full pip operator (`==`, `>=`, `<=`, `~=`)
    pub fn operator(&self) -> &'static str {
        match self {
            Self::Eq => "==",
            Self::Ge => ">=",
            Self::Le => "<=",
            Self::Compatible => "~=",
        }
    }
}

impl fmt::Display for Comparator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.operator())
    }
}

impl Serialize for Comparator {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_char(self.signal())
    }
}

/// Install option flag found at the start of a requirement line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InstallOption {
    /// `-e`
    Editable,
    /// `-f`
    FindLinksShort,
    /// `--find-links`
    FindLinks,
    /// `--no-binary`
    NoBinary,
    /// `--only-binary`
    OnlyBinary,
    /// `--require-hashes`
    RequireHashes,
}

impl InstallOption {
    /// All options, long spellings before the short ones they could shadow
    pub const ALL: [InstallOption; 6] = [
        Self::FindLinks,
        Self::NoBinary,
        Self::OnlyBinary,
        Self::RequireHashes,
        Self::Editable,
        Self::FindLinksShort,
    ];

    /// The flag as written in the requirements file and passed to pip
    pub fn flag(&self) -> &'static str {
        match self {
            Self::Editable => "-e",
            Self::FindLinksShort => "-f",
            Self::FindLinks => "--find-links",
            Self::NoBinary => "--no-binary",
            Self::OnlyBinary => "--only-binary",
            Self::RequireHashes => "--require-hashes",
        }
    }
}

impl fmt::Display for InstallOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.flag())
    }
}

impl Serialize for InstallOption {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.flag())
    }
}

/// `<comparator><version>` part of a versioned requirement
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VersionSpec {
    #[serde(rename = "signal")]
    pub comparator: Comparator,
    pub version: String,
}

/// Structured requirement installed as `pip install name[op version]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlainRequirement {
    pub name: String,
    #[serde(flatten)]
    pub specifier: Option<VersionSpec>,
}

/// Git repository cloned and installed from its checkout
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VcsRequirement {
    /// Host and path, without scheme or `.git` suffix
    pub clone_url: String,
    /// Branch, tag or commit
    #[serde(rename = "ref")]
    pub git_ref: Option<String>,
    /// Last path segment of the clone URL
    pub name: String,
    /// Value of `#egg=` when present
    pub egg: Option<String>,
}

/// Text forwarded to pip unchanged
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PassthroughRequirement {
    pub name: String,
    pub line: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Requirement {
    Plain(PlainRequirement),
    Vcs(VcsRequirement),
    Passthrough(PassthroughRequirement),
}

impl Requirement {
    pub fn plain(name: impl Into<String>) -> Self {
        Self::Plain(PlainRequirement {
            name: name.into(),
            specifier: None,
        })
    }

    pub fn versioned(name: impl Into<String>, comparator: Comparator, version: impl Into<String>) -> Self {
        Self::Plain(PlainRequirement {
            name: name.into(),
            specifier: Some(VersionSpec {
                comparator,
                version: version.into(),
            }),
        })
    }

    pub fn passthrough(name: impl Into<String>, line: impl Into<String>) -> Self {
        Self::Passthrough(PassthroughRequirement {
            name: name.into(),
            line: line.into(),
        })
    }
}

/// One classified requirement line
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PackageDescriptor {
    #[serde(flatten)]
    pub requirement: Requirement,
    pub option: Option<InstallOption>,
    #[serde(flatten)]
    pub index: IndexSnapshot,
    /// First physical line in the source file (0 when parsed standalone)
    pub line_number: usize,
}

impl PackageDescriptor {
    pub fn name(&self) -> &str {
        match &self.requirement {
            Requirement::Plain(r) => &r.name,
            Requirement::Vcs(r) => &r.name,
            Requirement::Passthrough(r) => &r.name,
        }
    }

    pub fn signal(&self) -> Option<char> {
        self.specifier().map(|s| s.comparator.signal())
    }

    pub fn version(&self) -> Option<&str> {
        self.specifier().map(|s| s.version.as_str())
    }

    pub fn specifier(&self) -> Option<&VersionSpec> {
        match &self.requirement {
            Requirement::Plain(r) => r.specifier.as_ref(),
            _ => None,
        }
    }

    pub fn clone_url(&self) -> Option<&str> {
        match &self.requirement {
            Requirement::Vcs(r) => Some(&r.clone_url),
            _ => None,
        }
    }

    pub fn git_ref(&self) -> Option<&str> {
        match &self.requirement {
            Requirement::Vcs(r) => r.git_ref.as_deref(),
            _ => None,
        }
    }

    pub fn line(&self) -> Option<&str> {
        match &self.requirement {
            Requirement::Passthrough(r) => Some(&r.line),
            _ => None,
        }
    }

    /// Whether the installer should hand `line()` to pip verbatim
    pub fn using_original_line(&self) -> bool {
        matches!(self.requirement, Requirement::Passthrough(_))
    }

    pub fn is_vcs(&self) -> bool {
        matches!(self.requirement, Requirement::Vcs(_))
    }

    pub fn index_url(&self) -> Option<&str> {
        self.index.index_url.as_deref()
    }

    pub fn extra_indexes(&self) -> &[String] {
        &self.index.extra_indexes
    }
}

impl fmt::Display for PackageDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(option) = self.option {
            write!(f, "{} ", option)?;
        }
        match &self.requirement {
            Requirement::Plain(r) => {
                write!(f, "{}", r.name)?;
                if let Some(spec) = &r.specifier {
                    write!(f, "{}{}", spec.comparator, spec.version)?;
                }
                Ok(())
            }
            Requirement::Vcs(r) => match &r.git_ref {
                Some(git_ref) => write!(f, "{} ({}@{})", r.name, r.clone_url, git_ref),
                None => write!(f, "{} ({})", r.name, r.clone_url),
            },
            Requirement::Passthrough(r) => write!(f, "{}", r.line),
        }
    }
}
