// src/requirements/classifier.rs

//! Requirement line classification
//!
//! A logical line (option flag already removed, whitespace squeezed out) is
//! tested against an ordered list of rules. The first rule that matches
//! decides the descriptor; later rules are more general and would otherwise
//! swallow earlier ones, so the order is part of the contract:
//!
//! 1. environment marker (`name ; marker`) - passthrough of the whole line
//! 2. versioned specifier (`name==1.0`, `>=`, `<=`, `~=`)
//! 3. extras without version (`name[a,b]`)
//! 4. simple name or local path (no `+`, no `//`)
//! 5. Mercurial / Subversion / Bazaar URLs - passthrough
//! 6. git URLs - cloned
//! 7. plain `http(s)` archive or repository URLs - passthrough
//!
//! Anything else is rejected.

use super::descriptor::{Comparator, PackageDescriptor, Requirement};
use super::directive::strip_option;
use super::reader::LogicalLine;
use super::session::SessionState;
use super::vcs::{self, PASSTHROUGH_VCS};
use super::{ParseError, ParseResult};
use tracing::debug;

/// Text handed to each classification rule
struct Candidate<'a> {
    /// Requirement with all whitespace removed
    compact: &'a str,
    /// Requirement as written, option flag removed
    original: &'a str,
}

type Rule = fn(&Candidate<'_>) -> Option<Requirement>;

const RULES: [(&str, Rule); 7] = [
    ("marker", marker_conditioned),
    ("versioned", versioned),
    ("extras", extras_only),
    ("simple", simple),
    ("vcs-passthrough", vcs_passthrough),
    ("git", git),
    ("url", bare_url),
];

/// Classify one logical line into a descriptor
///
/// The session's current indexes are copied onto the descriptor, so later
/// directives in the same file do not affect it.
pub fn classify(line: &LogicalLine, session: &SessionState) -> ParseResult<PackageDescriptor> {
    let (option, rest) = strip_option(&line.text);
    let compact: String = rest.chars().filter(|c| !c.is_whitespace()).collect();

    let unclassifiable = || ParseError::UnclassifiableLine {
        line_number: line.number,
        line: line.text.clone(),
    };

    // A bare option line (`--require-hashes`) falls through to the simple
    // rule with an empty name
    if compact.is_empty() && option.is_none() {
        return Err(unclassifiable());
    }

    let candidate = Candidate {
        compact: &compact,
        original: rest,
    };

    let (rule, requirement) = RULES
        .iter()
        .find_map(|(rule, matcher)| matcher(&candidate).map(|req| (*rule, req)))
        .ok_or_else(unclassifiable)?;

    debug!(
        "Line {}: '{}' classified as {} requirement",
        line.number, line.text, rule
    );

    Ok(PackageDescriptor {
        requirement,
        option,
        index: session.snapshot(),
        line_number: line.number,
    })
}

/// Classify a single requirement string with no file context
pub fn classify_str(text: &str, session: &SessionState) -> ParseResult<PackageDescriptor> {
    classify(&LogicalLine::new(0, text.trim()), session)
}

fn marker_conditioned(c: &Candidate<'_>) -> Option<Requirement> {
    let (name, _marker) = c.compact.split_once(';')?;
    Some(Requirement::passthrough(name, c.original))
}

fn versioned(c: &Candidate<'_>) -> Option<Requirement> {
    let bytes = c.compact.as_bytes();
    (1..bytes.len().saturating_sub(2)).find_map(|i| {
        if bytes[i + 1] != b'=' {
            return None;
        }
        let comparator = Comparator::from_signal(bytes[i] as char)?;
        Some(Requirement::versioned(
            &c.compact[..i],
            comparator,
            &c.compact[i + 2..],
        ))
    })
}

fn extras_only(c: &Candidate<'_>) -> Option<Requirement> {
    let open = c.compact.find('[').filter(|&pos| pos > 0)?;
    let close = c.compact.rfind(']').filter(|&pos| pos > open + 1)?;
    Some(Requirement::plain(&c.compact[..=close]))
}

fn simple(c: &Candidate<'_>) -> Option<Requirement> {
    if c.compact.contains('+') || c.compact.contains("//") {
        return None;
    }
    Some(Requirement::passthrough(c.compact, c.compact))
}

fn vcs_passthrough(c: &Candidate<'_>) -> Option<Requirement> {
    PASSTHROUGH_VCS
        .iter()
        .any(|prefix| c.compact.contains(prefix))
        .then(|| Requirement::passthrough(c.compact, c.compact))
}

fn git(c: &Candidate<'_>) -> Option<Requirement> {
    vcs::parse_git(c.compact).map(Requirement::Vcs)
}

fn bare_url(c: &Candidate<'_>) -> Option<Requirement> {
    if !c.compact.starts_with("http") {
        return None;
    }
    let line = c.compact.split('#').next().unwrap_or_default();
    let segment = line.trim_end_matches('/').rsplit('/').next()?;
    let name = segment.split('@').next().unwrap_or_default();
    if name.is_empty() {
        return None;
    }
    Some(Requirement::passthrough(name, line))
}
