// src/requirements/directive.rs

//! Global directives and install option flags
//!
//! Index directives change the [`SessionState`] and produce no package.
//! Option flags (`-e`, `--no-binary`, ...) are peeled off the front of a
//! requirement line and kept on its descriptor.

use super::descriptor::InstallOption;
use super::reader::LogicalLine;
use super::session::SessionState;
use super::{ParseError, ParseResult};
use tracing::debug;

/// A line that mutates session state instead of naming a package
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive {
    /// `-i URL` / `--index-url URL`
    IndexUrl(String),
    /// `--extra-index-url URL`
    ExtraIndexUrl(String),
    /// `--no-index`
    NoIndex,
}

impl Directive {
    /// Recognize a directive line
    ///
    /// Returns `Ok(None)` for lines that are not directives.
    pub fn parse(line: &LogicalLine) -> ParseResult<Option<Self>> {
        let text = line.text.as_str();

        if let Some(rest) = long_flag(text, "--extra-index-url") {
            return directive_argument(line, "--extra-index-url", rest).map(|url| Some(Self::ExtraIndexUrl(url)));
        }
        if let Some(rest) = long_flag(text, "--index-url") {
            return directive_argument(line, "--index-url", rest).map(|url| Some(Self::IndexUrl(url)));
        }
        if long_flag(text, "--no-index").is_some() {
            return Ok(Some(Self::NoIndex));
        }
        if let Some(rest) = text.strip_prefix("-i") {
            return directive_argument(line, "-i", rest).map(|url| Some(Self::IndexUrl(url)));
        }

        Ok(None)
    }

    /// Apply the directive to the session
    pub fn apply(self, session: &mut SessionState) {
        debug!("Applying directive {:?}", self);
        match self {
            Self::IndexUrl(url) => session.set_index(url),
            Self::ExtraIndexUrl(url) => session.add_extra_index(url),
            Self::NoIndex => session.clear(),
        }
    }
}

/// Match a long flag that must end at whitespace, `=` or end of line
fn long_flag<'a>(text: &'a str, flag: &str) -> Option<&'a str> {
    let rest = text.strip_prefix(flag)?;
    if rest.is_empty() || rest.starts_with(|c: char| c.is_whitespace() || c == '=') {
        Some(rest)
    } else {
        None
    }
}

/// Take the first token after a directive flag
fn directive_argument(line: &LogicalLine, flag: &str, rest: &str) -> ParseResult<String> {
    let rest = rest.trim_start();
    let rest = rest.strip_prefix('=').unwrap_or(rest);
    match rest.split_whitespace().next() {
        Some(url) => Ok(url.to_string()),
        None => Err(ParseError::MalformedDirectiveArgument {
            line_number: line.number,
            directive: flag.to_string(),
            line: line.text.clone(),
        }),
    }
}

/// Remove a leading install option flag
///
/// Returns the flag (if any) and the remaining requirement text, trimmed.
pub fn strip_option(text: &str) -> (Option<InstallOption>, &str) {
    for option in InstallOption::ALL {
        let flag = option.flag();
        let rest = if flag.starts_with("--") {
            long_flag(text, flag).map(|rest| rest.trim_start().trim_start_matches('='))
        } else {
            text.strip_prefix(flag)
        };
        if let Some(rest) = rest {
            return (Some(option), rest.trim());
        }
    }
    (None, text)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn directive(text: &str) -> ParseResult<Option<Directive>> {
        Directive::parse(&LogicalLine::new(1, text))
    }

    #[test]
    fn test_index_url_forms() {
        let expected = Some(Directive::IndexUrl("https://pypi.example/simple".to_string()));
        assert_eq!(directive("-i https://pypi.example/simple").unwrap(), expected);
        assert_eq!(directive("--index-url https://pypi.example/simple").unwrap(), expected);
        assert_eq!(directive("--index-url=https://pypi.example/simple").unwrap(), expected);
        assert_eq!(directive("-ihttps://pypi.example/simple").unwrap(), expected);
    }

    #[test]
    fn test_extra_index_and_no_index() {
        assert_eq!(
            directive("--extra-index-url https://extra.example").unwrap(),
            Some(Directive::ExtraIndexUrl("https://extra.example".to_string()))
        );
        assert_eq!(directive("--no-index").unwrap(), Some(Directive::NoIndex));
    }

    #[test]
    fn test_missing_argument_is_fatal() {
        for text in ["-i", "--index-url", "--extra-index-url", "--extra-index-url   "] {
            match directive(text) {
                Err(ParseError::MalformedDirectiveArgument { .. }) => {}
                other => panic!("{}: expected malformed argument, got {:?}", text, other),
            }
        }
    }

    #[test]
    fn test_non_directives() {
        assert_eq!(directive("django==2.0").unwrap(), None);
        assert_eq!(directive("-e git+https://host/x#egg=x").unwrap(), None);
        assert_eq!(directive("--index-urls foo").unwrap(), None);
    }

    #[test]
    fn test_apply_updates_session() {
        let mut session = SessionState::new();
        Directive::IndexUrl("A".to_string()).apply(&mut session);
        Directive::ExtraIndexUrl("B".to_string()).apply(&mut session);
        assert_eq!(session.current_index(), Some("A"));
        assert_eq!(session.extra_indexes(), ["B".to_string()]);

        Directive::NoIndex.apply(&mut session);
        assert_eq!(session.current_index(), None);
        assert!(session.extra_indexes().is_empty());
    }

    #[test]
    fn test_strip_option() {
        assert_eq!(
            strip_option("-e git+https://host/x#egg=x"),
            (Some(InstallOption::Editable), "git+https://host/x#egg=x")
        );
        assert_eq!(strip_option("-f ./wheels"), (Some(InstallOption::FindLinksShort), "./wheels"));
        assert_eq!(strip_option("--find-links ./wheels"), (Some(InstallOption::FindLinks), "./wheels"));
        assert_eq!(strip_option("--no-binary=:all:"), (Some(InstallOption::NoBinary), ":all:"));
        assert_eq!(strip_option("--require-hashes"), (Some(InstallOption::RequireHashes), ""));
        assert_eq!(strip_option("django"), (None, "django"));
    }

    #[test]
    fn test_strip_option_only_touches_prefix() {
        let (option, rest) = strip_option("-e git+https://github.com/my-enterprise/tool#egg=tool");
        assert_eq!(option, Some(InstallOption::Editable));
        assert_eq!(rest, "git+https://github.com/my-enterprise/tool#egg=tool");
    }
}
