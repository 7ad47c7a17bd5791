// src/requirements/reader.rs

//! Logical line reader for requirements files
//!
//! Turns physical lines into logical lines: blank and comment lines are
//! skipped, trailing ` #` comments are removed, and `\` continuations are
//! joined. Nested `-r`/`-c` includes are rejected here, before any line is
//! classified.

use super::{ParseError, ParseResult};
use std::str::Lines;

/// One complete requirements instruction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogicalLine {
    /// 1-based number of the first physical line this was read from
    pub number: usize,
    /// Joined, comment-free, trimmed text
    pub text: String,
}

impl LogicalLine {
    pub fn new(number: usize, text: impl Into<String>) -> Self {
        Self {
            number,
            text: text.into(),
        }
    }
}

/// Lazy iterator over the logical lines of one requirements file
///
/// A clone continues from the same position; build a new reader from the
/// source text to start over.
///
/// # Continuations
///
/// A physical line containing `\` contributes only the text before the
/// backslash. The next physical line without a backslash closes the
/// logical line, but its own text is dropped:
///
/// ```text
/// Foo \
/// Bar
/// ```
///
/// yields the single logical line `Foo`.
#[derive(Debug, Clone)]
pub struct LogicalLines<'a> {
    lines: Lines<'a>,
    physical: usize,
    pending: Option<(usize, String)>,
    failed: bool,
}

impl<'a> LogicalLines<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            lines: source.lines(),
            physical: 0,
            pending: None,
            failed: false,
        }
    }

    fn emit(number: usize, text: &str) -> Option<LogicalLine> {
        let text = text.trim();
        if text.is_empty() {
            None
        } else {
            Some(LogicalLine::new(number, text))
        }
    }
}

impl Iterator for LogicalLines<'_> {
    type Item = ParseResult<LogicalLine>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }

        loop {
            let Some(raw) = self.lines.next() else {
                // File ended inside a continuation
                let (number, text) = self.pending.take()?;
                return Self::emit(number, &text).map(Ok);
            };
            self.physical += 1;

            let trimmed = raw.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }

            if is_nested_file(trimmed) {
                self.failed = true;
                return Some(Err(ParseError::DisallowedNestedFile {
                    line_number: self.physical,
                    line: trimmed.to_string(),
                }));
            }

            let content = strip_comment(trimmed);

            if let Some((before, _)) = content.split_once('\\') {
                let (_, acc) = self
                    .pending
                    .get_or_insert_with(|| (self.physical, String::new()));
                acc.push_str(before);
                continue;
            }

            match self.pending.take() {
                Some((number, acc)) => {
                    if let Some(line) = Self::emit(number, &acc) {
                        return Some(Ok(line));
                    }
                }
                None => {
                    if let Some(line) = Self::emit(self.physical, content) {
                        return Some(Ok(line));
                    }
                }
            }
        }
    }
}

/// Remove a trailing comment; the `#` must be preceded by a space
pub fn strip_comment(line: &str) -> &str {
    match line.find(" #") {
        Some(pos) => &line[..pos],
        None => line,
    }
}

/// Check for `-r`/`-c` (and long forms) nested file references
fn is_nested_file(line: &str) -> bool {
    ["-r", "-c", "--requirement", "--constraint"]
        .iter()
        .any(|flag| match line.strip_prefix(flag) {
            Some(rest) => rest.is_empty() || rest.starts_with(|c: char| c.is_whitespace() || c == '='),
            None => false,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect(source: &str) -> Vec<String> {
        LogicalLines::new(source)
            .map(|l| l.unwrap().text)
            .collect()
    }

    #[test]
    fn test_skips_blank_and_comment_lines() {
        let lines = collect("\n# a comment\n   \n  # indented\ndjango==2.0\n");
        assert_eq!(lines, vec!["django==2.0"]);
    }

    #[test]
    fn test_strips_trailing_comment() {
        let lines = collect("requests>=2.0 # http client\n");
        assert_eq!(lines, vec!["requests>=2.0"]);
    }

    #[test]
    fn test_hash_without_space_is_kept() {
        let lines = collect("git+https://github.com/org/repo#egg=repo\n");
        assert_eq!(lines, vec!["git+https://github.com/org/repo#egg=repo"]);
    }

    #[test]
    fn test_continuation_drops_closing_line() {
        let lines = collect("Foo \\\nBar\nbaz\n");
        assert_eq!(lines, vec!["Foo", "baz"]);
    }

    #[test]
    fn test_continuation_accumulates_multiple_lines() {
        let lines = collect("requests\\\n>=2.0 \\\n# comment\n\nend\n");
        assert_eq!(lines, vec!["requests>=2.0"]);
    }

    #[test]
    fn test_continuation_at_end_of_file() {
        let lines = collect("flask \\");
        assert_eq!(lines, vec!["flask"]);
    }

    #[test]
    fn test_line_numbers_track_first_physical_line() {
        let lines: Vec<LogicalLine> = LogicalLines::new("\n# c\nfoo \\\nbar\nbaz")
            .map(|l| l.unwrap())
            .collect();
        assert_eq!(lines[0], LogicalLine::new(3, "foo"));
        assert_eq!(lines[1], LogicalLine::new(5, "baz"));
    }

    #[test]
    fn test_nested_file_is_fatal() {
        let mut reader = LogicalLines::new("django\n-r other.txt\nflask\n");
        assert!(reader.next().unwrap().is_ok());
        match reader.next() {
            Some(Err(ParseError::DisallowedNestedFile { line_number, line })) => {
                assert_eq!(line_number, 2);
                assert_eq!(line, "-r other.txt");
            }
            other => panic!("expected nested file error, got {:?}", other),
        }
        assert!(reader.next().is_none());
    }

    #[test]
    fn test_nested_file_forms() {
        assert!(is_nested_file("-r other.txt"));
        assert!(is_nested_file("-c constraints.txt"));
        assert!(is_nested_file("-r"));
        assert!(is_nested_file("--requirement=base.txt"));
        assert!(is_nested_file("--constraint c.txt"));
        assert!(!is_nested_file("-e git+https://host/x#egg=x"));
        assert!(!is_nested_file("--require-hashes"));
        assert!(!is_nested_file("-rfoo"));
    }

    #[test]
    fn test_reader_is_restartable_from_source() {
        let source = "a\nb\n";
        let first: Vec<_> = LogicalLines::new(source).collect();
        let second: Vec<_> = LogicalLines::new(source).collect();
        assert_eq!(first.len(), 2);
        assert_eq!(first.len(), second.len());
    }
}
