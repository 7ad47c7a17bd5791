// src/requirements/session.rs

//! Per-file parser state
//!
//! Index directives (`-i`, `--extra-index-url`, `--no-index`) change the
//! indexes used for every requirement that follows them in the same file.
//! That state lives in a [`SessionState`] owned by whoever drives the parse,
//! so nothing carries over to the next file unless the caller passes the
//! same value on purpose.

use serde::Serialize;

/// Mutable index context for one requirements-file pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    current_index: Option<String>,
    extra_indexes: Vec<String>,
}

impl SessionState {
    /// Create an empty session (pip's default index, no extras)
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a session seeded with configured defaults
    pub fn with_defaults(index_url: Option<String>, extra_indexes: Vec<String>) -> Self {
        Self {
            current_index: index_url,
            extra_indexes,
        }
    }

    pub fn current_index(&self) -> Option<&str> {
        self.current_index.as_deref()
    }

    pub fn extra_indexes(&self) -> &[String] {
        &self.extra_indexes
    }

    /// Handle `-i URL` / `--index-url URL`
    pub fn set_index(&mut self, url: impl Into<String>) {
        self.current_index = Some(url.into());
    }

    /// Handle `--extra-index-url URL`
    pub fn add_extra_index(&mut self, url: impl Into<String>) {
        self.extra_indexes.push(url.into());
    }

    /// Handle `--no-index`
    pub fn clear(&mut self) {
        self.current_index = None;
        self.extra_indexes.clear();
    }

    /// Copy the current indexes for stamping onto a descriptor
    pub fn snapshot(&self) -> IndexSnapshot {
        IndexSnapshot {
            index_url: self.current_index.clone(),
            extra_indexes: self.extra_indexes.clone(),
        }
    }
}

/// Indexes in effect when a requirement was classified
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IndexSnapshot {
    pub index_url: Option<String>,
    pub extra_indexes: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_is_detached() {
        let mut session = SessionState::new();
        session.set_index("https://a.example/simple");
        let before = session.snapshot();

        session.add_extra_index("https://b.example/simple");
        assert!(before.extra_indexes.is_empty());
        assert_eq!(session.snapshot().extra_indexes, vec!["https://b.example/simple"]);
    }

    #[test]
    fn test_clear_resets_everything() {
        let mut session = SessionState::with_defaults(
            Some("https://a.example".to_string()),
            vec!["https://b.example".to_string()],
        );
        session.clear();
        assert_eq!(session, SessionState::new());
    }
}
