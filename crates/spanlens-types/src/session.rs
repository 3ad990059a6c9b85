use serde::{Deserialize, Serialize};

use crate::span::Span;

/// An ordered sequence of spans sharing a conversation identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    /// Lookup key: session id, else session number, else 1-based record position
    pub key: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_number: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_seconds: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unique_traces: Option<u64>,

    pub spans: Vec<Span>,
}

impl Session {
    pub fn new(key: impl Into<String>, spans: Vec<Span>) -> Self {
        Self {
            key: key.into(),
            session_number: None,
            session_id: None,
            duration_seconds: None,
            unique_traces: None,
            spans,
        }
    }

    /// Whether a user-supplied selector names this session.
    ///
    /// A selector matches the session number (`--session 2`), the session id,
    /// or the lookup key.
    pub fn matches_selector(&self, selector: &str) -> bool {
        let selector = selector.trim();
        if self.key == selector {
            return true;
        }
        if self.session_id.as_deref() == Some(selector) {
            return true;
        }
        match (self.session_number, selector.parse::<u64>()) {
            (Some(number), Ok(wanted)) => number == wanted,
            _ => false,
        }
    }
}

/// Sessions loaded from a source file, with the number of records that were skipped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionSource {
    pub sessions: Vec<Session>,
    pub skipped_records: usize,
}

impl SessionSource {
    pub fn find(&self, selector: &str) -> Option<&Session> {
        self.sessions.iter().find(|s| s.matches_selector(selector))
    }
}
