use serde::Serialize;
use spanlens_engine::{Count, FileReport, ReconstructedSession, Reconstruction, TraceOverview};
use spanlens_providers::Backend;
use std::fmt;

use super::formatters::Palette;
use crate::config::DisplayConfig;

/// Bridge from a view model to its text rendering.
pub trait CreateView {
    fn create_view<'a>(&'a self, palette: Palette) -> Box<dyn fmt::Display + 'a>;
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StatusLevel {
    Success,
    Warning,
}

#[derive(Debug, Clone, Serialize)]
pub struct StatusBadge {
    pub level: StatusLevel,
    pub label: String,
}

impl StatusBadge {
    pub fn success(label: impl Into<String>) -> Self {
        Self {
            level: StatusLevel::Success,
            label: label.into(),
        }
    }

    pub fn warning(label: impl Into<String>) -> Self {
        Self {
            level: StatusLevel::Warning,
            label: label.into(),
        }
    }

    pub fn icon(&self) -> &str {
        match self.level {
            StatusLevel::Success => "✅",
            StatusLevel::Warning => "⚠️",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Guidance {
    pub description: String,
    pub command: Option<String>,
}

impl Guidance {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            command: None,
        }
    }

    pub fn with_command(mut self, command: impl Into<String>) -> Self {
        self.command = Some(command.into());
        self
    }
}

#[derive(Debug, Serialize)]
pub struct CommandResultViewModel<T>
where
    T: Serialize,
{
    #[serde(skip_serializing_if = "Option::is_none")]
    pub badge: Option<StatusBadge>,

    pub content: T,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub suggestions: Vec<Guidance>,
}

impl<T> CommandResultViewModel<T>
where
    T: Serialize,
{
    pub fn new(content: T) -> Self {
        Self {
            badge: None,
            content,
            suggestions: Vec::new(),
        }
    }

    pub fn with_badge(mut self, badge: StatusBadge) -> Self {
        self.badge = Some(badge);
        self
    }

    pub fn with_suggestion(mut self, guide: Guidance) -> Self {
        self.suggestions.push(guide);
        self
    }
}

// --------------------------------------------------------------------------
// compare
// --------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct CompareViewModel {
    pub source: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected: Option<String>,
    #[serde(flatten)]
    pub report: FileReport,
    #[serde(skip)]
    pub display: DisplayConfig,
}

// --------------------------------------------------------------------------
// analyze
// --------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct AnalyzeViewModel {
    pub source: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backend: Option<Backend>,
    pub auto_detected: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tools_file: Option<String>,
    #[serde(flatten)]
    pub overview: TraceOverview,
}

// --------------------------------------------------------------------------
// reconstruct
// --------------------------------------------------------------------------

/// Listing entry for a written session (spans themselves go to the file).
#[derive(Debug, Serialize)]
pub struct SessionEntryViewModel {
    pub session_number: u64,
    pub session_id: String,
    pub span_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<String>,
    pub duration_seconds: f64,
    pub unique_traces: usize,
    pub span_kinds: Vec<Count>,
}

impl From<&ReconstructedSession> for SessionEntryViewModel {
    fn from(session: &ReconstructedSession) -> Self {
        Self {
            session_number: session.session_number,
            session_id: session.session_id.clone(),
            span_count: session.span_count,
            start_time: session.start_time.clone(),
            end_time: session.end_time.clone(),
            duration_seconds: session.duration_seconds,
            unique_traces: session.unique_traces,
            span_kinds: session.span_kinds.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ReconstructViewModel {
    pub source: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tools_file: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bytes_written: Option<u64>,
    pub total_spans: usize,
    pub spans_with_session: usize,
    pub skipped_records: usize,
    pub sessions: Vec<SessionEntryViewModel>,
}

impl ReconstructViewModel {
    pub fn new(
        source: String,
        tools_file: Option<String>,
        skipped_records: usize,
        rebuilt: &Reconstruction,
    ) -> Self {
        Self {
            source,
            tools_file,
            output: None,
            bytes_written: None,
            total_spans: rebuilt.total_spans,
            spans_with_session: rebuilt.spans_with_session,
            skipped_records,
            sessions: rebuilt
                .sessions
                .iter()
                .map(SessionEntryViewModel::from)
                .collect(),
        }
    }
}
