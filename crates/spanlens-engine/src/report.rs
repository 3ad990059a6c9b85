use serde::Serialize;
use spanlens_types::{Session, SessionSource, Span};

use crate::chunk::{ContentChunk, extract_chunks};
use crate::containment::{ContainmentResult, check_containment};
use crate::haystack::Haystack;
use crate::messages::{MessageComparison, compare_messages};
use crate::summary::{SessionSummary, SpanOverview, summarize};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalyzerOptions {
    /// Characters of surrounding text kept on each side of a match
    pub context_chars: usize,
}

impl Default for AnalyzerOptions {
    fn default() -> Self {
        Self { context_chars: 50 }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SpanRef {
    pub sequence_index: usize,
    pub span_id: String,
}

impl SpanRef {
    fn of(span: &Span) -> Self {
        Self {
            sequence_index: span.sequence_index,
            span_id: span.span_id.clone(),
        }
    }
}

/// Containment of one earlier span in one later span.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PairResult {
    pub earlier: SpanRef,
    pub later: SpanRef,
    #[serde(flatten)]
    pub containment: ContainmentResult,
    /// Present only when the two spans are consecutive
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message_comparison: Option<MessageComparison>,
}

impl PairResult {
    pub fn is_adjacent(&self) -> bool {
        self.message_comparison.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionReport {
    pub session_key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_number: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_seconds: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unique_traces: Option<u64>,
    pub span_count: usize,
    pub spans: Vec<SpanOverview>,
    pub pairs: Vec<PairResult>,
    pub summary: SessionSummary,
}

impl SessionReport {
    pub fn pair(&self, earlier: usize, later: usize) -> Option<&PairResult> {
        self.pairs
            .iter()
            .find(|p| p.earlier.sequence_index == earlier && p.later.sequence_index == later)
    }

    /// Pairs of consecutive spans, in order.
    pub fn adjacent_pairs(&self) -> impl Iterator<Item = &PairResult> {
        self.pairs.iter().filter(|p| p.is_adjacent())
    }

    /// Comparison of a span with its predecessor, if it has one.
    pub fn comparison_with_previous(&self, later: usize) -> Option<&MessageComparison> {
        self.adjacent_pairs()
            .find(|p| p.later.sequence_index == later)
            .and_then(|p| p.message_comparison.as_ref())
    }
}

/// Reports for every session of a source, in source order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileReport {
    pub sessions: Vec<SessionReport>,
    pub skipped_records: usize,
}

impl FileReport {
    /// Report for a session key; the first one wins if keys repeat.
    pub fn get(&self, session_key: &str) -> Option<&SessionReport> {
        self.sessions.iter().find(|r| r.session_key == session_key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.sessions.iter().map(|r| r.session_key.as_str())
    }
}

pub fn analyze_session(session: &Session) -> SessionReport {
    analyze_session_with(session, &AnalyzerOptions::default())
}

/// Compare every earlier span of a session with every later one.
///
/// Spans are stably ordered by `sequence_index`; spans sharing an index are
/// never paired with each other.
pub fn analyze_session_with(session: &Session, options: &AnalyzerOptions) -> SessionReport {
    let mut ordered: Vec<&Span> = session.spans.iter().collect();
    ordered.sort_by_key(|s| s.sequence_index);

    let chunks: Vec<Vec<ContentChunk>> = ordered.iter().map(|s| extract_chunks(s)).collect();
    let haystacks: Vec<Haystack> = chunks.iter().map(|c| Haystack::build(c)).collect();

    let mut pairs = Vec::new();
    for (i, earlier) in ordered.iter().enumerate() {
        for (j, later) in ordered.iter().enumerate().skip(i + 1) {
            if earlier.sequence_index >= later.sequence_index {
                continue;
            }
            let containment = check_containment(&chunks[i], &haystacks[j], options.context_chars);
            let message_comparison = (j == i + 1).then(|| {
                compare_messages(
                    earlier.attributes.input_messages(),
                    later.attributes.input_messages(),
                )
            });
            pairs.push(PairResult {
                earlier: SpanRef::of(earlier),
                later: SpanRef::of(later),
                containment,
                message_comparison,
            });
        }
    }

    let spans: Vec<SpanOverview> = ordered
        .iter()
        .zip(&chunks)
        .map(|(span, chunks)| SpanOverview::new(span, chunks))
        .collect();
    let summary = summarize(&spans);

    tracing::debug!(
        session = %session.key,
        spans = spans.len(),
        pairs = pairs.len(),
        "analyzed session"
    );

    SessionReport {
        session_key: session.key.clone(),
        session_number: session.session_number,
        session_id: session.session_id.clone(),
        duration_seconds: session.duration_seconds,
        unique_traces: session.unique_traces,
        span_count: spans.len(),
        spans,
        pairs,
        summary,
    }
}

pub fn analyze_file(source: &SessionSource) -> FileReport {
    analyze_file_with(source, &AnalyzerOptions::default())
}

/// Analyze every session of a source independently.
pub fn analyze_file_with(source: &SessionSource, options: &AnalyzerOptions) -> FileReport {
    FileReport {
        sessions: source
            .sessions
            .iter()
            .map(|session| analyze_session_with(session, options))
            .collect(),
        skipped_records: source.skipped_records,
    }
}
