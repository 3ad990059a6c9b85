use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value};
use spanlens_types::TraceRecord;
use std::collections::{BTreeMap, BTreeSet};

use crate::overview::Count;

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";

/// A session rebuilt from flat trace rows, in the session file layout.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReconstructedSession {
    pub session_number: u64,
    pub session_id: String,
    pub span_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<String>,
    pub duration_seconds: f64,
    pub unique_traces: usize,
    pub spans: Vec<Value>,
    #[serde(skip)]
    pub span_kinds: Vec<Count>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Reconstruction {
    pub sessions: Vec<ReconstructedSession>,
    pub total_spans: usize,
    pub spans_with_session: usize,
}

impl Reconstruction {
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

fn format_time(time: DateTime<Utc>) -> String {
    time.format(TIME_FORMAT).to_string()
}

/// Raw span object with its timestamps normalized to the session file format.
fn normalized_raw(record: &TraceRecord) -> Value {
    let mut raw: Map<String, Value> = record.raw.clone();
    if let Some(start) = record.span.start_time {
        raw.insert("start_time".to_string(), Value::String(format_time(start)));
    }
    if let Some(end) = record.span.end_time {
        raw.insert("end_time".to_string(), Value::String(format_time(end)));
    }
    Value::Object(raw)
}

/// Group trace rows into sessions by the session id found in their metadata.
///
/// Rows are stably ordered by start time (rows without one last), sessions by
/// session id. Rows without a session id are counted but not grouped.
pub fn reconstruct_sessions(records: &[TraceRecord]) -> Reconstruction {
    let mut ordered: Vec<&TraceRecord> = records.iter().collect();
    ordered.sort_by_key(|r| (r.span.start_time.is_none(), r.span.start_time));

    let mut groups: BTreeMap<&str, Vec<&TraceRecord>> = BTreeMap::new();
    for record in ordered {
        if let Some(id) = record.session_id.as_deref() {
            groups.entry(id).or_default().push(record);
        }
    }

    let spans_with_session = groups.values().map(Vec::len).sum();
    let sessions: Vec<ReconstructedSession> = groups
        .into_iter()
        .enumerate()
        .map(|(i, (id, members))| build_session(i as u64 + 1, id, &members))
        .collect();

    tracing::debug!(
        sessions = sessions.len(),
        spans_with_session,
        total = records.len(),
        "reconstructed sessions"
    );

    Reconstruction {
        sessions,
        total_spans: records.len(),
        spans_with_session,
    }
}

fn build_session(number: u64, id: &str, members: &[&TraceRecord]) -> ReconstructedSession {
    let start = members.iter().filter_map(|r| r.span.start_time).min();
    let end = members.iter().filter_map(|r| r.span.end_time).max();
    let duration_seconds = match (start, end) {
        (Some(start), Some(end)) => (end - start).num_milliseconds() as f64 / 1000.0,
        _ => 0.0,
    };

    let unique_traces = members
        .iter()
        .filter_map(|r| r.span.trace_id.as_deref())
        .collect::<BTreeSet<_>>()
        .len();

    let mut kinds: BTreeMap<String, usize> = BTreeMap::new();
    for record in members {
        let kind = record.span.span_kind.as_deref().unwrap_or("unknown");
        *kinds.entry(kind.to_string()).or_default() += 1;
    }
    let mut span_kinds: Vec<Count> = kinds
        .into_iter()
        .map(|(key, count)| Count { key, count })
        .collect();
    span_kinds.sort_by(|a, b| b.count.cmp(&a.count));

    ReconstructedSession {
        session_number: number,
        session_id: id.to_string(),
        span_count: members.len(),
        start_time: start.map(format_time),
        end_time: end.map(format_time),
        duration_seconds,
        unique_traces,
        spans: members.iter().map(|r| normalized_raw(r)).collect(),
        span_kinds,
    }
}
