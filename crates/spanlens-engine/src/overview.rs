use chrono::{DateTime, Utc};
use serde::Serialize;
use spanlens_types::{TraceRecord, TraceSource};
use std::collections::{BTreeMap, HashMap, HashSet};

use crate::classify::classify_span;

const TOP_N: usize = 10;
const SMALL_SESSION_LIMIT: usize = 50;
const SMALL_SESSIONS_SHOWN: usize = 5;
const TIMELINE_ROWS: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Count {
    pub key: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimelineEntry {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<DateTime<Utc>>,
    pub name: String,
    pub kind: String,
    pub trace_id: String,
    pub span_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    pub duration_seconds: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TreeNode {
    pub depth: usize,
    pub name: String,
    pub kind: String,
    pub span_id: String,
}

/// Detailed view of one small session.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionFocus {
    pub session_id: String,
    pub record_count: usize,
    pub timeline: Vec<TimelineEntry>,
    pub tree: Vec<TreeNode>,
}

/// Structural statistics of a flat trace export.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TraceOverview {
    pub total_records: usize,
    pub skipped_records: usize,
    pub unique_sessions: usize,
    pub records_with_session: usize,
    pub records_without_session: usize,
    pub top_sessions: Vec<Count>,
    pub span_kinds: Vec<Count>,
    pub top_names: Vec<Count>,
    pub categories: Vec<Count>,
    pub root_spans: usize,
    pub child_spans: usize,
    pub small_sessions: Vec<Count>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub focus: Option<SessionFocus>,
}

/// Sort counts by frequency (descending), then key, for stable output.
fn ranked<I>(keys: I) -> Vec<Count>
where
    I: IntoIterator<Item = String>,
{
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    for key in keys {
        *counts.entry(key).or_default() += 1;
    }
    let mut ranked: Vec<Count> = counts
        .into_iter()
        .map(|(key, count)| Count { key, count })
        .collect();
    ranked.sort_by(|a, b| b.count.cmp(&a.count));
    ranked
}

fn or_unknown(value: Option<&str>) -> String {
    value.unwrap_or("unknown").to_string()
}

pub fn build_overview(source: &TraceSource) -> TraceOverview {
    let records = &source.records;

    let session_ranking = ranked(records.iter().filter_map(|r| r.session_id.clone()));
    let records_with_session = records.iter().filter(|r| r.session_id.is_some()).count();

    let span_kinds = ranked(records.iter().map(|r| or_unknown(r.span.span_kind.as_deref())));
    let mut top_names = ranked(records.iter().map(|r| or_unknown(r.span.name.as_deref())));
    top_names.truncate(TOP_N);
    let categories = ranked(records.iter().map(|r| classify_span(&r.span).to_string()));

    let root_spans = records.iter().filter(|r| r.span.parent_id.is_none()).count();

    let small_sessions: Vec<Count> = session_ranking
        .iter()
        .filter(|c| c.count < SMALL_SESSION_LIMIT)
        .take(SMALL_SESSIONS_SHOWN)
        .cloned()
        .collect();

    let focus = small_sessions
        .first()
        .map(|target| focus_session(records, &target.key));

    let mut top_sessions = session_ranking.clone();
    top_sessions.truncate(TOP_N);

    TraceOverview {
        total_records: records.len(),
        skipped_records: source.skipped_records,
        unique_sessions: session_ranking.len(),
        records_with_session,
        records_without_session: records.len() - records_with_session,
        top_sessions,
        span_kinds,
        top_names,
        categories,
        root_spans,
        child_spans: records.len() - root_spans,
        small_sessions,
        focus,
    }
}

/// Records sorted by start time; records without one keep their order at the end.
fn chronological<'a>(records: impl Iterator<Item = &'a TraceRecord>) -> Vec<&'a TraceRecord> {
    let mut sorted: Vec<&TraceRecord> = records.collect();
    sorted.sort_by_key(|r| (r.span.start_time.is_none(), r.span.start_time));
    sorted
}

fn focus_session(records: &[TraceRecord], session_id: &str) -> SessionFocus {
    let members = chronological(
        records
            .iter()
            .filter(|r| r.session_id.as_deref() == Some(session_id)),
    );

    let timeline = members
        .iter()
        .take(TIMELINE_ROWS)
        .map(|r| TimelineEntry {
            start_time: r.span.start_time,
            name: or_unknown(r.span.name.as_deref()),
            kind: or_unknown(r.span.span_kind.as_deref()),
            trace_id: r.span.trace_id.clone().unwrap_or_default(),
            span_id: r.span.span_id.clone(),
            parent_id: r.span.parent_id.clone(),
            duration_seconds: r.span.duration_seconds().unwrap_or(0.0),
        })
        .collect();

    SessionFocus {
        session_id: session_id.to_string(),
        record_count: members.len(),
        timeline,
        tree: span_tree(&members),
    }
}

/// Depth-first parent/child tree, siblings in chronological order.
fn span_tree(members: &[&TraceRecord]) -> Vec<TreeNode> {
    let mut children: HashMap<&str, Vec<&TraceRecord>> = HashMap::new();
    for record in members {
        if let Some(parent) = record.span.parent_id.as_deref() {
            children.entry(parent).or_default().push(*record);
        }
    }

    let mut nodes = Vec::new();
    let mut visited = HashSet::new();
    let mut stack: Vec<(&TraceRecord, usize)> = members
        .iter()
        .rev()
        .filter(|r| r.span.parent_id.is_none())
        .map(|r| (*r, 0))
        .collect();

    while let Some((record, depth)) = stack.pop() {
        if !visited.insert(record.span.span_id.as_str()) {
            continue;
        }
        nodes.push(TreeNode {
            depth,
            name: or_unknown(record.span.name.as_deref()),
            kind: or_unknown(record.span.span_kind.as_deref()),
            span_id: record.span.span_id.clone(),
        });
        if let Some(kids) = children.get(record.span.span_id.as_str()) {
            for kid in kids.iter().rev() {
                stack.push((*kid, depth + 1));
            }
        }
    }

    nodes
}
