use serde_json::{Map, Value};

use crate::span::Span;

/// One flat span row from a backend trace export.
///
/// The raw object is kept so that reconstruction can write spans back out
/// without losing columns this crate does not model.
#[derive(Debug, Clone, PartialEq)]
pub struct TraceRecord {
    pub span: Span,
    pub session_id: Option<String>,
    pub raw: Map<String, Value>,
}

/// Trace rows loaded from one or more export files.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TraceSource {
    pub records: Vec<TraceRecord>,
    pub skipped_records: usize,
}

impl TraceSource {
    pub fn extend(&mut self, other: TraceSource) {
        self.records.extend(other.records);
        self.skipped_records += other.skipped_records;
    }
}
