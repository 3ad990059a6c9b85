//! Fixtures for exported trace data.
//!
//! Spans can be rendered in both layouts the loaders accept:
//! - nested (`{"span_id", "attributes": {"llm.input_messages": ..}}`)
//! - flattened dataframe columns (`"attributes.llm.input_messages"`)

use serde_json::{Map, Value, json};
use spanlens_types::{Message, Span};

/// Build a typed span whose chunks are exactly `texts`, one input message each.
pub fn span_from_texts(span_id: &str, sequence_index: usize, texts: &[&str]) -> Span {
    let mut span = Span::new(span_id, sequence_index);
    if !texts.is_empty() {
        span.attributes.input_messages =
            Some(texts.iter().map(|t| Message::new("user", *t)).collect());
    }
    span
}

#[derive(Debug, Clone, Default)]
pub struct SpanFixture {
    span_id: String,
    name: Option<String>,
    kind: Option<String>,
    model_name: Option<String>,
    trace_id: Option<String>,
    parent_id: Option<String>,
    start_ms: Option<i64>,
    end_ms: Option<i64>,
    metadata: Option<Value>,
    input_messages: Vec<Value>,
    input_value: Option<Value>,
    output_messages: Vec<Value>,
    output_value: Option<Value>,
}

impl SpanFixture {
    pub fn new(span_id: impl Into<String>) -> Self {
        Self {
            span_id: span_id.into(),
            ..Self::default()
        }
    }

    pub fn name(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }

    pub fn kind(mut self, kind: &str) -> Self {
        self.kind = Some(kind.to_string());
        self
    }

    pub fn model(mut self, model: &str) -> Self {
        self.model_name = Some(model.to_string());
        self
    }

    pub fn trace(mut self, trace_id: &str) -> Self {
        self.trace_id = Some(trace_id.to_string());
        self
    }

    pub fn parent(mut self, parent_id: &str) -> Self {
        self.parent_id = Some(parent_id.to_string());
        self
    }

    pub fn times(mut self, start_ms: i64, end_ms: i64) -> Self {
        self.start_ms = Some(start_ms);
        self.end_ms = Some(end_ms);
        self
    }

    /// Attach proxy metadata carrying `session_<id>` in the user id.
    pub fn session(mut self, session_id: &str) -> Self {
        self.metadata = Some(json!({ "user_id": format!("user_test_session_{}", session_id) }));
        self
    }

    pub fn input_message(mut self, role: &str, content: &str) -> Self {
        self.input_messages
            .push(json!({ "message.role": role, "message.content": content }));
        self
    }

    pub fn input_value(mut self, value: &str) -> Self {
        self.input_value = Some(Value::String(value.to_string()));
        self
    }

    pub fn output_message(mut self, role: &str, content: &str) -> Self {
        self.output_messages
            .push(json!({ "message.role": role, "message.content": content }));
        self
    }

    pub fn output_value(mut self, value: &str) -> Self {
        self.output_value = Some(Value::String(value.to_string()));
        self
    }

    fn attributes(&self) -> Map<String, Value> {
        let mut attrs = Map::new();
        if !self.input_messages.is_empty() {
            attrs.insert(
                "llm.input_messages".into(),
                Value::Array(self.input_messages.clone()),
            );
        }
        if let Some(value) = &self.input_value {
            attrs.insert("input.value".into(), value.clone());
        }
        if !self.output_messages.is_empty() {
            attrs.insert(
                "llm.output_messages".into(),
                Value::Array(self.output_messages.clone()),
            );
        }
        if let Some(value) = &self.output_value {
            attrs.insert("output.value".into(), value.clone());
        }
        if let Some(kind) = &self.kind {
            attrs.insert("openinference.span.kind".into(), json!(kind));
        }
        if let Some(model) = &self.model_name {
            attrs.insert("llm.model_name".into(), json!(model));
        }
        attrs
    }

    fn context_fields(&self, row: &mut Map<String, Value>) {
        if let Some(name) = &self.name {
            row.insert("name".into(), json!(name));
        }
        row.insert(
            "parent_id".into(),
            self.parent_id.as_ref().map_or(Value::Null, |p| json!(p)),
        );
        if let Some(start) = self.start_ms {
            row.insert("start_time".into(), json!(start));
        }
        if let Some(end) = self.end_ms {
            row.insert("end_time".into(), json!(end));
        }
        if let Some(metadata) = &self.metadata {
            row.insert("metadata".into(), metadata.clone());
        }
    }

    /// Nested layout, as found inside reconstructed session files.
    pub fn to_nested(&self) -> Value {
        let mut row = Map::new();
        row.insert("span_id".into(), json!(self.span_id));
        if let Some(trace) = &self.trace_id {
            row.insert("trace_id".into(), json!(trace));
        }
        self.context_fields(&mut row);
        row.insert("attributes".into(), Value::Object(self.attributes()));
        Value::Object(row)
    }

    /// Flattened dataframe layout, as written by the backend exporters.
    pub fn to_flat(&self) -> Value {
        let mut row = Map::new();
        row.insert("context.span_id".into(), json!(self.span_id));
        if let Some(trace) = &self.trace_id {
            row.insert("context.trace_id".into(), json!(trace));
        }
        self.context_fields(&mut row);
        for (key, value) in self.attributes() {
            row.insert(format!("attributes.{}", key), value);
        }
        Value::Object(row)
    }
}

#[derive(Debug, Clone, Default)]
pub struct SessionFixture {
    session_number: Option<u64>,
    session_id: Option<String>,
    spans: Vec<SpanFixture>,
}

impl SessionFixture {
    pub fn new(session_number: u64) -> Self {
        Self {
            session_number: Some(session_number),
            ..Self::default()
        }
    }

    pub fn id(mut self, session_id: &str) -> Self {
        self.session_id = Some(session_id.to_string());
        self
    }

    pub fn span(mut self, span: SpanFixture) -> Self {
        self.spans.push(span);
        self
    }

    pub fn to_value(&self) -> Value {
        let mut row = Map::new();
        if let Some(number) = self.session_number {
            row.insert("session_number".into(), json!(number));
        }
        if let Some(id) = &self.session_id {
            row.insert("session_id".into(), json!(id));
        }
        row.insert("span_count".into(), json!(self.spans.len()));
        row.insert("duration_seconds".into(), json!(1.0));
        row.insert("unique_traces".into(), json!(1));
        row.insert(
            "spans".into(),
            Value::Array(self.spans.iter().map(SpanFixture::to_nested).collect()),
        );
        Value::Object(row)
    }
}

/// Render documents as JSONL text.
pub fn to_jsonl(values: &[Value]) -> String {
    values.iter().map(|v| format!("{}\n", v)).collect()
}
