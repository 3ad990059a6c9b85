use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::text::extract_text;

/// A role-tagged entry of an LLM message list.
///
/// `content` is kept as raw JSON because exporters disagree on its shape
/// (plain string, serialized block list, structured block list).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    pub content: Value,
}

impl Message {
    pub fn new(role: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            role: Some(role.into()),
            content: Value::String(text.into()),
        }
    }

    /// Text content of the message, fragments joined by newlines.
    ///
    /// Returns `None` for non-text messages (images, bare tool calls, empty strings).
    pub fn text(&self) -> Option<String> {
        let parts = extract_text(&self.content);
        if parts.is_empty() {
            None
        } else {
            Some(parts.join("\n"))
        }
    }
}

/// The four content-bearing attributes of a span.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SpanAttributes {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_messages: Option<Vec<Message>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_messages: Option<Vec<Message>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_value: Option<String>,
}

impl SpanAttributes {
    pub fn is_empty(&self) -> bool {
        self.input_messages.as_ref().is_none_or(|m| m.is_empty())
            && self.input_value.as_deref().is_none_or(|v| v.trim().is_empty())
            && self.output_messages.as_ref().is_none_or(|m| m.is_empty())
            && self.output_value.as_deref().is_none_or(|v| v.trim().is_empty())
    }

    pub fn input_messages(&self) -> &[Message] {
        self.input_messages.as_deref().unwrap_or_default()
    }

    pub fn output_messages(&self) -> &[Message] {
        self.output_messages.as_deref().unwrap_or_default()
    }
}

/// A single recorded unit of interaction (LLM call, tool call, chain step).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Span {
    pub span_id: String,

    /// Position of the span within its session (order of occurrence)
    pub sequence_index: usize,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trace_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,

    /// OpenInference span kind (LLM, TOOL, CHAIN, ...)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub span_kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<DateTime<Utc>>,

    #[serde(default)]
    pub attributes: SpanAttributes,
}

impl Span {
    pub fn new(span_id: impl Into<String>, sequence_index: usize) -> Self {
        Self {
            span_id: span_id.into(),
            sequence_index,
            name: None,
            trace_id: None,
            parent_id: None,
            span_kind: None,
            model_name: None,
            start_time: None,
            end_time: None,
            attributes: SpanAttributes::default(),
        }
    }

    pub fn duration_seconds(&self) -> Option<f64> {
        let start = self.start_time?;
        let end = self.end_time?;
        Some((end - start).num_milliseconds() as f64 / 1000.0)
    }

    /// Length in characters of the output, preferring the output value over messages.
    pub fn output_chars(&self) -> usize {
        if let Some(value) = &self.attributes.output_value {
            return value.chars().count();
        }
        self.attributes
            .output_messages()
            .iter()
            .filter_map(Message::text)
            .map(|t| t.chars().count())
            .sum()
    }
}
