use serde::Serialize;
use spanlens_types::Span;

use crate::chunk::ContentChunk;

/// Size of one span's content, for the per-span listing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpanOverview {
    pub sequence_index: usize,
    pub span_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_seconds: Option<f64>,
    pub input_message_count: usize,
    pub input_value_chars: usize,
    pub output_chars: usize,
    pub chunk_count: usize,
}

impl SpanOverview {
    pub fn new(span: &Span, chunks: &[ContentChunk]) -> Self {
        Self {
            sequence_index: span.sequence_index,
            span_id: span.span_id.clone(),
            name: span.name.clone(),
            duration_seconds: span.duration_seconds(),
            input_message_count: span.attributes.input_messages().len(),
            input_value_chars: span
                .attributes
                .input_value
                .as_deref()
                .map_or(0, |v| v.chars().count()),
            output_chars: span.output_chars(),
            chunk_count: chunks.len(),
        }
    }
}

/// Session-wide accumulation statistics.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionSummary {
    pub total_input_messages: usize,
    pub total_input_chars: usize,
    pub average_messages_per_span: f64,
    /// Last span's input messages over the first span's (first must be non-empty)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message_growth: Option<MessageGrowth>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MessageGrowth {
    pub first: usize,
    pub last: usize,
    pub factor: f64,
}

pub fn summarize(spans: &[SpanOverview]) -> SessionSummary {
    let total_input_messages: usize = spans.iter().map(|s| s.input_message_count).sum();
    let total_input_chars = spans.iter().map(|s| s.input_value_chars).sum();
    let average_messages_per_span = if spans.is_empty() {
        0.0
    } else {
        total_input_messages as f64 / spans.len() as f64
    };

    let message_growth = match (spans.first(), spans.last()) {
        (Some(first), Some(last)) if spans.len() > 1 && first.input_message_count > 0 => {
            Some(MessageGrowth {
                first: first.input_message_count,
                last: last.input_message_count,
                factor: last.input_message_count as f64 / first.input_message_count as f64,
            })
        }
        _ => None,
    };

    SessionSummary {
        total_input_messages,
        total_input_chars,
        average_messages_per_span,
        message_growth,
    }
}
