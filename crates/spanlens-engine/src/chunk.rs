use serde::Serialize;
use spanlens_types::{Message, Span};
use std::fmt;

/// Which span field a chunk was extracted from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChunkKind {
    InputMsg,
    InputValue,
    OutputMsg,
    OutputValue,
}

impl ChunkKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChunkKind::InputMsg => "input_msg",
            ChunkKind::InputValue => "input_value",
            ChunkKind::OutputMsg => "output_msg",
            ChunkKind::OutputValue => "output_value",
        }
    }
}

impl fmt::Display for ChunkKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An immutable piece of span content, tagged with where it came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContentChunk {
    pub kind: ChunkKind,
    /// Index within the message list (message kinds only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<usize>,
    pub text: String,
}

impl ContentChunk {
    /// Human-readable location, e.g. `input_msg[2]` or `output_value`.
    pub fn label(&self) -> String {
        match self.position {
            Some(position) => format!("{}[{}]", self.kind, position),
            None => self.kind.to_string(),
        }
    }

    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }
}

/// Extract the content chunks of a span.
///
/// Order is fixed: input messages, input value, output messages, output value.
/// Message positions count every message, including skipped non-text ones.
pub fn extract_chunks(span: &Span) -> Vec<ContentChunk> {
    let attrs = &span.attributes;
    let mut chunks = Vec::new();

    push_messages(&mut chunks, ChunkKind::InputMsg, attrs.input_messages());
    push_value(&mut chunks, ChunkKind::InputValue, attrs.input_value.as_deref());
    push_messages(&mut chunks, ChunkKind::OutputMsg, attrs.output_messages());
    push_value(&mut chunks, ChunkKind::OutputValue, attrs.output_value.as_deref());

    chunks
}

fn push_messages(chunks: &mut Vec<ContentChunk>, kind: ChunkKind, messages: &[Message]) {
    for (position, message) in messages.iter().enumerate() {
        let Some(text) = message.text() else {
            continue;
        };
        let text = text.trim();
        if text.is_empty() {
            continue;
        }
        chunks.push(ContentChunk {
            kind,
            position: Some(position),
            text: text.to_string(),
        });
    }
}

fn push_value(chunks: &mut Vec<ContentChunk>, kind: ChunkKind, value: Option<&str>) {
    let Some(text) = value.map(str::trim).filter(|t| !t.is_empty()) else {
        return;
    };
    chunks.push(ContentChunk {
        kind,
        position: None,
        text: text.to_string(),
    });
}
