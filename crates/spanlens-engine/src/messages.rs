use serde::Serialize;
use spanlens_types::Message;
use std::collections::HashSet;

/// A message that appears in the later span only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MessagePreview {
    pub position: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    pub text: String,
}

/// Message-level overlap between two adjacent spans.
///
/// Counts cover text-bearing input messages only.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MessageComparison {
    pub previous_count: usize,
    pub current_count: usize,
    pub duplicated_count: usize,
    pub new_count: usize,
    pub overlap_percentage: f64,
    pub new_messages: Vec<MessagePreview>,
}

impl MessageComparison {
    pub fn has_duplication(&self) -> bool {
        self.duplicated_count > 0
    }
}

/// Compare the messages of a span with those of the span right before it.
///
/// A current message is duplicated when its exact text occurs among the
/// previous span's messages; otherwise it is new.
pub fn compare_messages(previous: &[Message], current: &[Message]) -> MessageComparison {
    let previous_texts: Vec<String> = previous.iter().filter_map(Message::text).collect();
    let seen: HashSet<&str> = previous_texts.iter().map(String::as_str).collect();

    let mut current_count = 0;
    let mut duplicated_count = 0;
    let mut new_messages = Vec::new();

    for (position, message) in current.iter().enumerate() {
        let Some(text) = message.text() else {
            continue;
        };
        current_count += 1;
        if seen.contains(text.as_str()) {
            duplicated_count += 1;
        } else {
            new_messages.push(MessagePreview {
                position,
                role: message.role.clone(),
                text,
            });
        }
    }

    let new_count = new_messages.len();
    let denominator = duplicated_count + new_count;
    let overlap_percentage = if denominator == 0 {
        0.0
    } else {
        duplicated_count as f64 / denominator as f64 * 100.0
    };

    MessageComparison {
        previous_count: previous_texts.len(),
        current_count,
        duplicated_count,
        new_count,
        overlap_percentage,
        new_messages,
    }
}
