use serde::Serialize;
use spanlens_types::{Message, Span};
use std::fmt;

/// Coarse purpose of a span, used to separate real conversation turns from
/// proxy housekeeping calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SpanCategory {
    Tools,
    Quota,
    HaikuHoldover,
    LitellmSystemOverhead,
    IsNewTopic,
    Incomplete,
    Safety,
    Summarization,
    Main,
}

impl SpanCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            SpanCategory::Tools => "tools",
            SpanCategory::Quota => "quota",
            SpanCategory::HaikuHoldover => "haiku_holdover",
            SpanCategory::LitellmSystemOverhead => "litellm_system_overhead",
            SpanCategory::IsNewTopic => "is_new_topic",
            SpanCategory::Incomplete => "incomplete",
            SpanCategory::Safety => "safety",
            SpanCategory::Summarization => "summarization",
            SpanCategory::Main => "main",
        }
    }
}

impl fmt::Display for SpanCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn messages_text(messages: &[Message]) -> String {
    messages
        .iter()
        .filter_map(Message::text)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Classify a span; the first matching rule wins.
pub fn classify_span(span: &Span) -> SpanCategory {
    let attrs = &span.attributes;
    let input = attrs.input_value.as_deref().unwrap_or_default();
    let output = attrs.output_value.as_deref().unwrap_or_default();
    let kind = span.span_kind.as_deref().unwrap_or_default();
    let name = span.name.as_deref().unwrap_or_default();

    if kind == "TOOL" {
        return SpanCategory::Tools;
    }
    if input.contains("tool_result") || input.contains("tool_use") || output.contains("tool_use")
    {
        return SpanCategory::Tools;
    }

    let input_messages = messages_text(attrs.input_messages());
    let output_messages = messages_text(attrs.output_messages());
    let all_text = format!("{input}{output}{input_messages}{output_messages}").to_lowercase();

    let input_lower = input.to_lowercase();
    let output_lower = output.to_lowercase();
    if input_lower.contains("quota") && input.chars().count() < 50 {
        return SpanCategory::Quota;
    }
    if input_messages.to_lowercase().contains("quota")
        && output_lower.contains("quota")
        && output.chars().count() < 10
    {
        return SpanCategory::Quota;
    }

    if span
        .model_name
        .as_deref()
        .is_some_and(|m| m.to_lowercase().contains("haiku"))
    {
        return SpanCategory::HaikuHoldover;
    }

    if all_text.contains("test") && all_text.contains("litellm") {
        return SpanCategory::LitellmSystemOverhead;
    }

    if all_text.contains("new topic") || all_text.contains("is_new_topic") {
        return SpanCategory::IsNewTopic;
    }

    if kind == "LLM" && name.contains("litellm") && !input.is_empty() && output.trim().is_empty() {
        return SpanCategory::Incomplete;
    }

    if input.contains("policy_spec") && input.contains("Claude Code Code Bash") {
        return SpanCategory::Safety;
    }

    if input.contains("Please write a 5-10 word title") {
        return SpanCategory::Summarization;
    }

    SpanCategory::Main
}
