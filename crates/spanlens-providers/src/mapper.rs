use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use serde_json::{Map, Value};
use spanlens_types::{Message, Session, Span, SpanAttributes, TraceRecord};

use crate::schema::RawSessionRecord;
use crate::session_id::session_id_for_record;

/// Read-only view over one exported span object.
///
/// Exports come in two layouts and both are accepted:
/// - Flattened dataframe columns: `"attributes.llm.input_messages"`, `"context.span_id"`
/// - Nested objects: `{"attributes": {"llm.input_messages": ..}}`, `{"context": {"span_id": ..}}`
struct SpanView<'a> {
    row: &'a Map<String, Value>,
}

impl<'a> SpanView<'a> {
    fn new(row: &'a Map<String, Value>) -> Self {
        Self { row }
    }

    /// Look up a top-level field, also trying the nested form of a dotted key.
    fn field(&self, key: &str) -> Option<&'a Value> {
        if let Some(value) = self.row.get(key).filter(|v| !v.is_null()) {
            return Some(value);
        }
        let (head, rest) = key.split_once('.')?;
        lookup_nested(self.row.get(head)?, rest)
    }

    fn first_field(&self, keys: &[&str]) -> Option<&'a Value> {
        keys.iter().find_map(|key| self.field(key))
    }

    /// Look up an attribute by its OpenInference name (e.g. `llm.input_messages`).
    fn attribute(&self, key: &str) -> Option<&'a Value> {
        self.field(&format!("attributes.{}", key))
    }

    fn string(&self, keys: &[&str]) -> Option<String> {
        self.first_field(keys).and_then(value_to_string)
    }
}

/// Resolve `rest` inside `value`, accepting both `{"a.b": v}` and `{"a": {"b": v}}`.
fn lookup_nested<'a>(value: &'a Value, rest: &str) -> Option<&'a Value> {
    let map = value.as_object()?;
    if let Some(found) = map.get(rest).filter(|v| !v.is_null()) {
        return Some(found);
    }
    let (head, tail) = rest.split_once('.')?;
    lookup_nested(map.get(head)?, tail)
}

fn value_to_string(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// Map one exported span onto the typed model.
///
/// Anything that is not a JSON object becomes an empty span so that it still
/// occupies its position in the session.
pub fn map_span(value: &Value, sequence_index: usize) -> Span {
    match value.as_object() {
        Some(row) => map_span_object(row, sequence_index),
        None => {
            tracing::debug!(sequence_index, "span is not an object, treating it as empty");
            Span::new(fallback_span_id(sequence_index), sequence_index)
        }
    }
}

pub fn map_span_object(row: &Map<String, Value>, sequence_index: usize) -> Span {
    let view = SpanView::new(row);

    let span_id = view
        .string(&["span_id", "context.span_id"])
        .unwrap_or_else(|| fallback_span_id(sequence_index));

    let mut span = Span::new(span_id, sequence_index);
    span.name = view.string(&["name"]);
    span.trace_id = view.string(&["trace_id", "context.trace_id"]);
    span.parent_id = view.string(&["parent_id"]);
    span.span_kind = view
        .string(&["span_kind"])
        .or_else(|| view.attribute("openinference.span.kind").and_then(value_to_string));
    span.model_name = view.attribute("llm.model_name").and_then(value_to_string);
    span.start_time = view.field("start_time").and_then(parse_timestamp);
    span.end_time = view.field("end_time").and_then(parse_timestamp);

    span.attributes = SpanAttributes {
        input_messages: view.attribute("llm.input_messages").and_then(map_messages),
        input_value: view.attribute("input.value").and_then(value_to_string),
        output_messages: view.attribute("llm.output_messages").and_then(map_messages),
        output_value: view.attribute("output.value").and_then(value_to_string),
    };

    span
}

fn fallback_span_id(sequence_index: usize) -> String {
    format!("span-{}", sequence_index + 1)
}

/// Map an LLM message list.
///
/// Output messages are sometimes exported as a string holding the serialized
/// list; a string that does not decode to a list becomes a single role-less message.
pub fn map_messages(value: &Value) -> Option<Vec<Message>> {
    match value {
        Value::Null => None,
        Value::Array(items) => Some(items.iter().map(map_message).collect()),
        Value::String(text) => {
            let trimmed = text.trim();
            if trimmed.is_empty() {
                return None;
            }
            if trimmed.starts_with('[')
                && let Ok(Value::Array(items)) = serde_json::from_str::<Value>(trimmed)
            {
                return Some(items.iter().map(map_message).collect());
            }
            Some(vec![Message {
                role: None,
                content: value.clone(),
            }])
        }
        other => Some(vec![map_message(other)]),
    }
}

fn map_message(value: &Value) -> Message {
    let Some(map) = value.as_object() else {
        return Message {
            role: None,
            content: value.clone(),
        };
    };
    let nested = map.get("message").and_then(Value::as_object);

    let role = map
        .get("message.role")
        .or_else(|| map.get("role"))
        .or_else(|| nested.and_then(|m| m.get("role")))
        .and_then(value_to_string);

    let content = map
        .get("message.content")
        .or_else(|| map.get("content"))
        .or_else(|| nested.and_then(|m| m.get("content")))
        .or_else(|| map.get("message.contents"))
        .or_else(|| nested.and_then(|m| m.get("contents")))
        .cloned()
        .unwrap_or(Value::Null);

    Message { role, content }
}

/// Parse an exported timestamp.
///
/// Arize exports epoch milliseconds; Phoenix and reconstructed session files
/// carry strings (RFC 3339 or `YYYY-MM-DD HH:MM:SS.ffffff`).
pub fn parse_timestamp(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::Number(n) => {
            let millis = n.as_i64().or_else(|| n.as_f64().map(|f| f as i64))?;
            Utc.timestamp_millis_opt(millis).single()
        }
        Value::String(s) => parse_timestamp_str(s.trim()),
        _ => None,
    }
}

fn parse_timestamp_str(s: &str) -> Option<DateTime<Utc>> {
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f%:z") {
        return Some(dt.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
            return Some(naive.and_utc());
        }
    }
    s.parse::<i64>()
        .ok()
        .and_then(|millis| Utc.timestamp_millis_opt(millis).single())
}

/// Map a session-file record; `position` is the 1-based record number among valid records.
pub(crate) fn map_session(record: RawSessionRecord, position: usize) -> Session {
    let spans = record
        .spans
        .iter()
        .enumerate()
        .map(|(index, value)| map_span(value, index))
        .collect();

    let key = record
        .session_id
        .clone()
        .or_else(|| record.session_number.map(|n| n.to_string()))
        .unwrap_or_else(|| position.to_string());

    Session {
        key,
        session_number: record.session_number,
        session_id: record.session_id,
        duration_seconds: record.duration_seconds,
        unique_traces: record.unique_traces,
        spans,
    }
}

/// Map one flat trace-export row; `index` is its position in the file.
pub fn map_trace_row(row: Map<String, Value>, index: usize) -> TraceRecord {
    let span = map_span_object(&row, index);
    let session_id = session_id_for_record(&row);
    TraceRecord {
        span,
        session_id,
        raw: row,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_nested_attributes() {
        let value = json!({
            "span_id": "abc",
            "attributes": {
                "llm.input_messages": [
                    {"message.role": "user", "message.content": "hello"}
                ],
                "input.value": "hello",
                "output.value": "hi there"
            }
        });
        let span = map_span(&value, 0);
        assert_eq!(span.span_id, "abc");
        assert_eq!(span.attributes.input_messages().len(), 1);
        assert_eq!(span.attributes.input_messages()[0].role.as_deref(), Some("user"));
        assert_eq!(span.attributes.input_value.as_deref(), Some("hello"));
        assert_eq!(span.attributes.output_value.as_deref(), Some("hi there"));
    }

    #[test]
    fn test_flattened_columns() {
        let value = json!({
            "name": "litellm-acompletion",
            "context.span_id": "f00d",
            "context.trace_id": "t1",
            "parent_id": null,
            "attributes.openinference.span.kind": "LLM",
            "attributes.llm.model_name": "claude-haiku",
            "attributes.llm.input_messages": [{"message.role": "system", "message.content": "be brief"}],
            "attributes.output.value": "ok",
            "start_time": 1735725600000i64,
            "end_time": 1735725601500i64
        });
        let span = map_span(&value, 3);
        assert_eq!(span.span_id, "f00d");
        assert_eq!(span.sequence_index, 3);
        assert_eq!(span.trace_id.as_deref(), Some("t1"));
        assert_eq!(span.parent_id, None);
        assert_eq!(span.span_kind.as_deref(), Some("LLM"));
        assert_eq!(span.model_name.as_deref(), Some("claude-haiku"));
        assert_eq!(span.duration_seconds(), Some(1.5));
    }

    #[test]
    fn test_deeply_nested_attributes() {
        let value = json!({
            "context": {"span_id": "deep"},
            "attributes": {"llm": {"input_messages": [{"role": "user", "content": "q"}]}}
        });
        let span = map_span(&value, 0);
        assert_eq!(span.span_id, "deep");
        assert_eq!(span.attributes.input_messages()[0].text().as_deref(), Some("q"));
    }

    #[test]
    fn test_output_messages_as_serialized_string() {
        let value = json!({
            "attributes.llm.output_messages":
                r#"[{"message.role": "assistant", "message.content": "answer"}]"#
        });
        let span = map_span(&value, 0);
        let messages = span.attributes.output_messages();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].role.as_deref(), Some("assistant"));
        assert_eq!(messages[0].text().as_deref(), Some("answer"));
    }

    #[test]
    fn test_non_object_span_is_empty() {
        let span = map_span(&json!("garbage"), 4);
        assert_eq!(span.span_id, "span-5");
        assert!(span.attributes.is_empty());
    }

    #[test]
    fn test_non_string_value_is_rendered_as_json() {
        let value = json!({"attributes": {"input.value": {"messages": [1, 2]}}});
        let span = map_span(&value, 0);
        assert_eq!(
            span.attributes.input_value.as_deref(),
            Some(r#"{"messages":[1,2]}"#)
        );
    }

    #[test]
    fn test_parse_timestamp_formats() {
        let expected = Utc.with_ymd_and_hms(2025, 1, 1, 10, 0, 0).unwrap();
        assert_eq!(parse_timestamp(&json!(1735725600000i64)), Some(expected));
        assert_eq!(
            parse_timestamp(&json!("2025-01-01T10:00:00Z")),
            Some(expected)
        );
        assert_eq!(
            parse_timestamp(&json!("2025-01-01 10:00:00.000000")),
            Some(expected)
        );
        assert_eq!(
            parse_timestamp(&json!("2025-01-01 10:00:00+00:00")),
            Some(expected)
        );
        assert_eq!(parse_timestamp(&json!("yesterday")), None);
    }
}
