use serde_json::{Map, Value};

const MARKER: &str = "session_";

/// Extract a session id from span metadata.
///
/// Session ids are smuggled through the user id fields of the LLM proxy:
/// - Phoenix: `metadata.user_id` such as `user_abc_account__session_<uuid>`
/// - Arize: `user_api_key_end_user_id` or `requester_metadata.user_id`
///
/// Metadata sometimes arrives as a stringified dict, in which case the text
/// after the last `session_` marker is taken and trailing quotes/braces dropped.
pub fn extract_session_id(metadata: &Value) -> Option<String> {
    let id = match metadata {
        Value::String(text) => {
            if text.trim_start().starts_with('{')
                && let Ok(parsed @ Value::Object(_)) = serde_json::from_str::<Value>(text)
            {
                return extract_session_id(&parsed);
            }
            after_marker(text).map(|id| id.trim_end_matches(['\'', '"', '}']).to_string())
        }
        Value::Object(map) => {
            let direct = ["user_id", "user_api_key_end_user_id"]
                .into_iter()
                .filter_map(|key| map.get(key))
                .find_map(id_from_user_field);
            direct.or_else(|| {
                map.get("requester_metadata")
                    .and_then(Value::as_object)
                    .and_then(|req| req.get("user_id"))
                    .and_then(id_from_user_field)
            })
        }
        _ => None,
    };
    id.filter(|id| !id.is_empty())
}

/// Session id of a flat trace row, checking `metadata` then `attributes.metadata`.
pub fn session_id_for_record(row: &Map<String, Value>) -> Option<String> {
    if let Some(metadata) = row.get("metadata").filter(|v| !v.is_null()) {
        return extract_session_id(metadata);
    }
    if let Some(metadata) = row.get("attributes.metadata").filter(|v| !v.is_null()) {
        return extract_session_id(metadata);
    }
    row.get("attributes")
        .and_then(Value::as_object)
        .and_then(|attrs| attrs.get("metadata"))
        .and_then(extract_session_id)
}

fn id_from_user_field(value: &Value) -> Option<String> {
    let text = match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        _ => return None,
    };
    after_marker(&text).map(str::to_string)
}

fn after_marker(text: &str) -> Option<&str> {
    text.rfind(MARKER).map(|pos| &text[pos + MARKER.len()..])
}
