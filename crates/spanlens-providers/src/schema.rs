use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// One line of a reconstructed session file.
///
/// Only `spans` is required; a line without it is treated as malformed.
#[derive(Debug, Deserialize, Clone)]
pub(crate) struct RawSessionRecord {
    #[serde(default)]
    pub session_number: Option<u64>,
    #[serde(default, deserialize_with = "string_or_number")]
    pub session_id: Option<String>,
    #[serde(default)]
    pub duration_seconds: Option<f64>,
    #[serde(default)]
    pub unique_traces: Option<u64>,
    pub spans: Vec<Value>,
}

/// Session ids are usually strings but some exports write them as integers.
fn string_or_number<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) if !s.is_empty() => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}
