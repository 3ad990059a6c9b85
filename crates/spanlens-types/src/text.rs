use serde_json::Value;

/// Keys that carry human-readable text inside structured message content.
///
/// Order matters: parts are emitted in this order for a single object.
const TEXT_KEYS: [&str; 4] = ["text", "thinking", "content", "message.content"];

/// Recursively collect the text fragments of a message content value.
///
/// Exported traces store content in several shapes:
/// - Plain strings
/// - Strings holding a serialized JSON array/object of content blocks
/// - The same, written as a Python literal (`[{'type': 'text', ...}]`)
/// - Already-structured arrays of `{ "type": "text", "text": ... }` blocks
///
/// Each fragment is trimmed; empty fragments are dropped.
pub fn extract_text(value: &Value) -> Vec<String> {
    let mut parts = Vec::new();
    collect(value, &mut parts);
    parts
}

fn collect(value: &Value, parts: &mut Vec<String>) {
    match value {
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.starts_with(['[', '{'])
                && let Some(parsed) = parse_serialized(trimmed)
            {
                collect(&parsed, parts);
                return;
            }
            if !trimmed.is_empty() {
                parts.push(trimmed.to_string());
            }
        }
        Value::Object(map) => {
            for key in TEXT_KEYS {
                if let Some(inner) = map.get(key) {
                    collect(inner, parts);
                }
            }
        }
        Value::Array(items) => {
            for item in items {
                collect(item, parts);
            }
        }
        Value::Null | Value::Bool(_) | Value::Number(_) => {}
    }
}

/// Parse a serialized content string as JSON, falling back to Python literal syntax.
fn parse_serialized(text: &str) -> Option<Value> {
    serde_json::from_str(text).ok().or_else(|| {
        let json = python_literal_to_json(text)?;
        serde_json::from_str(&json).ok()
    })
}

/// Rewrite a Python `repr` of lists/dicts into JSON text.
///
/// Single-quoted strings become double-quoted and `True`/`False`/`None` map to
/// their JSON literals. Returns `None` on an unterminated string.
fn python_literal_to_json(text: &str) -> Option<String> {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\'' | '"' => {
                out.push('"');
                let mut closed = false;
                while let Some(inner) = chars.next() {
                    match inner {
                        '\\' => match chars.next()? {
                            '\'' => out.push('\''),
                            escaped => {
                                out.push('\\');
                                out.push(escaped);
                            }
                        },
                        '"' if c == '\'' => out.push_str("\\\""),
                        quote if quote == c => {
                            closed = true;
                            break;
                        }
                        other => out.push(other),
                    }
                }
                if !closed {
                    return None;
                }
                out.push('"');
            }
            c if c.is_ascii_alphabetic() => {
                let mut word = String::from(c);
                while let Some(&next) = chars.peek() {
                    if !next.is_ascii_alphanumeric() && next != '_' {
                        break;
                    }
                    word.push(next);
                    chars.next();
                }
                out.push_str(match word.as_str() {
                    "True" => "true",
                    "False" => "false",
                    "None" => "null",
                    _ => word.as_str(),
                });
            }
            other => out.push(other),
        }
    }
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_plain_string_is_trimmed() {
        assert_eq!(extract_text(&json!("  hello \n")), vec!["hello"]);
    }

    #[test]
    fn test_whitespace_only_string_yields_nothing() {
        assert!(extract_text(&json!("   \n\t")).is_empty());
    }

    #[test]
    fn test_serialized_content_blocks_are_descended() {
        let value = json!(r#"[{"type": "text", "text": "first"}, {"type": "text", "text": "second"}]"#);
        assert_eq!(extract_text(&value), vec!["first", "second"]);
    }

    #[test]
    fn test_unparseable_bracket_string_is_kept_verbatim() {
        let value = json!("[not json at all");
        assert_eq!(extract_text(&value), vec!["[not json at all"]);
    }

    #[test]
    fn test_python_literal_content_blocks_are_descended() {
        let value = json!("[{'type': 'text', 'text': 'hello there'}]");
        assert_eq!(extract_text(&value), vec!["hello there"]);
    }

    #[test]
    fn test_python_literal_quotes_and_constants() {
        let value = json!(
            r#"[{'type': 'text', 'text': "it's fine", 'cache': None, 'final': True}, {'text': 'say \'hi\' "now"'}]"#
        );
        assert_eq!(extract_text(&value), vec!["it's fine", "say 'hi' \"now\""]);
    }

    #[test]
    fn test_unterminated_python_literal_is_kept_verbatim() {
        let value = json!("[{'text': 'oops}]");
        assert_eq!(extract_text(&value), vec!["[{'text': 'oops}]"]);
    }

    #[test]
    fn test_thinking_and_nested_content() {
        let value = json!([
            {"type": "thinking", "thinking": "let me think"},
            {"type": "tool_result", "content": [{"type": "text", "text": "42"}]},
            {"type": "image", "source": {"data": "..."}}
        ]);
        assert_eq!(extract_text(&value), vec!["let me think", "42"]);
    }

    #[test]
    fn test_scalars_yield_nothing() {
        assert!(extract_text(&json!(12)).is_empty());
        assert!(extract_text(&json!(null)).is_empty());
        assert!(extract_text(&json!(true)).is_empty());
    }
}
