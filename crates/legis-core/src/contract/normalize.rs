//! Shared helpers for pulling fields out of loosely-shaped replies.

use serde_json::{Map, Value};

/// A reply after the first pass: either a JSON object or plain text.
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    Object(Map<String, Value>),
    Literal(String),
}

/// Parse a reply, extracting an embedded object when the text around it is
/// not JSON.
pub fn parse_reply(raw: &str) -> Reply {
    let trimmed = raw.trim();
    match serde_json::from_str::<Value>(trimmed) {
        Ok(Value::Object(map)) => return Reply::Object(map),
        Ok(Value::String(text)) => return Reply::Literal(text),
        _ => {}
    }

    let candidates = [fenced_json_block(trimmed), brace_span(trimmed)];
    for block in candidates.into_iter().flatten() {
        if let Ok(Value::Object(map)) = serde_json::from_str::<Value>(block) {
            return Reply::Object(map);
        }
    }
    Reply::Literal(trimmed.to_string())
}

/// Contents of the first fenced ```json block.
pub fn fenced_json_block(text: &str) -> Option<&str> {
    let json_start = text.find("```json")? + 7;
    let end = text[json_start..].find("```")?;
    Some(text[json_start..json_start + end].trim())
}

/// The span from the first `{` to the last `}`.
pub fn brace_span(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end > start {
        Some(&text[start..=end])
    } else {
        None
    }
}

/// First non-blank string among the given keys, trimmed.
pub fn text_field(obj: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|k| obj.get(*k))
        .filter_map(|v| v.as_str())
        .map(str::trim)
        .find(|s| !s.is_empty())
        .map(str::to_string)
}

/// Result of reading a numeric field.
#[derive(Debug, Clone, PartialEq)]
pub enum NumberField {
    Absent,
    Valid(f64),
    Invalid(String),
}

/// Read a number, accepting numeric strings. Non-finite values are invalid.
pub fn number_field(obj: &Map<String, Value>, keys: &[&str]) -> NumberField {
    let Some(value) = keys.iter().find_map(|k| obj.get(*k)) else {
        return NumberField::Absent;
    };
    match as_number(value) {
        Some(n) if n.is_finite() => NumberField::Valid(n),
        _ if value.is_null() => NumberField::Absent,
        _ => NumberField::Invalid(value.to_string()),
    }
}

pub fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().replace(['$', ','], "").parse::<f64>().ok(),
        _ => None,
    }
}

/// Object keys read, in order, when an array item is an object.
const READABLE_KEYS: &[&str] = &[
    "text", "title", "label", "name", "summary", "amendment", "proposal", "target",
];

/// Non-blank strings from an array value. A lone string counts as a
/// one-element list; objects contribute their most readable field, or their
/// JSON text when none is present.
pub fn string_list(value: Option<&Value>) -> Vec<String> {
    let items: Vec<&Value> = match value {
        Some(Value::Array(items)) => items.iter().collect(),
        Some(v @ Value::String(_)) => vec![v],
        _ => Vec::new(),
    };
    items
        .into_iter()
        .filter_map(flatten_text)
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn flatten_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Object(map) => text_field(map, READABLE_KEYS).or_else(|| Some(value.to_string())),
        Value::Array(_) | Value::Null => None,
    }
}

/// Truncate to at most `max` characters, marking the cut with `...`.
pub fn truncate_chars(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let cut: String = text.chars().take(max).collect();
    format!("{}...", cut.trim_end())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_reply_direct_object() {
        match parse_reply(r#" {"speech": "hi"} "#) {
            Reply::Object(map) => assert_eq!(map["speech"], json!("hi")),
            other => panic!("expected object, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_reply_extracts_from_prose() {
        let raw = "Sure! Here you go: {\"speech\": \"hi\", \"n\": {\"x\": 1}} Hope that helps.";
        match parse_reply(raw) {
            Reply::Object(map) => assert_eq!(map["n"]["x"], json!(1)),
            other => panic!("expected object, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_reply_fenced_block() {
        let raw = "```json\n{\"speech\": \"fenced\"}\n```";
        match parse_reply(raw) {
            Reply::Object(map) => assert_eq!(map["speech"], json!("fenced")),
            other => panic!("expected object, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_reply_bad_fence_falls_back_to_braces() {
        let raw = "```json\nnot an object\n``` then {\"speech\": \"braced\"}";
        match parse_reply(raw) {
            Reply::Object(map) => assert_eq!(map["speech"], json!("braced")),
            other => panic!("expected object, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_reply_literal_text() {
        assert_eq!(
            parse_reply("  I will vote against this.  "),
            Reply::Literal("I will vote against this.".to_string())
        );
        assert_eq!(
            parse_reply("\"just a string\""),
            Reply::Literal("just a string".to_string())
        );
        assert_eq!(parse_reply("} backwards {"), Reply::Literal("} backwards {".to_string()));
    }

    #[test]
    fn test_number_field_variants() {
        let obj = json!({"a": 0.4, "b": "0.9", "c": "high", "d": null, "e": "$1,200"});
        let obj = obj.as_object().unwrap();
        assert_eq!(number_field(obj, &["a"]), NumberField::Valid(0.4));
        assert_eq!(number_field(obj, &["b"]), NumberField::Valid(0.9));
        assert!(matches!(number_field(obj, &["c"]), NumberField::Invalid(_)));
        assert_eq!(number_field(obj, &["d"]), NumberField::Absent);
        assert_eq!(number_field(obj, &["zz"]), NumberField::Absent);
        assert_eq!(number_field(obj, &["e"]), NumberField::Valid(1200.0));
    }

    #[test]
    fn test_string_list_drops_blanks() {
        let value = json!(["  one ", "", 2, {"text": "three"}, null]);
        assert_eq!(string_list(Some(&value)), vec!["one", "2", "three"]);
        assert_eq!(string_list(Some(&json!("solo"))), vec!["solo"]);
        assert!(string_list(None).is_empty());
    }

    #[test]
    fn test_string_list_prefers_readable_keys() {
        let value = json!([
            {"category": "econ", "text": "Creates jobs"},
            {"amendment": "Sunset in 2030", "id": "a1"},
            {"category": "cost", "weight": 2},
            {"text": "  ", "title": "Caps fees"}
        ]);
        assert_eq!(
            string_list(Some(&value)),
            vec![
                "Creates jobs",
                "Sunset in 2030",
                r#"{"category":"cost","weight":2}"#,
                "Caps fees"
            ]
        );
    }

    #[test]
    fn test_text_field_skips_blank_candidates() {
        let obj = json!({"a": "  ", "b": " value "});
        let obj = obj.as_object().unwrap();
        assert_eq!(text_field(obj, &["a", "b"]), Some("value".to_string()));
        assert_eq!(text_field(obj, &["a"]), None);
    }

    #[test]
    fn test_truncate_chars() {
        assert_eq!(truncate_chars("short", 10), "short");
        assert_eq!(truncate_chars("abcdefgh", 4), "abcd...");
    }
}
