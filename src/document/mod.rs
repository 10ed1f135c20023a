pub mod path;

use serde_json::Value;
use thiserror::Error;

pub use path::{get_by_path, set_by_path, Path, PathError, PathSegment};

/// Strict-JSON parse failure with a 1-based source position.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{message}")]
pub struct ParseError {
    pub line: usize,
    pub column: usize,
    pub message: String,
}

/// Parses raw text into a structural tree. Rejects anything outside the
/// strict JSON grammar (trailing commas, comments, single quotes, ...).
///
/// Object key order is preserved; `serde_json` is built with the
/// `preserve_order` feature so the parsed map iterates in insertion order.
pub fn parse(text: &str) -> Result<Value, ParseError> {
    serde_json::from_str(text).map_err(|err| ParseError {
        line: err.line(),
        column: err.column(),
        message: err.to_string(),
    })
}

/// Serializes a tree to canonical JSON text. Pretty mode uses 2-space
/// indentation and `": "` separators; minified mode has no insignificant
/// whitespace. Output is deterministic for a given tree.
pub fn serialize(value: &Value, pretty: bool) -> String {
    let serialized = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    };
    // Serializing an in-memory Value cannot produce invalid input errors.
    serialized.unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_simple_object() {
        let value = parse(r#"{"key": "value"}"#).unwrap();
        assert_eq!(value, json!({"key": "value"}));
    }

    #[test]
    fn test_parse_preserves_key_order() {
        let value = parse(r#"{"z": 1, "a": 2, "m": 3}"#).unwrap();
        let keys: Vec<&String> = value.as_object().unwrap().keys().collect();
        assert_eq!(keys, vec!["z", "a", "m"]);
    }

    #[test]
    fn test_parse_error_position() {
        let err = parse("{\n  \"a\": }").unwrap_err();
        assert_eq!(err.line, 2);
        assert!(err.column > 0);
        assert!(!err.message.is_empty());
    }

    #[test]
    fn test_parse_rejects_trailing_comma() {
        assert!(parse(r#"{"a": 1,}"#).is_err());
        assert!(parse(r#"[1, 2,]"#).is_err());
    }

    #[test]
    fn test_parse_rejects_single_quotes() {
        assert!(parse("{'a': 1}").is_err());
    }

    #[test]
    fn test_serialize_minified() {
        let value = json!({"a": [1, true, null], "b": "x"});
        assert_eq!(serialize(&value, false), r#"{"a":[1,true,null],"b":"x"}"#);
    }

    #[test]
    fn test_serialize_pretty_two_space_indent() {
        let value = json!({"a": 1});
        assert_eq!(serialize(&value, true), "{\n  \"a\": 1\n}");
    }

    #[test]
    fn test_serialize_deterministic() {
        let value = parse(r#"{"b": 2, "a": [1.5, "s"]}"#).unwrap();
        assert_eq!(serialize(&value, true), serialize(&value, true));
        assert_eq!(serialize(&value, false), serialize(&value, false));
    }

    #[test]
    fn test_minified_round_trip() {
        let text = r#"{"name": "Test User", "age": 30, "tags": ["a", "b"]}"#;
        let first = parse(text).unwrap();
        let second = parse(&serialize(&first, false)).unwrap();
        assert_eq!(first, second);
    }
}
