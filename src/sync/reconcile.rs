use crate::document::{self, ParseError, Path, PathError};
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EditError {
    #[error("document is not valid JSON: {0}")]
    DocumentInvalid(#[from] ParseError),
    #[error("edit path no longer resolves: {0}")]
    PathNotFound(#[from] PathError),
}

/// Writes a tree-originated edit back into the document: parses the current
/// text, replaces the node at `path`, and re-serializes the whole document
/// pretty-printed. The caller swaps in the returned text and re-validates;
/// no partial patching happens here.
///
/// `new_literal_text` is first tried as a JSON literal; anything that does
/// not parse is stored as a plain string value, so typing `hello` into a
/// leaf is never rejected.
pub fn apply_edit(
    current_text: &str,
    path: &Path,
    new_literal_text: &str,
) -> Result<String, EditError> {
    let mut tree = document::parse(current_text)?;

    let new_value: Value = serde_json::from_str(new_literal_text)
        .unwrap_or_else(|_| Value::String(new_literal_text.to_string()));

    document::set_by_path(&mut tree, path, new_value)?;
    Ok(document::serialize(&tree, true))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::parse;
    use serde_json::json;

    #[test]
    fn test_apply_edit_literal() {
        let text = r#"{"a": 1, "b": 2}"#;
        let out = apply_edit(text, &Path::root().key("a"), "42").unwrap();
        assert_eq!(parse(&out).unwrap(), json!({"a": 42, "b": 2}));
        // Output is the pretty form.
        assert!(out.contains("\n  \"a\": 42"));
    }

    #[test]
    fn test_apply_edit_falls_back_to_raw_string() {
        let text = r#"{"greeting": "hi"}"#;
        let out = apply_edit(text, &Path::root().key("greeting"), "hello world").unwrap();
        assert_eq!(parse(&out).unwrap(), json!({"greeting": "hello world"}));
    }

    #[test]
    fn test_apply_edit_quoted_string_stays_json() {
        let text = r#"{"greeting": "hi"}"#;
        let out = apply_edit(text, &Path::root().key("greeting"), r#""bye""#).unwrap();
        assert_eq!(parse(&out).unwrap(), json!({"greeting": "bye"}));
    }

    #[test]
    fn test_apply_edit_invalid_document() {
        let err = apply_edit("{\"a\": }", &Path::root().key("a"), "1").unwrap_err();
        assert!(matches!(err, EditError::DocumentInvalid(_)));
    }

    #[test]
    fn test_apply_edit_stale_path() {
        let err = apply_edit(r#"{"a": 1}"#, &Path::root().key("gone"), "1").unwrap_err();
        assert!(matches!(err, EditError::PathNotFound(_)));
    }

    #[test]
    fn test_apply_edit_noop_is_idempotent() {
        let text = "{\n  \"a\": [1, true, \"s\"]\n}";
        let before = parse(text).unwrap();
        let out = apply_edit(text, &Path::root().key("a").index(2), r#""s""#).unwrap();
        assert_eq!(parse(&out).unwrap(), before);
    }
}
