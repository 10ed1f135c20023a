pub mod reconcile;

use crate::document::serialize;
use serde_json::Value;
use thiserror::Error;

pub use reconcile::{apply_edit, EditError};

/// A selectable span of the raw document, in character offsets
/// (`end` exclusive).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextRange {
    pub start: usize,
    pub end: usize,
}

impl TextRange {
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LocateError {
    #[error("occurrence {occurrence} of `{target}` not found in text")]
    NotFound { target: String, occurrence: usize },
}

/// The exact literal searched for in the raw text: the serializer-spaced
/// `"key": value` pair for object leaves, the bare value for array elements.
pub fn search_target(leaf_value_repr: &str, key_name: Option<&str>) -> String {
    match key_name {
        Some(key) => {
            let key_literal = serialize(&Value::String(key.to_string()), false);
            format!("{}: {}", key_literal, leaf_value_repr)
        }
        None => leaf_value_repr.to_string(),
    }
}

/// Maps a projected leaf back to its textual range: scans forward from the
/// start of the document, skipping `occurrence_index` earlier matches of the
/// search target.
///
/// This is a best-effort textual heuristic, not a source map. If the raw
/// text's formatting has diverged from the serializer's output (extra
/// whitespace, `1.0` vs `1`, ...) the lookup fails rather than guessing.
pub fn locate(
    raw_text: &str,
    leaf_value_repr: &str,
    key_name: Option<&str>,
    occurrence_index: usize,
) -> Result<TextRange, LocateError> {
    let target = search_target(leaf_value_repr, key_name);
    if target.is_empty() {
        return Err(LocateError::NotFound {
            target,
            occurrence: occurrence_index,
        });
    }

    let mut from = 0usize;
    let mut hit = 0usize;
    for _ in 0..=occurrence_index {
        let rel = raw_text[from..]
            .find(&target)
            .ok_or_else(|| LocateError::NotFound {
                target: target.clone(),
                occurrence: occurrence_index,
            })?;
        hit = from + rel;
        from = hit + target.len();
    }

    // Byte offset of the match to char offsets for the text surface.
    let start = raw_text[..hit].chars().count();
    Ok(TextRange {
        start,
        end: start + target.chars().count(),
    })
}
