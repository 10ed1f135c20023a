use crate::document::Path;
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayKind {
    Container,
    Leaf,
}

/// One tree-view row. Leaves carry the canonical single-line JSON text of
/// their value; that exact string is what the occurrence resolver later
/// searches for in the raw document.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayNode {
    pub path: Path,
    pub kind: DisplayKind,
    /// Glyph + key/index + type emoji, e.g. `🔑 name 📝` or `📌 [2] 🔢`.
    pub label: String,
    /// Canonical minified JSON text of the value; leaves only.
    pub leaf_value_repr: Option<String>,
    /// The object key this node is stored under; `None` under an array.
    pub key_name: Option<String>,
    pub parent_path: Path,
    /// 0-based rank among leaves sharing the same (key, repr) identity,
    /// in traversal order. 0 for containers.
    pub occurrence_index: usize,
    pub children: Vec<DisplayNode>,
}

impl DisplayNode {
    pub fn is_leaf(&self) -> bool {
        self.kind == DisplayKind::Leaf
    }

    pub fn is_container(&self) -> bool {
        self.kind == DisplayKind::Container
    }

    /// Breadth-first search for the nearest leaf descendant, used when a
    /// container row is activated and a textual anchor is still wanted.
    pub fn first_leaf(&self) -> Option<&DisplayNode> {
        let mut queue: Vec<&DisplayNode> = vec![self];
        let mut next: Vec<&DisplayNode> = Vec::new();
        while !queue.is_empty() {
            for node in queue.drain(..) {
                if node.is_leaf() {
                    return Some(node);
                }
                next.extend(node.children.iter());
            }
            std::mem::swap(&mut queue, &mut next);
        }
        None
    }
}

/// Type emoji used in row labels, matching the value's structural kind.
pub fn type_emoji(value: &Value) -> &'static str {
    match value {
        Value::Object(_) => "📑",
        Value::Array(_) => "📋",
        Value::Bool(true) => "✓",
        Value::Bool(false) => "❌",
        Value::Number(_) => "🔢",
        Value::String(_) => "📝",
        Value::Null => "❓",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_type_emoji() {
        assert_eq!(type_emoji(&json!({})), "📑");
        assert_eq!(type_emoji(&json!([])), "📋");
        assert_eq!(type_emoji(&json!(true)), "✓");
        assert_eq!(type_emoji(&json!(false)), "❌");
        assert_eq!(type_emoji(&json!(1.5)), "🔢");
        assert_eq!(type_emoji(&json!("s")), "📝");
        assert_eq!(type_emoji(&json!(null)), "❓");
    }

    #[test]
    fn test_first_leaf_prefers_shallow_descendants() {
        let tree = crate::tree::project(&json!({"outer": {"inner": {"deep": 1}}, "top": 2}));
        // The forest root list: first node is the "outer" container.
        let outer = &tree[0];
        let leaf = outer.first_leaf().unwrap();
        assert_eq!(leaf.leaf_value_repr.as_deref(), Some("1"));
    }
}
