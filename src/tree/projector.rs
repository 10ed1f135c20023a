use super::node::{type_emoji, DisplayKind, DisplayNode};
use crate::document::{serialize, Path, PathSegment};
use serde_json::Value;
use std::collections::HashMap;

/// Occurrence counters for one projection pass. Object leaves are ranked
/// within their `(key, repr)` group, array leaves within their bare `repr`
/// group, so identical textual values get distinct traversal-order ranks.
#[derive(Default)]
struct OccurrenceCounters {
    by_key_value: HashMap<(String, String), usize>,
    by_value: HashMap<String, usize>,
}

impl OccurrenceCounters {
    fn next_for_key(&mut self, key: &str, repr: &str) -> usize {
        let counter = self
            .by_key_value
            .entry((key.to_string(), repr.to_string()))
            .or_insert(0);
        let index = *counter;
        *counter += 1;
        index
    }

    fn next_for_value(&mut self, repr: &str) -> usize {
        let counter = self.by_value.entry(repr.to_string()).or_insert(0);
        let index = *counter;
        *counter += 1;
        index
    }
}

/// Projects a structural tree into a display forest: one node per key/index
/// of the root container, children nested underneath. Objects are visited in
/// insertion order, arrays by ascending index. A scalar root projects an
/// empty forest (there is no row to hang it on).
pub fn project(value: &Value) -> Vec<DisplayNode> {
    let mut counters = OccurrenceCounters::default();
    match value {
        Value::Object(map) => map
            .iter()
            .map(|(key, child)| project_key(child, Path::root(), key, &mut counters))
            .collect(),
        Value::Array(items) => items
            .iter()
            .enumerate()
            .map(|(index, child)| project_index(child, Path::root(), index, &mut counters))
            .collect(),
        _ => Vec::new(),
    }
}

fn project_key(
    value: &Value,
    parent_path: Path,
    key: &str,
    counters: &mut OccurrenceCounters,
) -> DisplayNode {
    let path = parent_path.key(key);
    let label = format!("🔑 {} {}", key, type_emoji(value));
    build_node(value, path, parent_path, label, Some(key), counters)
}

fn project_index(
    value: &Value,
    parent_path: Path,
    index: usize,
    counters: &mut OccurrenceCounters,
) -> DisplayNode {
    let path = parent_path.index(index);
    let label = format!("📌 [{}] {}", index, type_emoji(value));
    build_node(value, path, parent_path, label, None, counters)
}

fn build_node(
    value: &Value,
    path: Path,
    parent_path: Path,
    label: String,
    key_name: Option<&str>,
    counters: &mut OccurrenceCounters,
) -> DisplayNode {
    match value {
        Value::Object(map) => {
            let children = map
                .iter()
                .map(|(key, child)| project_key(child, path.clone(), key, counters))
                .collect();
            container(path, parent_path, label, key_name, children)
        }
        Value::Array(items) => {
            let children = items
                .iter()
                .enumerate()
                .map(|(index, child)| project_index(child, path.clone(), index, counters))
                .collect();
            container(path, parent_path, label, key_name, children)
        }
        _ => {
            let repr = serialize(value, false);
            let occurrence_index = match key_name {
                Some(key) => counters.next_for_key(key, &repr),
                None => counters.next_for_value(&repr),
            };
            DisplayNode {
                path,
                kind: DisplayKind::Leaf,
                label,
                leaf_value_repr: Some(repr),
                key_name: key_name.map(str::to_string),
                parent_path,
                occurrence_index,
                children: Vec::new(),
            }
        }
    }
}

fn container(
    path: Path,
    parent_path: Path,
    label: String,
    key_name: Option<&str>,
    children: Vec<DisplayNode>,
) -> DisplayNode {
    DisplayNode {
        path,
        kind: DisplayKind::Container,
        label,
        leaf_value_repr: None,
        key_name: key_name.map(str::to_string),
        parent_path,
        occurrence_index: 0,
        children,
    }
}

/// Finds the node carrying exactly `path` in a projected forest.
pub fn find_node<'a>(forest: &'a [DisplayNode], path: &Path) -> Option<&'a DisplayNode> {
    for node in forest {
        if &node.path == path {
            return Some(node);
        }
        // Paths share prefixes with their ancestors, so only descend when
        // this node's path is a prefix of the target.
        if path.segments().starts_with(node.path.segments()) {
            if let Some(found) = find_node(&node.children, path) {
                return Some(found);
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::get_by_path;
    use serde_json::json;

    fn leaves(forest: &[DisplayNode]) -> Vec<&DisplayNode> {
        let mut out = Vec::new();
        fn walk<'a>(nodes: &'a [DisplayNode], out: &mut Vec<&'a DisplayNode>) {
            for node in nodes {
                if node.is_leaf() {
                    out.push(node);
                }
                walk(&node.children, out);
            }
        }
        walk(forest, &mut out);
        out
    }

    #[test]
    fn test_project_object_forest() {
        let value = json!({"name": "jo", "tags": ["a"]});
        let forest = project(&value);
        assert_eq!(forest.len(), 2);
        assert_eq!(forest[0].label, "🔑 name 📝");
        assert_eq!(forest[0].leaf_value_repr.as_deref(), Some("\"jo\""));
        assert_eq!(forest[1].label, "🔑 tags 📋");
        assert!(forest[1].is_container());
        assert_eq!(forest[1].children[0].label, "📌 [0] 📝");
    }

    #[test]
    fn test_project_scalar_root_is_empty() {
        assert!(project(&json!(42)).is_empty());
        assert!(project(&json!("text")).is_empty());
    }

    #[test]
    fn test_every_projected_path_resolves() {
        let value = json!({
            "a": {"b": [1, {"c": null}]},
            "d": [true, false]
        });
        let forest = project(&value);
        fn check(nodes: &[DisplayNode], value: &serde_json::Value) {
            for node in nodes {
                assert!(get_by_path(value, &node.path).is_ok(), "path {}", node.path);
                assert_eq!(node.parent_path, node.path.parent());
                check(&node.children, value);
            }
        }
        check(&forest, &value);
    }

    #[test]
    fn test_same_value_under_distinct_keys_each_start_at_zero() {
        let forest = project(&json!({"a": 1, "b": 1}));
        let leaves = leaves(&forest);
        assert_eq!(leaves.len(), 2);
        assert_eq!(leaves[0].leaf_value_repr.as_deref(), Some("1"));
        assert_eq!(leaves[0].occurrence_index, 0);
        assert_eq!(leaves[1].occurrence_index, 0);
    }

    #[test]
    fn test_array_duplicates_rank_in_order() {
        let forest = project(&json!([1, 1, 1]));
        let leaves = leaves(&forest);
        let indices: Vec<usize> = leaves.iter().map(|n| n.occurrence_index).collect();
        assert_eq!(indices, vec![0, 1, 2]);
    }

    #[test]
    fn test_occurrence_indices_are_dense_per_group() {
        let value = json!({
            "a": "x",
            "nested": {"a": "x", "b": "x"},
            "list": ["x", "x", "y"]
        });
        let forest = project(&value);
        let mut by_group: HashMap<(Option<String>, String), Vec<usize>> = HashMap::new();
        for leaf in leaves(&forest) {
            by_group
                .entry((
                    leaf.key_name.clone(),
                    leaf.leaf_value_repr.clone().unwrap_or_default(),
                ))
                .or_default()
                .push(leaf.occurrence_index);
        }
        for (group, indices) in by_group {
            let expected: Vec<usize> = (0..indices.len()).collect();
            assert_eq!(indices, expected, "group {:?}", group);
        }
    }

    #[test]
    fn test_find_node() {
        let forest = project(&json!({"a": {"b": [10, 20]}}));
        let path = Path::root().key("a").key("b").index(1);
        let node = find_node(&forest, &path).unwrap();
        assert_eq!(node.leaf_value_repr.as_deref(), Some("20"));
        assert!(find_node(&forest, &Path::root().key("missing")).is_none());
    }
}
