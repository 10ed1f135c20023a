use serde_json::Value;
use std::fmt;
use thiserror::Error;

/// One step into a JSON tree: an object key or an array index.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    Key(String),
    Index(usize),
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSegment::Key(k) => write!(f, ".{}", k),
            PathSegment::Index(i) => write!(f, "[{}]", i),
        }
    }
}

/// Ordered sequence of segments identifying a unique node in a JSON tree.
///
/// Every path emitted by the tree projector resolves via [`get_by_path`]
/// against the same tree snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Path(Vec<PathSegment>);

impl Path {
    pub fn root() -> Self {
        Self(Vec::new())
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns this path extended by one segment.
    pub fn child(&self, segment: PathSegment) -> Self {
        let mut segments = self.0.clone();
        segments.push(segment);
        Self(segments)
    }

    pub fn key(&self, key: &str) -> Self {
        self.child(PathSegment::Key(key.to_string()))
    }

    pub fn index(&self, index: usize) -> Self {
        self.child(PathSegment::Index(index))
    }

    /// The path of the containing node; the root's parent is the root itself.
    pub fn parent(&self) -> Self {
        let mut segments = self.0.clone();
        segments.pop();
        Self(segments)
    }

    pub fn last(&self) -> Option<&PathSegment> {
        self.0.last()
    }
}

impl From<Vec<PathSegment>> for Path {
    fn from(segments: Vec<PathSegment>) -> Self {
        Self(segments)
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "$")?;
        for segment in &self.0 {
            write!(f, "{}", segment)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PathError {
    #[error("key `{0}` not found")]
    NotFound(String),
    #[error("index {index} out of range (length {len})")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("expected a container, found a scalar")]
    TypeMismatch,
    #[error("empty path: replacing the root is not supported")]
    EmptyPath,
}

/// Resolves `path` inside `value`, one segment at a time.
pub fn get_by_path<'a>(value: &'a Value, path: &Path) -> Result<&'a Value, PathError> {
    let mut current = value;
    for segment in path.segments() {
        current = step(current, segment)?;
    }
    Ok(current)
}

/// Replaces the node at `path` with `new_value`. The path must address an
/// existing node; setting the root is not supported.
pub fn set_by_path(value: &mut Value, path: &Path, new_value: Value) -> Result<(), PathError> {
    let last = path.last().ok_or(PathError::EmptyPath)?;

    let mut current = value;
    for segment in &path.segments()[..path.len() - 1] {
        current = step_mut(current, segment)?;
    }

    let slot = step_mut(current, last)?;
    *slot = new_value;
    Ok(())
}

fn step<'a>(value: &'a Value, segment: &PathSegment) -> Result<&'a Value, PathError> {
    match (value, segment) {
        (Value::Object(map), PathSegment::Key(key)) => map
            .get(key)
            .ok_or_else(|| PathError::NotFound(key.clone())),
        (Value::Array(items), PathSegment::Index(index)) => {
            let len = items.len();
            items
                .get(*index)
                .ok_or(PathError::IndexOutOfRange { index: *index, len })
        }
        (Value::Object(_), PathSegment::Index(_)) | (Value::Array(_), PathSegment::Key(_)) => {
            Err(PathError::TypeMismatch)
        }
        _ => Err(PathError::TypeMismatch),
    }
}

fn step_mut<'a>(value: &'a mut Value, segment: &PathSegment) -> Result<&'a mut Value, PathError> {
    match (value, segment) {
        (Value::Object(map), PathSegment::Key(key)) => map
            .get_mut(key)
            .ok_or_else(|| PathError::NotFound(key.clone())),
        (Value::Array(items), PathSegment::Index(index)) => {
            let len = items.len();
            items
                .get_mut(*index)
                .ok_or(PathError::IndexOutOfRange { index: *index, len })
        }
        (Value::Object(_), PathSegment::Index(_)) | (Value::Array(_), PathSegment::Key(_)) => {
            Err(PathError::TypeMismatch)
        }
        _ => Err(PathError::TypeMismatch),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_get_by_path_nested() {
        let value = json!({"a": {"b": [1, 2, 3]}});
        let path = Path::root().key("a").key("b").index(1);
        assert_eq!(get_by_path(&value, &path), Ok(&json!(2)));
    }

    #[test]
    fn test_get_by_path_root() {
        let value = json!([true]);
        assert_eq!(get_by_path(&value, &Path::root()), Ok(&value));
    }

    #[test]
    fn test_get_by_path_missing_key() {
        let value = json!({"a": 1});
        let path = Path::root().key("b");
        assert_eq!(
            get_by_path(&value, &path),
            Err(PathError::NotFound("b".to_string()))
        );
    }

    #[test]
    fn test_get_by_path_index_out_of_range() {
        let value = json!([1, 2]);
        let path = Path::root().index(5);
        assert_eq!(
            get_by_path(&value, &path),
            Err(PathError::IndexOutOfRange { index: 5, len: 2 })
        );
    }

    #[test]
    fn test_get_by_path_type_mismatch() {
        let value = json!({"a": 1});
        let path = Path::root().key("a").key("b");
        assert_eq!(get_by_path(&value, &path), Err(PathError::TypeMismatch));
    }

    #[test]
    fn test_set_by_path_replaces_leaf() {
        let mut value = json!({"a": {"b": 1}});
        let path = Path::root().key("a").key("b");
        set_by_path(&mut value, &path, json!("changed")).unwrap();
        assert_eq!(value, json!({"a": {"b": "changed"}}));
    }

    #[test]
    fn test_set_by_path_array_element() {
        let mut value = json!([1, 2, 3]);
        set_by_path(&mut value, &Path::root().index(2), json!(null)).unwrap();
        assert_eq!(value, json!([1, 2, null]));
    }

    #[test]
    fn test_set_by_path_rejects_root() {
        let mut value = json!({"a": 1});
        assert_eq!(
            set_by_path(&mut value, &Path::root(), json!(2)),
            Err(PathError::EmptyPath)
        );
    }

    #[test]
    fn test_path_display() {
        let path = Path::root().key("users").index(0).key("name");
        assert_eq!(path.to_string(), "$.users[0].name");
    }

    #[test]
    fn test_path_parent() {
        let path = Path::root().key("a").index(3);
        assert_eq!(path.parent(), Path::root().key("a"));
        assert_eq!(Path::root().parent(), Path::root());
    }
}
