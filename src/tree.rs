//! Dotted-path access over nested translation trees.
//!
//! Translation trees are plain `serde_json::Value`s: objects are branches and
//! every other variant is a leaf. Arrays are walked by numeric segment when
//! reading (`items.0`), but only objects count as mappings when removing.
//!
//! None of these functions panic on malformed input. A path that walks
//! through a leaf is a miss, and a miss never changes the tree.

use serde_json::{
    Map,
    Value,
};

/// Segment separator used by every key path.
pub const SEPARATOR: char = '.';

/// Maximum nesting depth walked by the recursive tree algorithms.
///
/// Subtrees below this depth are kept as opaque leaves.
pub const MAX_DEPTH: usize = 1000;

/// Parses an array index segment (`"0"`, `"12"`, never `"01"` or `"+1"`).
fn parse_index(segment: &str) -> Option<usize> {
    if segment.is_empty()
        || !segment.bytes().all(|b| b.is_ascii_digit())
        || (segment.len() > 1 && segment.starts_with('0'))
    {
        return None;
    }
    segment.parse().ok()
}

/// Returns the child of `node` addressed by `segment`.
fn child<'a>(node: &'a Value, segment: &str) -> Option<&'a Value> {
    match node {
        Value::Object(map) => map.get(segment),
        Value::Array(items) => parse_index(segment).and_then(|index| items.get(index)),
        _ => None,
    }
}

/// Returns `true` for values that can hold children.
#[must_use]
pub const fn is_container(value: &Value) -> bool {
    matches!(value, Value::Object(_) | Value::Array(_))
}

/// Resolves `path` inside `tree`.
///
/// Returns `None` when the path is empty or when any segment cannot be
/// resolved. A JSON `null` stored at the path is returned as `Some(Value::Null)`.
///
/// # Examples
/// ```
/// use serde_json::json;
/// use statix::tree::get;
///
/// let tree = json!({ "app": { "title": "Hi" } });
/// assert_eq!(get(&tree, "app.title"), Some(&json!("Hi")));
/// assert_eq!(get(&tree, "app.title.more"), None);
/// ```
#[must_use]
pub fn get<'a>(tree: &'a Value, path: &str) -> Option<&'a Value> {
    if path.is_empty() {
        return None;
    }
    path.split(SEPARATOR).try_fold(tree, child)
}

/// Like [`get`], falling back to `default` on a miss.
#[must_use]
pub fn get_or<'a>(tree: &'a Value, path: &str, default: &'a Value) -> &'a Value {
    get(tree, path).unwrap_or(default)
}

/// Converts `node` into an object in place and returns its map.
///
/// Arrays keep their elements under index keys; every other leaf is replaced
/// by an empty mapping.
fn ensure_mapping(node: &mut Value) -> Option<&mut Map<String, Value>> {
    if !node.is_object() {
        let map = match std::mem::take(node) {
            Value::Array(items) => {
                items.into_iter().enumerate().map(|(index, item)| (index.to_string(), item)).collect()
            }
            _ => Map::new(),
        };
        *node = Value::Object(map);
    }
    node.as_object_mut()
}

/// Returns a mutable slot for `segment` under `node`, creating it if needed.
fn slot<'a>(node: &'a mut Value, segment: &str) -> Option<&'a mut Value> {
    let index = match &*node {
        Value::Array(items) => parse_index(segment).filter(|index| *index < items.len()),
        _ => None,
    };
    match (node, index) {
        (Value::Array(items), Some(index)) => items.get_mut(index),
        (node, _) => ensure_mapping(node).map(|map| map.entry(segment).or_insert(Value::Null)),
    }
}

/// Writes `value` at `path`, creating intermediate mappings as needed.
///
/// Any intermediate segment holding a missing, `null` or scalar value is
/// replaced by an empty mapping. Does nothing when the path is empty or the
/// root is not a container.
///
/// # Examples
/// ```
/// use serde_json::json;
/// use statix::tree::{get, set};
///
/// let mut tree = json!({ "app": "flat" });
/// set(&mut tree, "app.title", json!("Hi"));
/// assert_eq!(tree, json!({ "app": { "title": "Hi" } }));
/// assert_eq!(get(&tree, "app.title"), Some(&json!("Hi")));
/// ```
pub fn set(tree: &mut Value, path: &str, value: Value) {
    if path.is_empty() || !is_container(tree) {
        return;
    }
    if let Some(target) = path.split(SEPARATOR).try_fold(tree, slot) {
        *target = value;
    }
}

/// Removes the leaf at `segments` and prunes mappings emptied by the removal.
fn remove_at(node: &mut Map<String, Value>, segments: &[&str]) -> bool {
    match segments {
        [] => false,
        [last] => node.shift_remove(*last).is_some(),
        [head, rest @ ..] => {
            let Some(Value::Object(child)) = node.get_mut(*head) else {
                return false;
            };
            let removed = remove_at(child, rest);
            if removed && child.is_empty() {
                node.shift_remove(*head);
            }
            removed
        }
    }
}

/// Removes the value at `path` in place.
///
/// Every mapping left empty by the removal is pruned as well, up to (but not
/// including) the root. Returns `false` and leaves the tree untouched when the
/// path does not resolve through mappings to an existing key.
pub fn remove_in_place(tree: &mut Value, path: &str) -> bool {
    if path.is_empty() {
        return false;
    }
    let Value::Object(root) = tree else {
        return false;
    };
    let segments: Vec<&str> = path.split(SEPARATOR).collect();
    remove_at(root, &segments)
}

/// Returns a copy of `tree` without the value at `path`.
///
/// See [`remove_in_place`] for the pruning rules.
#[must_use]
pub fn remove(tree: &Value, path: &str) -> Value {
    let mut result = tree.clone();
    remove_in_place(&mut result, path);
    result
}

/// Value equality for translation leaves.
///
/// Numbers compare by magnitude so that `1` and `1.0` are the same value.
#[must_use]
#[allow(clippy::float_cmp)]
pub fn values_equal(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Number(a), Value::Number(b)) => {
            a == b || a.as_f64().zip(b.as_f64()).is_some_and(|(a, b)| a == b)
        }
        _ => left == right,
    }
}
