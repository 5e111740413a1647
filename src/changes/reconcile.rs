//! Drops pending edits that the committed translations already contain.

use serde_json::{
    Map,
    Value,
};

use super::ChangeSet;
use crate::tree::{
    self,
    MAX_DEPTH,
};
use crate::types::{
    LocaleTree,
    join_key,
};

/// Returns `changes` without the leaves that equal their committed value.
///
/// Each language's subtree is walked recursively. A leaf survives only when
/// it differs from `tree::get(locales[language], full_path)`, a branch only
/// when at least one child survives, and a language only when its subtree is
/// non-empty. Languages missing from `locales` are compared against an empty
/// tree, so all of their edits survive.
///
/// The result is already reconciled: calling this again on it is a no-op.
///
/// # Examples
/// ```
/// use serde_json::json;
/// use statix::changes::{ChangeSet, reconcile};
///
/// let changes: ChangeSet = serde_json::from_value(json!({ "en": { "a": "1" }, "tr": { "a": "1" } })).unwrap();
/// let locales = json!({ "en": { "a": "1" }, "tr": { "a": "2" } });
///
/// let reconciled = reconcile(&changes, locales.as_object().unwrap());
/// assert_eq!(serde_json::to_value(&reconciled).unwrap(), json!({ "tr": { "a": "1" } }));
/// ```
#[must_use]
pub fn reconcile(changes: &ChangeSet, locales: &LocaleTree) -> ChangeSet {
    let empty = Value::Object(Map::new());
    let mut reconciled = Map::new();

    for (language, subtree) in changes.iter() {
        let Value::Object(branch) = subtree else {
            tracing::debug!(language = %language, "Dropping non-object pending entry");
            continue;
        };
        let committed = locales.get(language).unwrap_or(&empty);
        let cleaned = clean_branch(branch, committed, "", 0);
        if !cleaned.is_empty() {
            reconciled.insert(language.clone(), Value::Object(cleaned));
        }
    }

    ChangeSet::from(reconciled)
}

/// Keeps the children of `branch` (rooted at `prefix`) that still differ from `committed`.
fn clean_branch(
    branch: &Map<String, Value>,
    committed: &Value,
    prefix: &str,
    depth: usize,
) -> Map<String, Value> {
    if depth >= MAX_DEPTH {
        return branch.clone();
    }

    let mut cleaned = Map::new();
    for (key, value) in branch {
        let full_path = join_key(prefix, key);
        match value {
            Value::Object(children) => {
                let nested = clean_branch(children, committed, &full_path, depth + 1);
                if !nested.is_empty() {
                    cleaned.insert(key.clone(), Value::Object(nested));
                }
            }
            leaf => {
                let redundant = tree::get(committed, &full_path)
                    .is_some_and(|original| tree::values_equal(original, leaf));
                if !redundant {
                    cleaned.insert(key.clone(), leaf.clone());
                }
            }
        }
    }
    cleaned
}
