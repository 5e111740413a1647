//! Single-cell edits against the pending changeset.

use serde_json::Value;

use super::ChangeSet;
use crate::tree;
use crate::types::LocaleTree;

/// Applies one edit and returns the updated changeset.
///
/// When `new_value` equals the committed value at `key_path`, the pending
/// entry is removed instead, along with any ancestors (and the language)
/// left empty. Otherwise the value is staged under `language`, creating
/// intermediate mappings as needed. An empty `key_path` changes nothing.
///
/// # Examples
/// ```
/// use serde_json::json;
/// use statix::changes::{ChangeSet, update_value};
///
/// let committed = json!({ "en": { "title": "Hi" } });
/// let committed = committed.as_object().unwrap();
///
/// let staged = update_value(ChangeSet::new(), "en", "title", json!("Hello"), committed);
/// assert_eq!(staged.get("en", "title"), Some(&json!("Hello")));
///
/// let reverted = update_value(staged, "en", "title", json!("Hi"), committed);
/// assert!(reverted.is_empty());
/// ```
#[must_use]
pub fn update_value(
    mut changes: ChangeSet,
    language: &str,
    key_path: &str,
    new_value: Value,
    committed: &LocaleTree,
) -> ChangeSet {
    if key_path.is_empty() {
        return changes;
    }

    let original = committed.get(language).and_then(|tree| tree::get(tree, key_path));
    if original.is_some_and(|original| tree::values_equal(original, &new_value)) {
        let discarded = changes.discard(language, key_path);
        tracing::debug!(language, key_path, discarded, "Edit matches committed value");
    } else {
        changes.stage(language, key_path, new_value);
    }
    changes
}
