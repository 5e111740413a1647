//! Pending (uncommitted) translation edits.
//!
//! A [`ChangeSet`] mirrors the shape of a [`LocaleTree`](crate::types::LocaleTree)
//! but only holds leaves whose value differs from the committed translations.
//! [`mutate::update_value`] keeps that invariant for single edits and
//! [`reconcile::reconcile`] restores it after the committed trees change.

pub mod mutate;
pub mod reconcile;

use serde::{
    Deserialize,
    Serialize,
};
use serde_json::{
    Map,
    Value,
};

pub use mutate::update_value;
pub use reconcile::reconcile;

use crate::tree;

/// Uncommitted edits: language code → nested mapping of changed leaves.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChangeSet(Map<String, Value>);

impl ChangeSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a persisted changeset.
    ///
    /// # Errors
    /// Returns an error if `json` is not a JSON object.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Serializes the changeset for persistence.
    ///
    /// # Errors
    /// Propagates serializer failures.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Languages with at least one pending entry, in insertion order.
    pub fn languages(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Pending subtree for `language`.
    #[must_use]
    pub fn language(&self, language: &str) -> Option<&Value> {
        self.0.get(language)
    }

    /// Pending value for `key_path` in `language`.
    ///
    /// Any stored value counts as pending, including `""`, `0` and `null`.
    #[must_use]
    pub fn get(&self, language: &str, key_path: &str) -> Option<&Value> {
        self.0.get(language).and_then(|tree| tree::get(tree, key_path))
    }

    /// Stages `value` at `key_path`, creating the language entry when needed.
    pub(crate) fn stage(&mut self, language: &str, key_path: &str, value: Value) {
        if key_path.is_empty() {
            return;
        }
        let entry = self.0.entry(language).or_insert_with(|| Value::Object(Map::new()));
        if !entry.is_object() {
            *entry = Value::Object(Map::new());
        }
        tree::set(entry, key_path, value);
    }

    /// Drops the entry at `key_path`, then the language if nothing is left.
    ///
    /// Returns `false` when there was nothing to drop.
    pub(crate) fn discard(&mut self, language: &str, key_path: &str) -> bool {
        let Some(entry) = self.0.get_mut(language) else {
            return false;
        };
        let removed = tree::remove_in_place(entry, key_path);
        if removed && entry.as_object().is_some_and(Map::is_empty) {
            self.0.shift_remove(language);
        }
        removed
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    #[must_use]
    pub const fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    #[must_use]
    pub fn into_map(self) -> Map<String, Value> {
        self.0
    }
}

impl From<Map<String, Value>> for ChangeSet {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use googletest::prelude::*;
    use rstest::rstest;
    use serde_json::json;

    use super::*;
    use crate::test_utils::changes;

    #[rstest]
    #[case::object(r#"{"en":{"title":"Hello"}}"#, true)]
    #[case::empty_object("{}", true)]
    #[case::array("[]", false)]
    #[case::scalar("42", false)]
    #[case::truncated(r#"{"en":"#, false)]
    #[case::garbage("not json", false)]
    fn from_json_only_accepts_objects(#[case] json: &str, #[case] accepted: bool) {
        assert_that!(ChangeSet::from_json(json).is_ok(), eq(accepted));
    }

    #[googletest::test]
    fn json_round_trip_keeps_shape_and_order() {
        let original = changes(json!({ "tr": { "b": "2", "a": "1" }, "en": { "x": "y" } }));

        let restored = ChangeSet::from_json(&original.to_json().unwrap()).unwrap();

        expect_that!(restored, eq(&original));
        let languages: Vec<String> = restored.languages().map(str::to_string).collect();
        expect_that!(languages, elements_are![eq("tr"), eq("en")]);
    }

    #[googletest::test]
    fn get_returns_defined_falsy_values() {
        let set = changes(json!({ "en": { "empty": "", "zero": 0, "none": null } }));

        expect_that!(set.get("en", "empty"), some(eq(&json!(""))));
        expect_that!(set.get("en", "zero"), some(eq(&json!(0))));
        expect_that!(set.get("en", "none"), some(eq(&Value::Null)));
        expect_that!(set.get("en", "missing"), none());
        expect_that!(set.get("tr", "empty"), none());
    }

    #[googletest::test]
    fn stage_replaces_non_object_language_entry() {
        let mut set = changes(json!({ "en": "corrupt" }));

        set.stage("en", "title", json!("Hello"));

        expect_that!(set, eq(&changes(json!({ "en": { "title": "Hello" } }))));
    }

    #[googletest::test]
    fn stage_ignores_empty_key_path() {
        let mut set = ChangeSet::new();

        set.stage("en", "", json!("Hello"));

        expect_that!(set.is_empty(), eq(true));
    }

    #[googletest::test]
    fn discard_drops_language_once_empty() {
        let mut set = changes(json!({ "en": { "app": { "title": "Hello" } }, "tr": { "a": "b" } }));

        expect_that!(set.discard("en", "app.title"), eq(true));
        expect_that!(set, eq(&changes(json!({ "tr": { "a": "b" } }))));
        expect_that!(set.discard("en", "app.title"), eq(false));
    }
}
