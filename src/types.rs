//! Core types used throughout the project.

use std::collections::HashSet;

use serde::{
    Deserialize,
    Serialize,
};
use serde_json::{
    Map,
    Value,
};

use crate::tree::SEPARATOR;

/// Committed translations: language code → nested translation tree.
///
/// Iteration order is the order languages were loaded in.
pub type LocaleTree = Map<String, Value>;

/// One translation key flattened out of every language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlattenedRow {
    /// Dot-joined ancestor keys, empty for top-level keys.
    pub path: String,
    /// Leaf key name.
    pub key: String,
    /// Resolved leaf value per language.
    pub values: Map<String, Value>,
}

impl FlattenedRow {
    /// Full dotted key path of this row.
    #[must_use]
    pub fn full_key(&self) -> String {
        join_key(&self.path, &self.key)
    }
}

/// A row as presented by the table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableRow {
    /// Full dotted key path, e.g. `"app.title"`.
    pub id: String,
    /// Last segment of the key path, e.g. `"title"`.
    pub key: String,
    /// Remaining segments, e.g. `"app"`.
    pub path: String,
    pub values: Map<String, Value>,
}

/// Joins a path prefix and a leaf key into a full key path.
#[must_use]
pub fn join_key(path: &str, key: &str) -> String {
    if path.is_empty() { key.to_string() } else { format!("{path}{SEPARATOR}{key}") }
}

/// Splits a full key path into `(path, key)` at the last separator.
#[must_use]
pub fn split_key(full_key: &str) -> (String, String) {
    full_key.rsplit_once(SEPARATOR).map_or_else(
        || (String::new(), full_key.to_string()),
        |(path, key)| (path.to_string(), key.to_string()),
    )
}

/// Keys rendered by the host UI during this session.
///
/// Only grows: keys are never removed once marked.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UsedKeys {
    keys: HashSet<String>,
}

impl UsedKeys {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `key`. Returns `true` the first time a key is seen.
    pub fn mark(&mut self, key: impl Into<String>) -> bool {
        self.keys.insert(key.into())
    }

    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.keys.contains(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for UsedKeys {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self { keys: iter.into_iter().map(Into::into).collect() }
    }
}
