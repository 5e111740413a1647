//! Shared helpers for unit tests.
#![cfg(test)]

use serde_json::Value;

use crate::changes::ChangeSet;
use crate::types::LocaleTree;

/// Builds a [`LocaleTree`] from a `json!` object literal.
///
/// Anything other than an object yields an empty tree.
pub(crate) fn locales(value: Value) -> LocaleTree {
    match value {
        Value::Object(map) => map,
        _ => LocaleTree::new(),
    }
}

/// Builds a [`ChangeSet`] from a `json!` object literal.
pub(crate) fn changes(value: Value) -> ChangeSet {
    ChangeSet::from(locales(value))
}

/// The two-language fixture used by the scenario tests.
pub(crate) fn greeting_locales() -> LocaleTree {
    locales(serde_json::json!({
        "en": { "title": "Hi", "app": { "name": "Statix", "menu": { "open": "Open" } } },
        "tr": { "title": "Selam", "app": { "name": "Statix", "menu": { "open": "Aç" } } }
    }))
}
