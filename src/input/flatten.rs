//! Flattening of committed locale trees into table rows.

use indexmap::IndexSet;
use serde_json::{
    Map,
    Value,
};

use crate::tree::{
    self,
    MAX_DEPTH,
};
use crate::types::{
    FlattenedRow,
    LocaleTree,
    join_key,
    split_key,
};

/// Flatten every language of `locales` into one row per unique key path.
///
/// Rows appear in first-seen order: languages in iteration order, keys in
/// document order within each language. Objects and arrays are descended
/// (array indices become path segments); empty containers yield no rows.
///
/// Each language's value is resolved with [`tree::get`]. Missing values,
/// `null` and `false` become `""`; `true` and numbers are kept as they are.
/// When a key is a branch in one language and a leaf in another, the leaf
/// language is not expanded, so the branch shows up as the value of the
/// leaf-language row.
///
/// # Examples
/// ```
/// use serde_json::json;
/// use statix::input::flatten::flatten_locales;
///
/// let locales = json!({ "en": { "app": { "title": "Hi" } }, "tr": {} });
/// let rows = flatten_locales(locales.as_object().unwrap());
///
/// assert_eq!(rows.len(), 1);
/// assert_eq!(rows[0].path, "app");
/// assert_eq!(rows[0].values["tr"], json!(""));
/// ```
#[must_use]
pub fn flatten_locales(locales: &LocaleTree) -> Vec<FlattenedRow> {
    let mut all_keys = IndexSet::new();
    for tree in locales.values() {
        if tree::is_container(tree) {
            collect_leaf_paths(tree, "", 0, &mut all_keys);
        }
    }

    all_keys
        .into_iter()
        .map(|full_key| {
            let values = locales
                .iter()
                .map(|(language, tree)| (language.clone(), normalize(tree::get(tree, &full_key))))
                .collect::<Map<String, Value>>();
            let (path, key) = split_key(&full_key);
            FlattenedRow { path, key, values }
        })
        .collect()
}

fn collect_leaf_paths(node: &Value, prefix: &str, depth: usize, keys: &mut IndexSet<String>) {
    let mut visit = |segment: &str, child: &Value| {
        let full_key = join_key(prefix, segment);
        if tree::is_container(child) && depth < MAX_DEPTH {
            collect_leaf_paths(child, &full_key, depth + 1, keys);
        } else {
            if tree::is_container(child) {
                tracing::warn!(key = %full_key, "Locale tree exceeds maximum depth, keeping subtree as a leaf");
            }
            keys.insert(full_key);
        }
    };

    match node {
        Value::Object(map) => {
            for (key, child) in map {
                visit(key, child);
            }
        }
        Value::Array(items) => {
            for (index, child) in items.iter().enumerate() {
                visit(&index.to_string(), child);
            }
        }
        _ => {}
    }
}

/// Missing, `null` and `false` all display as an empty cell.
fn normalize(value: Option<&Value>) -> Value {
    match value {
        None | Some(Value::Null | Value::Bool(false)) => Value::String(String::new()),
        Some(value) => value.clone(),
    }
}
