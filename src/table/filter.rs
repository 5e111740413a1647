//! Display-value overlay and row filtering.

use std::borrow::Cow;

use serde_json::Value;

use crate::changes::ChangeSet;
use crate::types::{
    TableRow,
    UsedKeys,
};

/// Value shown for `full_key` in `language`: the pending edit when one exists,
/// otherwise `original`.
///
/// Any stored edit wins, including `""`, `0` and `null`.
#[must_use]
pub fn display_value<'a>(full_key: &str, language: &str, original: &'a Value, changes: &'a ChangeSet) -> &'a Value {
    changes.get(language, full_key).unwrap_or(original)
}

/// Text of `value` that search matches against.
///
/// Strings match as they are, numbers by their JSON form and `true` as
/// `"true"`. Empty strings, `false`, `null` and containers are not searchable.
fn searchable_text(value: &Value) -> Option<Cow<'_, str>> {
    match value {
        Value::String(text) if !text.is_empty() => Some(Cow::Borrowed(text)),
        Value::Number(number) => Some(Cow::Owned(number.to_string())),
        Value::Bool(true) => Some(Cow::Borrowed("true")),
        _ => None,
    }
}

/// Filters `rows` for display.
///
/// With a non-empty `used_keys`, only rows whose id was marked as used are
/// kept. A search term is trimmed and matched case-insensitively as a
/// substring of the row id or of any language's display value; a blank term
/// keeps every row.
#[must_use]
pub fn filter_table_data<'a, S: AsRef<str>>(
    rows: &'a [TableRow],
    search: &str,
    languages: &[S],
    changes: &ChangeSet,
    used_keys: Option<&UsedKeys>,
) -> Vec<&'a TableRow> {
    let used_keys = used_keys.filter(|used| !used.is_empty());
    let needle = search.trim().to_lowercase();

    rows.iter()
        .filter(|row| used_keys.is_none_or(|used| used.contains(&row.id)))
        .filter(|row| needle.is_empty() || row_matches(row, &needle, languages, changes))
        .collect()
}

fn row_matches<S: AsRef<str>>(row: &TableRow, needle: &str, languages: &[S], changes: &ChangeSet) -> bool {
    if row.id.to_lowercase().contains(needle) {
        return true;
    }
    languages.iter().any(|language| {
        let language = language.as_ref();
        let original = row.values.get(language).unwrap_or(&Value::Null);
        searchable_text(display_value(&row.id, language, original, changes))
            .is_some_and(|text| text.to_lowercase().contains(needle))
    })
}

#[cfg(test)]
mod tests {
    use googletest::prelude::*;
    use rstest::rstest;
    use serde_json::json;

    use super::*;
    use crate::test_utils::changes;

    fn row(id: &str, values: Value) -> TableRow {
        let (path, key) = crate::types::split_key(id);
        TableRow { id: id.to_string(), key, path, values: values.as_object().cloned().unwrap_or_default() }
    }

    fn rows() -> Vec<TableRow> {
        vec![
            row("app.title", json!({ "en": "Application Title", "tr": "Uygulama Başlığı" })),
            row("app.description", json!({ "en": "App description", "tr": "Uygulama açıklaması" })),
            row("user.name", json!({ "en": "User Name", "tr": "Kullanıcı Adı" })),
            row("cart.count", json!({ "en": 3, "tr": "" })),
        ]
    }

    fn ids(rows: &[&TableRow]) -> Vec<String> {
        rows.iter().map(|row| row.id.clone()).collect()
    }

    const LANGUAGES: [&str; 2] = ["en", "tr"];

    #[googletest::test]
    fn test_display_value_prefers_pending_edit() {
        let pending = changes(json!({ "en": { "app": { "title": "Edited", "empty": "" } } }));
        let original = json!("Original");

        expect_that!(display_value("app.title", "en", &original, &pending), eq(&json!("Edited")));
        expect_that!(display_value("app.empty", "en", &original, &pending), eq(&json!("")));
        expect_that!(display_value("app.title", "tr", &original, &pending), eq(&original));
        expect_that!(display_value("app.other", "en", &original, &pending), eq(&original));
    }

    #[rstest]
    #[case::blank("")]
    #[case::whitespace("   ")]
    #[case::matching("title")]
    #[case::not_matching("nothing matches this")]
    fn test_used_keys_restrict_rows(#[case] search: &str) {
        let rows = rows();
        let used: UsedKeys = ["app.title"].into_iter().collect();

        let result = filter_table_data(&rows, search, &LANGUAGES, &ChangeSet::new(), Some(&used));

        if search == "nothing matches this" {
            assert_that!(result, is_empty());
        } else {
            assert_that!(ids(&result), elements_are![eq("app.title")]);
        }
    }

    #[googletest::test]
    fn test_empty_used_keys_do_not_filter() {
        let rows = rows();

        let result = filter_table_data(&rows, "", &LANGUAGES, &ChangeSet::new(), Some(&UsedKeys::new()));

        expect_that!(result.len(), eq(rows.len()));
    }

    #[rstest]
    #[case::plain("app")]
    #[case::padded("  app  ")]
    #[case::upper_case("APP")]
    fn test_search_matches_ids(#[case] search: &str) {
        let rows = rows();

        let result = filter_table_data(&rows, search, &LANGUAGES, &ChangeSet::new(), None);

        assert_that!(ids(&result), elements_are![eq("app.title"), eq("app.description")]);
    }

    #[rstest]
    #[case::english_value("user name", "user.name")]
    #[case::turkish_value("başlığı", "app.title")]
    #[case::number_value("3", "cart.count")]
    fn test_search_matches_values(#[case] search: &str, #[case] expected: &str) {
        let rows = rows();

        let result = filter_table_data(&rows, search, &LANGUAGES, &ChangeSet::new(), None);

        assert_that!(ids(&result), elements_are![eq(expected)]);
    }

    #[googletest::test]
    fn test_search_uses_pending_values() {
        let rows = rows();
        let pending = changes(json!({ "tr": { "user": { "name": "Değiştirilmiş" } } }));

        let result = filter_table_data(&rows, "değiştirilmiş", &LANGUAGES, &pending, None);
        let hidden = filter_table_data(&rows, "kullanıcı adı", &LANGUAGES, &pending, None);

        expect_that!(ids(&result), elements_are![eq("user.name")]);
        expect_that!(hidden, is_empty());
    }

    #[googletest::test]
    fn test_search_ignores_languages_not_listed() {
        let rows = rows();

        let result = filter_table_data(&rows, "uygulama", &["en"], &ChangeSet::new(), None);

        expect_that!(result, is_empty());
    }
}
