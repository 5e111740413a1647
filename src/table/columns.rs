//! Column derivation for the translation table.

use serde::{
    Deserialize,
    Serialize,
};

/// Id of the fixed first column.
pub const KEY_COLUMN_ID: &str = "key";
const KEY_COLUMN_HEADER: &str = "Key/Path";
const KEY_COLUMN_WIDTH: u32 = 250;
const LANGUAGE_COLUMN_WIDTH: u32 = 200;

/// A table column descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Column {
    pub id: String,
    pub header: String,
    /// Field of a row the column reads: `"key"` or a language code.
    pub accessor: String,
    /// Initial width in pixels.
    pub width: u32,
}

impl Column {
    #[must_use]
    pub fn is_key_column(&self) -> bool {
        self.id == KEY_COLUMN_ID
    }
}

/// The key column followed by one column per language, in the given order.
#[must_use]
pub fn create_locale_columns<S: AsRef<str>>(languages: &[S]) -> Vec<Column> {
    let key = Column {
        id: KEY_COLUMN_ID.to_string(),
        header: KEY_COLUMN_HEADER.to_string(),
        accessor: KEY_COLUMN_ID.to_string(),
        width: KEY_COLUMN_WIDTH,
    };

    std::iter::once(key)
        .chain(languages.iter().map(|language| {
            let language = language.as_ref();
            Column {
                id: language.to_string(),
                header: language.to_uppercase(),
                accessor: language.to_string(),
                width: LANGUAGE_COLUMN_WIDTH,
            }
        }))
        .collect()
}

#[cfg(test)]
#[allow(clippy::indexing_slicing)]
mod tests {
    use googletest::prelude::*;

    use super::*;

    #[googletest::test]
    fn test_key_column_comes_first() {
        let columns = create_locale_columns(&["en", "tr"]);

        expect_that!(
            columns,
            elements_are![
                eq(&Column {
                    id: "key".to_string(),
                    header: "Key/Path".to_string(),
                    accessor: "key".to_string(),
                    width: 250
                }),
                eq(&Column {
                    id: "en".to_string(),
                    header: "EN".to_string(),
                    accessor: "en".to_string(),
                    width: 200
                }),
                eq(&Column {
                    id: "tr".to_string(),
                    header: "TR".to_string(),
                    accessor: "tr".to_string(),
                    width: 200
                })
            ]
        );
    }

    #[googletest::test]
    fn test_no_languages_yields_key_column_only() {
        let columns = create_locale_columns::<&str>(&[]);

        expect_that!(columns.len(), eq(1));
        expect_that!(columns[0].is_key_column(), eq(true));
    }

    #[googletest::test]
    fn test_headers_keep_region_suffix() {
        let columns = create_locale_columns(&["pt-br".to_string()]);

        expect_that!(columns[1].header, eq("PT-BR"));
        expect_that!(columns[1].id, eq("pt-br"));
    }
}
