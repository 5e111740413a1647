//! Per-column visibility state.

use indexmap::IndexMap;

use super::columns::Column;

/// Which columns are currently shown.
///
/// Every column starts visible. The key column cannot be hidden.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnVisibility {
    visible: IndexMap<String, bool>,
}

impl ColumnVisibility {
    #[must_use]
    pub fn new(columns: &[Column]) -> Self {
        Self { visible: columns.iter().map(|column| (column.id.clone(), true)).collect() }
    }

    /// Re-derives the state for a new column list, keeping known columns' state.
    pub fn sync(&mut self, columns: &[Column]) {
        let previous = std::mem::take(&mut self.visible);
        self.visible = columns
            .iter()
            .map(|column| {
                let shown = column.is_key_column() || previous.get(&column.id).copied().unwrap_or(true);
                (column.id.clone(), shown)
            })
            .collect();
    }

    /// Flips the visibility of `column_id` and returns the new state.
    ///
    /// Returns `None` for the key column and for unknown ids.
    pub fn toggle(&mut self, column_id: &str) -> Option<bool> {
        if column_id == super::columns::KEY_COLUMN_ID {
            return None;
        }
        let shown = self.visible.get_mut(column_id)?;
        *shown = !*shown;
        Some(*shown)
    }

    #[must_use]
    pub fn is_visible(&self, column_id: &str) -> bool {
        self.visible.get(column_id).copied().unwrap_or(false)
    }

    /// `columns` filtered to the visible ones, in their original order.
    #[must_use]
    pub fn visible_columns<'a>(&self, columns: &'a [Column]) -> Vec<&'a Column> {
        columns.iter().filter(|column| self.is_visible(&column.id)).collect()
    }
}

#[cfg(test)]
mod tests {
    use googletest::prelude::*;

    use super::*;
    use crate::table::columns::create_locale_columns;

    fn ids(columns: &[&Column]) -> Vec<String> {
        columns.iter().map(|column| column.id.clone()).collect()
    }

    #[googletest::test]
    fn test_all_columns_start_visible() {
        let columns = create_locale_columns(&["en", "tr"]);
        let visibility = ColumnVisibility::new(&columns);

        expect_that!(ids(&visibility.visible_columns(&columns)), elements_are![eq("key"), eq("en"), eq("tr")]);
    }

    #[googletest::test]
    fn test_toggle_hides_and_shows_language() {
        let columns = create_locale_columns(&["en", "tr"]);
        let mut visibility = ColumnVisibility::new(&columns);

        expect_that!(visibility.toggle("en"), some(eq(false)));
        expect_that!(ids(&visibility.visible_columns(&columns)), elements_are![eq("key"), eq("tr")]);
        expect_that!(visibility.toggle("en"), some(eq(true)));
        expect_that!(visibility.is_visible("en"), eq(true));
    }

    #[googletest::test]
    fn test_key_column_is_pinned() {
        let columns = create_locale_columns(&["en"]);
        let mut visibility = ColumnVisibility::new(&columns);

        expect_that!(visibility.toggle("key"), none());
        expect_that!(visibility.is_visible("key"), eq(true));
    }

    #[googletest::test]
    fn test_toggle_unknown_column() {
        let columns = create_locale_columns(&["en"]);
        let mut visibility = ColumnVisibility::new(&columns);

        expect_that!(visibility.toggle("de"), none());
        expect_that!(visibility.is_visible("de"), eq(false));
    }

    #[googletest::test]
    fn test_sync_keeps_hidden_columns_hidden() {
        let mut visibility = ColumnVisibility::new(&create_locale_columns(&["en", "tr"]));
        visibility.toggle("tr");

        let columns = create_locale_columns(&["tr", "de"]);
        visibility.sync(&columns);

        expect_that!(ids(&visibility.visible_columns(&columns)), elements_are![eq("key"), eq("de")]);
        expect_that!(visibility.is_visible("en"), eq(false));
    }
}
