//! Projection of flattened rows and pending edits into a table.
//!
//! The projector is split the same way the table is drawn: [`columns`] derives
//! the headers, [`visibility`] tracks which of them are shown and [`filter`]
//! decides which rows survive the used-key filter and search box.

pub mod columns;
pub mod filter;
pub mod visibility;

use serde::{
    Deserialize,
    Serialize,
};
use serde_json::{
    Map,
    Value,
};

pub use columns::{
    Column,
    create_locale_columns,
};
pub use filter::{
    display_value,
    filter_table_data,
};
pub use visibility::ColumnVisibility;

use crate::changes::ChangeSet;
use crate::types::{
    FlattenedRow,
    TableRow,
};

/// Turns flattened rows into table rows keyed by their full path.
#[must_use]
pub fn transform_to_table_data(rows: Vec<FlattenedRow>) -> Vec<TableRow> {
    rows.into_iter()
        .map(|row| TableRow { id: row.full_key(), key: row.key, path: row.path, values: row.values })
        .collect()
}

/// One rendered row: display values with pending edits applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayRow {
    pub id: String,
    pub key: String,
    pub path: String,
    pub values: Map<String, Value>,
    /// Languages whose cell shows an uncommitted edit.
    pub pending: Vec<String>,
}

/// A snapshot of the table as the host renders it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableView {
    pub columns: Vec<Column>,
    pub rows: Vec<DisplayRow>,
}

impl TableView {
    /// Builds the view for `rows`, showing only the `columns` that are visible.
    ///
    /// Cells are filled for visible language columns only.
    #[must_use]
    pub fn project(rows: &[&TableRow], columns: &[Column], visibility: &ColumnVisibility, changes: &ChangeSet) -> Self {
        let columns: Vec<Column> = visibility.visible_columns(columns).into_iter().cloned().collect();
        let languages: Vec<&str> =
            columns.iter().filter(|column| !column.is_key_column()).map(|column| column.accessor.as_str()).collect();

        let rows = rows
            .iter()
            .map(|row| {
                let mut values = Map::new();
                let mut pending = Vec::new();
                for language in &languages {
                    let original = row.values.get(*language).unwrap_or(&Value::Null);
                    values.insert((*language).to_string(), display_value(&row.id, language, original, changes).clone());
                    if changes.get(language, &row.id).is_some() {
                        pending.push((*language).to_string());
                    }
                }
                DisplayRow { id: row.id.clone(), key: row.key.clone(), path: row.path.clone(), values, pending }
            })
            .collect();

        Self { columns, rows }
    }
}
