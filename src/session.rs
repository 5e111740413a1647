//! The editing session: committed locales, pending edits and their persistence.
//!
//! A [`Workbench`] is the single owner of the changeset and the used-key log.
//! Every mutation writes the changeset through to its [`KeyValueStore`] so an
//! interrupted session resumes with the same pending edits.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use crate::changes::{
    self,
    ChangeSet,
};
use crate::config::WorkbenchSettings;
use crate::input::flatten_locales;
use crate::store::{
    KeyValueStore,
    LOCALE_EDITS_KEY,
    StoreError,
};
use crate::table::{
    Column,
    ColumnVisibility,
    TableView,
    create_locale_columns,
    filter_table_data,
    transform_to_table_data,
};
use crate::types::{
    LocaleTree,
    TableRow,
    UsedKeys,
};

/// Panic message for accessing the workbench outside of a session.
pub const MISSING_SESSION_MESSAGE: &str = "useWorkbench must be used within an initialized workbench session";

#[derive(Error, Debug)]
pub enum WorkbenchError {
    #[error("Editing is disabled; set \"editable\": true to allow changes")]
    ReadOnly,

    #[error("Failed to persist pending changes: {0}")]
    Store(#[from] StoreError),

    #[error("Failed to serialize pending changes: {0}")]
    Serialize(#[from] serde_json::Error),
}

#[derive(Error, Debug)]
pub enum SaveError {
    #[error("Failed to write changes to {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize changes: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Save rejected: {0}")]
    Rejected(String),
}

/// Receives the pending changeset and relays it to durable storage.
///
/// Closures of the matching shape implement this trait.
pub trait SaveHandler: Send + Sync {
    /// # Errors
    /// Returns an error when the changeset could not be delivered.
    fn save(&self, changes: &ChangeSet) -> Result<(), SaveError>;
}

impl<F> SaveHandler for F
where
    F: Fn(&ChangeSet) -> Result<(), SaveError> + Send + Sync,
{
    fn save(&self, changes: &ChangeSet) -> Result<(), SaveError> {
        self(changes)
    }
}

/// Writes the changeset as pretty-printed JSON to a file.
#[derive(Debug, Clone)]
pub struct JsonFileSaveHandler {
    path: PathBuf,
}

impl JsonFileSaveHandler {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl SaveHandler for JsonFileSaveHandler {
    fn save(&self, changes: &ChangeSet) -> Result<(), SaveError> {
        let payload = serde_json::to_string_pretty(changes)?;
        let io_error = |source| SaveError::Io { path: self.path.clone(), source };
        if let Some(parent) = self.path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(io_error)?;
        }
        std::fs::write(&self.path, payload).map_err(io_error)?;
        tracing::debug!(path = %self.path.display(), "Wrote pending changes");
        Ok(())
    }
}

/// What [`Workbench::save`] did with the changeset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    /// The configured handler accepted the changeset.
    Delivered,
    /// No handler is configured; the payload is returned for the operator.
    Surfaced(ChangeSet),
}

pub struct Workbench {
    settings: WorkbenchSettings,
    locales: LocaleTree,
    rows: Vec<TableRow>,
    columns: Vec<Column>,
    visibility: ColumnVisibility,
    changes: ChangeSet,
    used_keys: UsedKeys,
    store: Box<dyn KeyValueStore>,
    save_handler: Option<Box<dyn SaveHandler>>,
}

impl fmt::Debug for Workbench {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Workbench")
            .field("settings", &self.settings)
            .field("languages", &self.locales.keys().collect::<Vec<_>>())
            .field("rows", &self.rows.len())
            .field("changes", &self.changes)
            .field("used_keys", &self.used_keys.len())
            .field("store", &"<dyn KeyValueStore>")
            .field("save_handler", &self.save_handler.as_ref().map(|_| "<dyn SaveHandler>"))
            .finish_non_exhaustive()
    }
}

impl Workbench {
    /// Opens a session, restoring any changeset persisted in `store`.
    ///
    /// Unreadable or malformed persisted state is logged and treated as an
    /// empty changeset.
    #[must_use]
    pub fn new(settings: WorkbenchSettings, store: Box<dyn KeyValueStore>) -> Self {
        let changes = restore_changes(&*store);
        let columns = create_locale_columns(&settings.languages());
        let visibility = ColumnVisibility::new(&columns);
        Self {
            settings,
            locales: LocaleTree::new(),
            rows: Vec::new(),
            columns,
            visibility,
            changes,
            used_keys: UsedKeys::new(),
            store,
            save_handler: None,
        }
    }

    #[must_use]
    pub fn with_save_handler(mut self, handler: impl SaveHandler + 'static) -> Self {
        self.save_handler = Some(Box::new(handler));
        self
    }

    pub fn set_save_handler(&mut self, handler: Option<Box<dyn SaveHandler>>) {
        self.save_handler = handler;
    }

    #[must_use]
    pub const fn settings(&self) -> &WorkbenchSettings {
        &self.settings
    }

    #[must_use]
    pub const fn editable(&self) -> bool {
        self.settings.editable
    }

    /// Configured language codes, in column order.
    #[must_use]
    pub fn languages(&self) -> Vec<String> {
        self.settings.languages()
    }

    #[must_use]
    pub const fn locales(&self) -> &LocaleTree {
        &self.locales
    }

    #[must_use]
    pub const fn pending_changes(&self) -> &ChangeSet {
        &self.changes
    }

    #[must_use]
    pub const fn used_keys(&self) -> &UsedKeys {
        &self.used_keys
    }

    #[must_use]
    pub fn rows(&self) -> &[TableRow] {
        &self.rows
    }

    #[must_use]
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    #[must_use]
    pub const fn visibility(&self) -> &ColumnVisibility {
        &self.visibility
    }

    /// Replaces the settings, keeping pending edits and column state.
    pub fn apply_settings(&mut self, settings: WorkbenchSettings) {
        self.settings = settings;
        self.columns = create_locale_columns(&self.settings.languages());
        self.visibility.sync(&self.columns);
    }

    /// Replaces the committed translations and drops edits they made redundant.
    ///
    /// # Errors
    /// Returns an error if the reconciled changeset cannot be persisted.
    pub fn set_locales(&mut self, locales: LocaleTree) -> Result<(), WorkbenchError> {
        self.rows = transform_to_table_data(flatten_locales(&locales));
        self.locales = locales;

        let reconciled = changes::reconcile(&self.changes, &self.locales);
        if reconciled != self.changes {
            tracing::debug!("Reconciled pending changes against reloaded locales");
            self.changes = reconciled;
            self.persist()?;
        }
        Ok(())
    }

    /// Stages an edit, or drops it when it matches the committed value.
    ///
    /// # Errors
    /// - [`WorkbenchError::ReadOnly`] when editing is disabled
    /// - the changeset cannot be persisted (the edit is kept in memory)
    pub fn update_local_value(
        &mut self,
        language: &str,
        key_path: &str,
        value: serde_json::Value,
    ) -> Result<(), WorkbenchError> {
        if !self.editable() {
            return Err(WorkbenchError::ReadOnly);
        }
        let current = std::mem::take(&mut self.changes);
        self.changes = changes::update_value(current, language, key_path, value, &self.locales);
        self.persist()
    }

    /// Records that the host rendered `key`. Returns `true` the first time.
    pub fn mark_used(&mut self, key: impl Into<String>) -> bool {
        self.used_keys.mark(key)
    }

    /// Drops every pending edit, in memory and in the store.
    ///
    /// # Errors
    /// Returns an error if the persisted entry cannot be removed.
    pub fn reset_changes(&mut self) -> Result<(), WorkbenchError> {
        self.changes = ChangeSet::new();
        self.store.remove_item(LOCALE_EDITS_KEY)?;
        tracing::debug!("Pending changes reset");
        Ok(())
    }

    /// Hands the pending changeset to the save handler.
    ///
    /// Nothing is cleared here: clearing the local cache afterwards is the
    /// caller's decision (see [`Workbench::reset_changes`]).
    ///
    /// # Errors
    /// Propagates the save handler's error.
    pub fn save(&self) -> Result<SaveOutcome, SaveError> {
        match &self.save_handler {
            Some(handler) => {
                handler.save(&self.changes)?;
                Ok(SaveOutcome::Delivered)
            }
            None => {
                tracing::info!(payload = ?self.changes, "No save handler configured, surfacing changes");
                Ok(SaveOutcome::Surfaced(self.changes.clone()))
            }
        }
    }

    /// Flips a column's visibility. The key column stays visible.
    pub fn toggle_column(&mut self, column_id: &str) -> Option<bool> {
        self.visibility.toggle(column_id)
    }

    /// The table as currently shown: used-key filter, then `search`.
    #[must_use]
    pub fn table(&self, search: &str) -> TableView {
        let languages = self.languages();
        let rows = filter_table_data(&self.rows, search, &languages, &self.changes, Some(&self.used_keys));
        TableView::project(&rows, &self.columns, &self.visibility, &self.changes)
    }

    fn persist(&mut self) -> Result<(), WorkbenchError> {
        if self.changes.is_empty() {
            self.store.remove_item(LOCALE_EDITS_KEY)?;
        } else {
            self.store.set_item(LOCALE_EDITS_KEY, &self.changes.to_json()?)?;
        }
        Ok(())
    }
}

fn restore_changes(store: &dyn KeyValueStore) -> ChangeSet {
    let saved = match store.get_item(LOCALE_EDITS_KEY) {
        Ok(Some(saved)) => saved,
        Ok(None) => return ChangeSet::new(),
        Err(error) => {
            tracing::warn!(%error, "Failed to read persisted changes, starting empty");
            return ChangeSet::new();
        }
    };
    ChangeSet::from_json(&saved).unwrap_or_else(|error| {
        tracing::warn!(%error, "Invalid persisted data for {LOCALE_EDITS_KEY}, using empty changeset");
        ChangeSet::new()
    })
}

/// Returns the session, panicking when there is none.
///
/// A missing session is a wiring bug in the host, not a runtime condition.
///
/// # Panics
/// Panics with [`MISSING_SESSION_MESSAGE`] when `session` is `None`.
#[must_use]
#[allow(clippy::panic)]
pub fn use_workbench(session: Option<&Workbench>) -> &Workbench {
    match session {
        Some(workbench) => workbench,
        None => panic!("{MISSING_SESSION_MESSAGE}"),
    }
}

/// Mutable variant of [`use_workbench`].
///
/// # Panics
/// Panics with [`MISSING_SESSION_MESSAGE`] when `session` is `None`.
#[must_use]
#[allow(clippy::panic)]
pub fn use_workbench_mut(session: Option<&mut Workbench>) -> &mut Workbench {
    match session {
        Some(workbench) => workbench,
        None => panic!("{MISSING_SESSION_MESSAGE}"),
    }
}
