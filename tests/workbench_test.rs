//! ワークベンチの公開 API を通した結合テスト

#![allow(clippy::unwrap_used)]
#![allow(clippy::indexing_slicing)]
#![allow(missing_docs)]

use std::fs;
use std::path::Path;

use googletest::prelude::*;
use serde_json::{
    Value,
    json,
};
use statix::changes::ChangeSet;
use statix::config::WorkbenchSettings;
use statix::input::load_locales;
use statix::session::{
    JsonFileSaveHandler,
    SaveOutcome,
};
use statix::store::{
    FileStore,
    KeyValueStore,
    LOCALE_EDITS_KEY,
};
use statix::Workbench;
use tempfile::TempDir;

fn write_locale(root: &Path, language: &str, tree: &Value) {
    let dir = root.join(language);
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("translation.json"), tree.to_string()).unwrap();
}

fn settings() -> WorkbenchSettings {
    serde_json::from_value(json!({
        "languagesKeys": { "en": "English", "tr": "Türkçe" },
        "editable": true
    }))
    .unwrap()
}

fn fixture() -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    let locales = temp_dir.path().join("public/locales");
    write_locale(&locales, "en", &json!({ "title": "Hi", "app": { "name": "Statix", "menu": { "open": "Open" } } }));
    write_locale(&locales, "tr", &json!({ "title": "Selam", "app": { "menu": { "open": "Aç" } } }));
    temp_dir
}

async fn open(temp_dir: &TempDir) -> Workbench {
    let store = FileStore::new(temp_dir.path().join(".statix"));
    let mut workbench = Workbench::new(settings(), Box::new(store));
    let locales = load_locales(&temp_dir.path().join("public/locales"), &workbench.languages()).await;
    workbench.set_locales(locales).unwrap();
    workbench
}

#[googletest::test]
#[tokio::test]
async fn edits_survive_a_restart_and_are_reconciled() {
    let temp_dir = fixture();

    let mut workbench = open(&temp_dir).await;
    workbench.update_local_value("en", "title", json!("Hello")).unwrap();
    workbench.update_local_value("tr", "app.name", json!("Statiks")).unwrap();
    drop(workbench);

    // The committed English title catches up with the pending edit.
    write_locale(
        &temp_dir.path().join("public/locales"),
        "en",
        &json!({ "title": "Hello", "app": { "name": "Statix", "menu": { "open": "Open" } } }),
    );

    let workbench = open(&temp_dir).await;

    let expected: ChangeSet = serde_json::from_value(json!({ "tr": { "app": { "name": "Statiks" } } })).unwrap();
    expect_that!(workbench.pending_changes(), eq(&expected));

    let store = FileStore::new(temp_dir.path().join(".statix"));
    expect_that!(store.get_item(LOCALE_EDITS_KEY).unwrap(), some(eq(r#"{"tr":{"app":{"name":"Statiks"}}}"#)));
}

#[googletest::test]
#[tokio::test]
async fn missing_language_file_is_skipped() {
    let temp_dir = fixture();
    let store = FileStore::new(temp_dir.path().join(".statix"));
    let mut settings = settings();
    settings.languages_keys.insert("de".to_string(), "Deutsch".to_string());
    let mut workbench = Workbench::new(settings, Box::new(store));

    let locales = load_locales(&temp_dir.path().join("public/locales"), &workbench.languages()).await;
    workbench.set_locales(locales).unwrap();

    let languages: Vec<String> = workbench.locales().keys().cloned().collect();
    expect_that!(languages, elements_are![eq("en"), eq("tr")]);
    // The column stays so the language can still be filled in.
    expect_that!(workbench.columns().len(), eq(4));
}

#[googletest::test]
#[tokio::test]
async fn table_shows_missing_translations_as_empty_cells() {
    let temp_dir = fixture();
    let workbench = open(&temp_dir).await;

    let view = workbench.table("statix");

    expect_that!(view.rows.len(), eq(1));
    expect_that!(view.rows[0].id, eq("app.name"));
    expect_that!(view.rows[0].values["en"], eq(&json!("Statix")));
    expect_that!(view.rows[0].values["tr"], eq(&json!("")));
}

#[googletest::test]
#[tokio::test]
async fn save_then_reset_flushes_to_file() {
    let temp_dir = fixture();
    let save_path = temp_dir.path().join("out/changes.json");
    let mut workbench = open(&temp_dir).await.with_save_handler(JsonFileSaveHandler::new(&save_path));
    workbench.update_local_value("tr", "app.name", json!("Statiks")).unwrap();

    let outcome = workbench.save().unwrap();
    workbench.reset_changes().unwrap();

    expect_that!(outcome, eq(&SaveOutcome::Delivered));
    let saved: Value = serde_json::from_str(&fs::read_to_string(&save_path).unwrap()).unwrap();
    expect_that!(saved, eq(&json!({ "tr": { "app": { "name": "Statiks" } } })));
    expect_that!(workbench.pending_changes().is_empty(), eq(true));
    expect_that!(temp_dir.path().join(".statix/localeEdits.json").exists(), eq(false));
}
