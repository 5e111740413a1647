use indexmap::IndexMap;
use serde::{
    Deserialize,
    Serialize,
};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Configuration error in '{field_path}': {message}")]
pub struct ValidationError {
    /// JSON path to the field (e.g., "languagesKeys.en")
    pub field_path: String,
    pub message: String,
}

impl ValidationError {
    #[must_use]
    pub fn new(field_path: impl Into<String>, message: impl Into<String>) -> Self {
        Self { field_path: field_path.into(), message: message.into() }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration validation failed:\n{}", format_validation_errors(.0))]
    ValidationErrors(Vec<ValidationError>),

    #[error("Failed to load configuration file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse configuration: {0}")]
    ParseError(#[from] serde_json::Error),
}

fn format_validation_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .enumerate()
        .map(|(i, err)| format!("  {}. {} - {}", i + 1, err.field_path, err.message))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Settings as sent by clients that namespace them under `statix`.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerSettings {
    pub statix: WorkbenchSettings,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WorkbenchSettings {
    /// Directory holding one `<language>/translation.json` per language,
    /// relative to the workspace root.
    pub locale_path: String,

    /// Language code → display label, in column order.
    pub languages_keys: IndexMap<String, String>,

    /// Whether edits are accepted at all.
    pub editable: bool,

    /// File the pending changeset is written to on save.
    ///
    /// When unset, save surfaces the payload to the operator instead.
    pub save_path: Option<String>,

    /// Directory backing the persistent key-value store.
    pub storage_path: String,
}

impl WorkbenchSettings {
    /// Configured language codes, in column order.
    #[must_use]
    pub fn languages(&self) -> Vec<String> {
        self.languages_keys.keys().cloned().collect()
    }

    /// # Errors
    /// - Required path is empty
    /// - Invalid language code
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if self.locale_path.trim().is_empty() {
            errors.push(ValidationError::new(
                "localePath",
                "The path cannot be empty. Example: \"public/locales\"",
            ));
        }

        if self.storage_path.trim().is_empty() {
            errors.push(ValidationError::new(
                "storagePath",
                "The path cannot be empty. Example: \".statix\"",
            ));
        }

        if let Some(path) = &self.save_path
            && path.trim().is_empty()
        {
            errors.push(ValidationError::new(
                "savePath",
                "The path cannot be empty. Please specify a file (e.g., \"statix-changes.json\"), or remove this field",
            ));
        }

        for code in self.languages_keys.keys() {
            if code.trim().is_empty() {
                errors.push(ValidationError::new(
                    "languagesKeys",
                    "Language codes cannot be empty. Example: {\"en\": \"English\"}",
                ));
            } else if code.contains(['.', '/', '\\']) {
                errors.push(ValidationError::new(
                    format!("languagesKeys.{code}"),
                    format!("Invalid language code '{code}': must not contain '.', '/' or '\\'"),
                ));
            }
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

impl Default for WorkbenchSettings {
    fn default() -> Self {
        Self {
            locale_path: "public/locales".to_string(),
            languages_keys: IndexMap::new(),
            editable: false,
            save_path: None,
            storage_path: ".statix".to_string(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing, clippy::expect_used, clippy::panic)]
mod tests {
    use googletest::prelude::*;
    use rstest::*;

    use super::*;

    fn with_languages(codes: &[&str]) -> WorkbenchSettings {
        WorkbenchSettings {
            languages_keys: codes.iter().map(|code| ((*code).to_string(), code.to_uppercase())).collect(),
            ..WorkbenchSettings::default()
        }
    }

    #[rstest]
    fn validate_valid_settings() {
        let settings = with_languages(&["en", "tr", "pt-BR"]);

        assert_that!(settings.validate(), ok(anything()));
    }

    #[rstest]
    fn deserialize_empty_settings() {
        let settings: WorkbenchSettings = serde_json::from_str("{}").unwrap();

        assert_that!(settings, eq(&WorkbenchSettings::default()));
        assert_that!(settings.locale_path, eq("public/locales"));
        assert_that!(settings.storage_path, eq(".statix"));
        assert_that!(settings.editable, eq(false));
    }

    #[rstest]
    fn deserialize_keeps_language_order() {
        let json = r#"{"languagesKeys": {"tr": "Türkçe", "en": "English", "de": "Deutsch"}, "editable": true}"#;

        let settings: WorkbenchSettings = serde_json::from_str(json).unwrap();

        assert_that!(settings.languages(), elements_are![eq("tr"), eq("en"), eq("de")]);
        assert_that!(settings.languages_keys["tr"], eq("Türkçe"));
        assert_that!(settings.editable, eq(true));
    }

    #[rstest]
    fn deserialize_wrapped_settings() {
        let json = r#"{"statix": {"savePath": "out.json"}}"#;

        let settings: ServerSettings = serde_json::from_str(json).unwrap();

        assert_that!(settings.statix.save_path, some(eq("out.json")));
    }

    #[rstest]
    #[case::locale_path(WorkbenchSettings { locale_path: "  ".to_string(), ..WorkbenchSettings::default() }, "localePath")]
    #[case::storage_path(WorkbenchSettings { storage_path: String::new(), ..WorkbenchSettings::default() }, "storagePath")]
    #[case::save_path(WorkbenchSettings { save_path: Some(String::new()), ..WorkbenchSettings::default() }, "savePath")]
    #[case::empty_language(with_languages(&["en", ""]), "languagesKeys")]
    fn validate_rejects_empty_values(#[case] settings: WorkbenchSettings, #[case] field_path: &str) {
        assert_that!(
            settings.validate(),
            err(elements_are![all![
                field!(ValidationError.field_path, eq(field_path)),
                field!(ValidationError.message, contains_substring("cannot be empty"))
            ]])
        );
    }

    #[rstest]
    #[case::dot("en.US")]
    #[case::slash("../en")]
    #[case::backslash("en\\x")]
    fn validate_rejects_path_like_language_codes(#[case] code: &str) {
        let settings = with_languages(&["en", code]);

        assert_that!(
            settings.validate(),
            err(elements_are![all![
                field!(ValidationError.field_path, eq(&format!("languagesKeys.{code}"))),
                field!(ValidationError.message, contains_substring("Invalid language code"))
            ]])
        );
    }

    #[rstest]
    fn config_error_validation_errors_format() {
        let settings = WorkbenchSettings {
            locale_path: String::new(),
            storage_path: String::new(),
            ..WorkbenchSettings::default()
        };

        let errors = settings.validate().unwrap_err();
        let config_error = ConfigError::ValidationErrors(errors);

        let error_message = format!("{config_error}");
        assert_that!(error_message, contains_substring("Configuration validation failed"));
        assert_that!(error_message, contains_substring("1. localePath"));
        assert_that!(error_message, contains_substring("2. storagePath"));
    }
}
