//! Workspace-related handlers.

use tower_lsp::lsp_types::{
    DidChangeConfigurationParams,
    DidChangeWatchedFilesParams,
    MessageType,
};

use super::super::backend::Backend;
use crate::config::{
    ServerSettings,
    WorkbenchSettings,
};
use crate::session::use_workbench_mut;

pub async fn handle_did_change_configuration(
    backend: &Backend,
    params: DidChangeConfigurationParams,
) {
    tracing::info!(settings = %params.settings, "didChangeConfiguration received");

    let new_settings = serde_json::from_value::<ServerSettings>(params.settings.clone())
        .map(|wrapped| wrapped.statix)
        .or_else(|_| serde_json::from_value::<WorkbenchSettings>(params.settings));

    match new_settings {
        Ok(new_settings) => apply_settings(backend, |config_manager| {
            config_manager.update_settings(new_settings)
        })
        .await,
        Err(error) => {
            tracing::warn!(%error, "Ignoring unparsable configuration");
        }
    }
}

pub async fn handle_did_change_watched_files(
    backend: &Backend,
    params: DidChangeWatchedFilesParams,
) {
    let mut locales_changed = false;

    for change in params.changes {
        let Some(file_path) = Backend::uri_to_path(&change.uri) else {
            continue;
        };

        if backend.is_config_file(&file_path).await {
            tracing::debug!("Config file changed: {:?}, type: {:?}", file_path, change.typ);
            apply_settings(backend, |config_manager| {
                let workspace_root = config_manager.workspace_root().cloned();
                config_manager.load_settings(workspace_root)
            })
            .await;
            continue;
        }

        if backend.is_translation_file(&file_path).await {
            tracing::debug!("Translation file changed: {:?}, type: {:?}", file_path, change.typ);
            locales_changed = true;
        }
    }

    if locales_changed {
        backend.reload_locales().await;
    }
}

/// 設定を更新し、成功した場合はワークベンチに反映してロケールを再読み込みする
async fn apply_settings<F>(backend: &Backend, update: F)
where
    F: FnOnce(&mut crate::config::ConfigManager) -> Result<(), crate::config::ConfigError>,
{
    let mut config_manager = backend.config_manager.lock().await;
    if let Err(error) = update(&mut *config_manager) {
        drop(config_manager);
        tracing::error!(%error, "configuration validation error");
        backend
            .client
            .log_message(MessageType::ERROR, format!("Configuration error: {error}"))
            .await;
        return;
    }
    let settings = config_manager.get_settings().clone();
    let save_handler = Backend::save_handler(&config_manager);
    drop(config_manager);

    {
        let mut guard = backend.state.lock_workbench().await;
        let workbench = use_workbench_mut(guard.as_mut());
        workbench.apply_settings(settings);
        workbench.set_save_handler(save_handler);
    }
    tracing::info!("configuration updated successfully");

    backend.reload_locales().await;
}
