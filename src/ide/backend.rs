//! LSP Backend 実装

use std::path::Path;
use std::sync::Arc;

use tokio::sync::Mutex;
use tower_lsp::jsonrpc::Result;
use tower_lsp::lsp_types::{
    DidChangeConfigurationParams,
    DidChangeWatchedFilesParams,
    ExecuteCommandParams,
    InitializeParams,
    InitializeResult,
    InitializedParams,
    MessageType,
    Url,
};
use tower_lsp::{
    Client,
    LanguageServer,
};

use super::handlers;
use super::state::ServerState;
use crate::config::ConfigManager;
use crate::input::locale::load_locales;
use crate::session::{
    JsonFileSaveHandler,
    SaveHandler,
    Workbench,
    use_workbench_mut,
};
use crate::store::FileStore;

/// LSP Backend
#[derive(Clone)]
pub struct Backend {
    /// LSP クライアント
    pub client: Client,
    /// 設定管理
    pub config_manager: Arc<Mutex<ConfigManager>>,
    /// 共有状態
    pub state: ServerState,
}

impl std::fmt::Debug for Backend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Backend")
            .field("config_manager", &"<ConfigManager>")
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl Backend {
    /// 新しい Backend を作成
    #[must_use]
    pub fn new(client: Client) -> Self {
        Self {
            client,
            config_manager: Arc::new(Mutex::new(ConfigManager::new())),
            state: ServerState::new(),
        }
    }

    /// 現在の設定からワークベンチを作成
    ///
    /// ストアは `storagePath`、保存先は `savePath` をワークスペースルート基準で解決する。
    pub(crate) fn open_workbench(config_manager: &ConfigManager) -> Workbench {
        let settings = config_manager.get_settings().clone();
        let store = FileStore::new(config_manager.paths().storage_dir);
        let save_handler = Self::save_handler(config_manager);
        let mut workbench = Workbench::new(settings, Box::new(store));
        workbench.set_save_handler(save_handler);
        workbench
    }

    /// `savePath` が設定されていればファイル保存ハンドラーを返す
    pub(crate) fn save_handler(config_manager: &ConfigManager) -> Option<Box<dyn SaveHandler>> {
        config_manager
            .paths()
            .save_file
            .map(|path| Box::new(JsonFileSaveHandler::new(path)) as Box<dyn SaveHandler>)
    }

    /// ロケールファイルを再読み込みし、ワークベンチに反映する
    pub(crate) async fn reload_locales(&self) {
        let (locale_root, languages) = {
            let config_manager = self.config_manager.lock().await;
            (config_manager.paths().locale_root, config_manager.get_settings().languages())
        };

        tracing::debug!(locale_root = %locale_root.display(), ?languages, "Loading locales");
        let locales = load_locales(&locale_root, &languages).await;
        let loaded = locales.len();

        let mut guard = self.state.lock_workbench().await;
        let result = use_workbench_mut(guard.as_mut()).set_locales(locales);
        drop(guard);

        match result {
            Ok(()) => {
                self.client
                    .log_message(
                        MessageType::INFO,
                        format!("Loaded {loaded}/{} locales", languages.len()),
                    )
                    .await;
            }
            Err(error) => {
                tracing::warn!(%error, "Failed to persist reconciled changes");
                self.client
                    .log_message(MessageType::WARNING, format!("Failed to persist changes: {error}"))
                    .await;
            }
        }
    }

    /// URI をファイルパスに変換
    pub(crate) fn uri_to_path(uri: &Url) -> Option<std::path::PathBuf> {
        uri.to_file_path().ok()
    }

    /// ワークスペースの設定ファイルかどうか
    pub(crate) async fn is_config_file(&self, path: &Path) -> bool {
        self.config_manager.lock().await.paths().is_config_file(path)
    }

    /// 設定済みの言語の翻訳ファイルかどうか
    pub(crate) async fn is_translation_file(&self, path: &Path) -> bool {
        let config_manager = self.config_manager.lock().await;
        config_manager
            .paths()
            .translation_language(path)
            .is_some_and(|language| config_manager.get_settings().languages_keys.contains_key(language))
    }
}

#[tower_lsp::async_trait]
impl LanguageServer for Backend {
    async fn initialize(&self, params: InitializeParams) -> Result<InitializeResult> {
        handlers::lifecycle::handle_initialize(self, params).await
    }

    async fn initialized(&self, params: InitializedParams) {
        handlers::lifecycle::handle_initialized(self, params).await;
    }

    async fn shutdown(&self) -> Result<()> {
        Ok(())
    }

    async fn did_change_configuration(&self, params: DidChangeConfigurationParams) {
        handlers::workspace::handle_did_change_configuration(self, params).await;
    }

    async fn did_change_watched_files(&self, params: DidChangeWatchedFilesParams) {
        handlers::workspace::handle_did_change_watched_files(self, params).await;
    }

    async fn execute_command(
        &self,
        params: ExecuteCommandParams,
    ) -> Result<Option<serde_json::Value>> {
        handlers::execute_command::handle_execute_command(self, params).await
    }
}
