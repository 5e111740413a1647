//! 設定管理を行うモジュール

use std::io::ErrorKind;
use std::path::{
    Path,
    PathBuf,
};

use super::{
    CONFIG_FILE_NAME,
    ConfigError,
    WorkbenchSettings,
    WorkspacePaths,
};

/// 設定管理を行う
#[derive(Default, Debug, Clone)]
pub struct ConfigManager {
    /// 現在の設定
    current_settings: WorkbenchSettings,

    /// ワークスペースのルートパス
    workspace_root: Option<PathBuf>,
}

impl ConfigManager {
    /// 新しい設定マネージャーを作成
    #[must_use]
    pub fn new() -> Self {
        Self { current_settings: WorkbenchSettings::default(), workspace_root: None }
    }

    /// 設定を読み込む
    ///
    /// # Arguments
    /// * `workspace_root` - ワークスペースのルートパス
    ///
    /// # Returns
    /// - `Ok(())`: 設定の読み込みとバリデーション成功
    /// - `Err(ConfigError)`: エラー
    ///
    /// # Errors
    /// - ファイル読み込みエラー
    /// - JSON パースエラー
    /// - バリデーションエラー
    pub fn load_settings(&mut self, workspace_root: Option<PathBuf>) -> Result<(), ConfigError> {
        tracing::debug!("Loading settings for workspace: {:?}", workspace_root);

        // ワークスペースルートは設定が不正でも保持する（相対パスの解決に使う）
        self.workspace_root.clone_from(&workspace_root);

        let settings = match &workspace_root {
            Some(root) => read_config_file(root)?.unwrap_or_default(),
            None => WorkbenchSettings::default(),
        };

        settings.validate().map_err(ConfigError::ValidationErrors)?;

        self.current_settings = settings;
        tracing::debug!("Settings loaded successfully: {:?}", self.current_settings);

        Ok(())
    }

    /// 設定を更新する（`did_change_configuration` 用）
    ///
    /// # Errors
    /// - バリデーションエラー（現在の設定は変更されない）
    pub fn update_settings(&mut self, new_settings: WorkbenchSettings) -> Result<(), ConfigError> {
        tracing::debug!("Updating settings...");

        new_settings.validate().map_err(ConfigError::ValidationErrors)?;

        self.current_settings = new_settings;
        tracing::debug!("Settings updated successfully");

        Ok(())
    }

    /// 現在の設定を取得
    #[must_use]
    pub const fn get_settings(&self) -> &WorkbenchSettings {
        &self.current_settings
    }

    /// ワークスペースルートを取得
    #[must_use]
    pub const fn workspace_root(&self) -> Option<&PathBuf> {
        self.workspace_root.as_ref()
    }

    /// 現在の設定のパスをワークスペースルート基準で解決する
    #[must_use]
    pub fn paths(&self) -> WorkspacePaths {
        WorkspacePaths::resolve(self.workspace_root.as_deref(), &self.current_settings)
    }
}

/// ワークスペースの `.statix.json` を読み込む（存在しなければ `None`）
fn read_config_file(workspace_root: &Path) -> Result<Option<WorkbenchSettings>, ConfigError> {
    let config_path = workspace_root.join(CONFIG_FILE_NAME);
    let content = match std::fs::read_to_string(&config_path) {
        Ok(content) => content,
        Err(error) if error.kind() == ErrorKind::NotFound => {
            tracing::debug!(path = %config_path.display(), "No workspace configuration, using defaults");
            return Ok(None);
        }
        Err(error) => return Err(error.into()),
    };

    let settings = serde_json::from_str(&content)?;
    tracing::debug!(path = %config_path.display(), ?settings, "Loaded workspace configuration");
    Ok(Some(settings))
}
