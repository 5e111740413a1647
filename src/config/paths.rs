//! ワークスペース内のファイル配置
//!
//! 設定中の相対パスはワークスペースルートを基準に解決する。
//! ルートがない場合はカレントディレクトリ基準のまま扱う。

use std::path::{
    Component,
    Path,
    PathBuf,
};

use super::WorkbenchSettings;
use crate::input::locale::TRANSLATION_FILE_NAME;

/// ワークスペースの設定ファイル名
pub const CONFIG_FILE_NAME: &str = ".statix.json";

/// 設定から解決したワークスペースのパス一式
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkspacePaths {
    /// `.statix.json` の場所（ワークスペースがない場合は `None`）
    pub config_file: Option<PathBuf>,
    /// `{lang}/translation.json` を含むディレクトリ
    pub locale_root: PathBuf,
    /// 未保存の変更を永続化するディレクトリ
    pub storage_dir: PathBuf,
    /// 保存先ファイル（`savePath` 未設定なら `None`）
    pub save_file: Option<PathBuf>,
}

impl WorkspacePaths {
    /// `settings` のパスを `workspace_root` 基準で解決する
    #[must_use]
    pub fn resolve(workspace_root: Option<&Path>, settings: &WorkbenchSettings) -> Self {
        let resolve = |path: &str| resolve_path(workspace_root, path);
        Self {
            config_file: workspace_root.map(|root| root.join(CONFIG_FILE_NAME)),
            locale_root: resolve(&settings.locale_path),
            storage_dir: resolve(&settings.storage_path),
            save_file: settings.save_path.as_deref().map(resolve),
        }
    }

    /// ワークスペースの設定ファイルかどうか
    ///
    /// ワークスペースがない場合はファイル名だけで判定する。
    #[must_use]
    pub fn is_config_file(&self, path: &Path) -> bool {
        match &self.config_file {
            Some(config_file) => path == config_file,
            None => path.file_name().is_some_and(|name| name == CONFIG_FILE_NAME),
        }
    }

    /// `{locale_root}/{lang}/translation.json` であれば言語コードを返す
    #[must_use]
    pub fn translation_language<'a>(&self, path: &'a Path) -> Option<&'a str> {
        let relative = path.strip_prefix(&self.locale_root).ok()?;
        let mut components = relative.components();
        let (Some(Component::Normal(language)), Some(Component::Normal(file)), None) =
            (components.next(), components.next(), components.next())
        else {
            return None;
        };
        if file != TRANSLATION_FILE_NAME {
            return None;
        }
        language.to_str()
    }
}

/// 相対パスをワークスペースルートから解決する（絶対パスはそのまま）
fn resolve_path(workspace_root: Option<&Path>, path: &str) -> PathBuf {
    let path = Path::new(path);
    match workspace_root {
        Some(root) if path.is_relative() => root.join(path),
        _ => path.to_path_buf(),
    }
}
