//! ロケールファイルの読み込み
//!
//! 各言語の翻訳は `{locale_root}/{language}/translation.json` に置かれる。

use std::path::{
    Path,
    PathBuf,
};

use serde_json::{
    Map,
    Value,
};
use thiserror::Error;

use crate::types::LocaleTree;

/// File name of every per-language translation document.
pub const TRANSLATION_FILE_NAME: &str = "translation.json";

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Failed to read locale file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse locale file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// 言語ごとの翻訳ファイルのパス
#[must_use]
pub fn translation_file_path(locale_root: &Path, language: &str) -> PathBuf {
    locale_root.join(language).join(TRANSLATION_FILE_NAME)
}

/// JSON ドキュメントを1つ読み込む
///
/// # Errors
/// - ファイル読み込みエラー
/// - JSON パースエラー
pub async fn fetch_json(path: &Path) -> Result<Value, LoadError> {
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| LoadError::Io { path: path.to_path_buf(), source })?;
    serde_json::from_str(&content).map_err(|source| LoadError::Parse { path: path.to_path_buf(), source })
}

/// 全言語のロケールファイルを並列に読み込む
///
/// 読み込みに失敗した言語は警告を出してスキップする（他の言語の読み込みは続行）。
/// 結果は `languages` の順序を保つ。
pub async fn load_locales<S: AsRef<str>>(locale_root: &Path, languages: &[S]) -> LocaleTree {
    let futures: Vec<_> = languages
        .iter()
        .map(|language| async move {
            let language = language.as_ref();
            let path = translation_file_path(locale_root, language);
            (language, fetch_json(&path).await)
        })
        .collect();

    let mut locales = Map::new();
    for (language, result) in futures::future::join_all(futures).await {
        match result {
            Ok(tree) => {
                locales.insert(language.to_string(), tree);
            }
            Err(error) => {
                tracing::warn!(language, %error, "Skipping locale that failed to load");
            }
        }
    }

    tracing::debug!(loaded = locales.len(), requested = languages.len(), "Loaded locales");
    locales
}
