//! Execute Command ハンドラー
//!
//! `workspace/executeCommand` リクエストを処理し、
//! ワークベンチの操作をエディタに公開します。

use std::collections::HashMap;

use serde::Deserialize;
use serde_json::{
    Value,
    json,
};
use tower_lsp::jsonrpc::Result;
use tower_lsp::lsp_types::{
    ExecuteCommandParams,
    MessageActionItem,
    MessageType,
};

use super::super::backend::Backend;
use crate::changes::ChangeSet;
use crate::session::{
    SaveOutcome,
    WorkbenchError,
    use_workbench,
    use_workbench_mut,
};

/// セルの値を更新する
pub const UPDATE_VALUE: &str = "statix.updateValue";
/// キーを使用中として記録する
pub const MARK_USED: &str = "statix.markUsed";
/// 表示用のテーブルを取得する
pub const GET_TABLE: &str = "statix.getTable";
/// 言語列の表示を切り替える
pub const TOGGLE_COLUMN: &str = "statix.toggleColumn";
/// 未保存の変更を取得する
pub const GET_PENDING_CHANGES: &str = "statix.getPendingChanges";
/// 変更を保存する
pub const SAVE: &str = "statix.save";
/// 変更を破棄する
pub const RESET: &str = "statix.reset";
/// ロケールを再読み込みする
pub const RELOAD: &str = "statix.reload";
/// 編集可能かどうかを返す
pub const IS_EDITABLE: &str = "statix.isEditable";

/// サーバーが受け付けるコマンド一覧
pub const COMMANDS: [&str; 9] = [
    UPDATE_VALUE,
    MARK_USED,
    GET_TABLE,
    TOGGLE_COLUMN,
    GET_PENDING_CHANGES,
    SAVE,
    RESET,
    RELOAD,
    IS_EDITABLE,
];

/// 確認ダイアログのボタン
const CLEAR_ACTION: &str = "Clear";
/// 確認ダイアログのボタン
const KEEP_ACTION: &str = "Keep";
/// 保存先に書き込んだ後の確認メッセージ
const SAVED_PROMPT: &str = "Changes saved. Do you want to clear the local cache?";
/// 変更内容をログに出力した後の確認メッセージ
const SURFACED_PROMPT: &str =
    "No save target is configured; the changes were written to the log. Do you want to clear the local cache?";

/// `workspace/executeCommand` リクエストを処理
pub async fn handle_execute_command(
    backend: &Backend,
    params: ExecuteCommandParams,
) -> Result<Option<Value>> {
    tracing::debug!(command = %params.command, "Execute Command request");

    let args = params.arguments;
    match params.command.as_str() {
        UPDATE_VALUE => handle_update_value(backend, &args).await,
        MARK_USED => handle_mark_used(backend, &args).await,
        GET_TABLE => handle_get_table(backend, &args).await,
        TOGGLE_COLUMN => handle_toggle_column(backend, &args).await,
        GET_PENDING_CHANGES => {
            let workbench = backend.state.lock_workbench().await;
            Ok(Some(json!(use_workbench(workbench.as_ref()).pending_changes())))
        }
        SAVE => handle_save(backend).await,
        RESET => handle_reset(backend).await,
        RELOAD => {
            backend.reload_locales().await;
            Ok(None)
        }
        IS_EDITABLE => {
            let workbench = backend.state.lock_workbench().await;
            Ok(Some(Value::Bool(use_workbench(workbench.as_ref()).editable())))
        }
        _ => {
            tracing::warn!("Unknown command: {}", params.command);
            Ok(None)
        }
    }
}

/// `statix.updateValue` コマンドの引数
#[derive(Debug, Clone, PartialEq, Eq)]
struct UpdateValueArgs {
    /// 言語コード
    language: String,
    /// ドット区切りのキー
    key: String,
    /// 新しい値
    value: Value,
}

/// `[language, key, value]` を解析する（値が省略された場合は空文字列）
fn parse_update_value_args(args: &[Value]) -> Option<UpdateValueArgs> {
    let language = args.first()?.as_str()?;
    let key = args.get(1)?.as_str()?;
    if language.is_empty() || key.is_empty() {
        return None;
    }
    let value = args.get(2).cloned().unwrap_or_else(|| Value::String(String::new()));
    Some(UpdateValueArgs { language: language.to_string(), key: key.to_string(), value })
}

/// `statix.getTable` コマンドの引数
#[derive(Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
struct GetTableArgs {
    /// 検索語（空の場合は全件）
    search: String,
}

/// 引数がない、または不正な場合は空検索として扱う
fn parse_get_table_args(args: &[Value]) -> GetTableArgs {
    match args.first() {
        Some(Value::String(search)) => GetTableArgs { search: search.clone() },
        Some(value) => serde_json::from_value(value.clone()).unwrap_or_else(|error| {
            tracing::warn!(%error, "Invalid arguments for statix.getTable, ignoring");
            GetTableArgs::default()
        }),
        None => GetTableArgs::default(),
    }
}

/// 最初の引数を文字列として取り出す
fn first_string_arg(args: &[Value]) -> Option<&str> {
    args.first().and_then(Value::as_str)
}

/// `statix.updateValue` コマンドを実行
///
/// # Arguments
/// * `arguments[0]` - 言語コード (例: "en")
/// * `arguments[1]` - 翻訳キー (例: "app.title")
/// * `arguments[2]` - 新しい値
///
/// # Returns
/// 更新後の未保存の変更
async fn handle_update_value(backend: &Backend, args: &[Value]) -> Result<Option<Value>> {
    let Some(UpdateValueArgs { language, key, value }) = parse_update_value_args(args) else {
        tracing::warn!("Invalid arguments for statix.updateValue");
        return Ok(None);
    };

    tracing::debug!(language = %language, key = %key, "Executing statix.updateValue");

    let mut guard = backend.state.lock_workbench().await;
    let workbench = use_workbench_mut(guard.as_mut());
    let result = workbench.update_local_value(&language, &key, value);
    let pending = json!(workbench.pending_changes());
    drop(guard);

    match result {
        Ok(()) => Ok(Some(pending)),
        Err(WorkbenchError::ReadOnly) => {
            backend
                .client
                .log_message(MessageType::WARNING, WorkbenchError::ReadOnly.to_string())
                .await;
            Ok(None)
        }
        Err(error) => {
            tracing::warn!(%error, "Edit kept in memory only");
            backend.client.log_message(MessageType::WARNING, error.to_string()).await;
            Ok(Some(pending))
        }
    }
}

/// `statix.markUsed` コマンドを実行
///
/// 初めて記録されたキーの場合は `true` を返す
async fn handle_mark_used(backend: &Backend, args: &[Value]) -> Result<Option<Value>> {
    let Some(key) = first_string_arg(args).filter(|key| !key.is_empty()) else {
        tracing::warn!("Invalid arguments for statix.markUsed");
        return Ok(None);
    };

    let mut guard = backend.state.lock_workbench().await;
    let inserted = use_workbench_mut(guard.as_mut()).mark_used(key);
    Ok(Some(Value::Bool(inserted)))
}

/// `statix.getTable` コマンドを実行
///
/// # Arguments
/// * `arguments[0]` - `{ "search": "..." }` または検索語の文字列（省略可）
///
/// # Returns
/// 表示中の列と行（未保存の変更を反映済み）
async fn handle_get_table(backend: &Backend, args: &[Value]) -> Result<Option<Value>> {
    let GetTableArgs { search } = parse_get_table_args(args);

    let guard = backend.state.lock_workbench().await;
    let view = use_workbench(guard.as_ref()).table(&search);
    drop(guard);

    Ok(Some(json!(view)))
}

/// `statix.toggleColumn` コマンドを実行
///
/// キー列や存在しない列の場合は `null` を返す
async fn handle_toggle_column(backend: &Backend, args: &[Value]) -> Result<Option<Value>> {
    let Some(column_id) = first_string_arg(args) else {
        tracing::warn!("Invalid arguments for statix.toggleColumn");
        return Ok(None);
    };

    let mut guard = backend.state.lock_workbench().await;
    let visible = use_workbench_mut(guard.as_mut()).toggle_column(column_id);
    Ok(Some(json!(visible)))
}

/// `statix.save` コマンドを実行
///
/// 保存先が設定されていない場合は変更内容をログに出力する。
/// どちらの場合も、ローカルのキャッシュを消去するかユーザーに確認する。
async fn handle_save(backend: &Backend) -> Result<Option<Value>> {
    let outcome = {
        let guard = backend.state.lock_workbench().await;
        let workbench = use_workbench(guard.as_ref());
        if !workbench.editable() {
            drop(guard);
            backend
                .client
                .log_message(MessageType::WARNING, WorkbenchError::ReadOnly.to_string())
                .await;
            return Ok(None);
        }
        workbench.save()
    };

    let delivered = match outcome {
        Ok(SaveOutcome::Delivered) => true,
        Ok(SaveOutcome::Surfaced(changes)) => {
            backend.client.show_message(MessageType::INFO, "Changes are ready!").await;
            let (typ, message) = payload_message(&changes);
            backend.client.log_message(typ, message).await;
            false
        }
        Err(error) => {
            tracing::error!(%error, "Save failed");
            backend.client.show_message(MessageType::ERROR, format!("Save failed: {error}")).await;
            return Ok(Some(json!({ "saved": false, "cleared": false })));
        }
    };

    let cleared = confirm_clear(backend, clear_prompt(delivered)).await && reset(backend).await;

    Ok(Some(json!({ "saved": delivered, "cleared": cleared })))
}

/// 保存先がない場合にログへ出力するメッセージ
fn payload_message(changes: &ChangeSet) -> (MessageType, String) {
    match serde_json::to_string_pretty(changes) {
        Ok(payload) => (MessageType::INFO, format!("Payload: {payload}")),
        Err(error) => {
            tracing::error!(%error, "Failed to serialize pending changes");
            (MessageType::ERROR, format!("Failed to serialize changes: {error}"))
        }
    }
}

/// 保存結果に応じた確認メッセージ
const fn clear_prompt(delivered: bool) -> &'static str {
    if delivered { SAVED_PROMPT } else { SURFACED_PROMPT }
}

/// ローカルのキャッシュを消去するか確認する
async fn confirm_clear(backend: &Backend, prompt: &str) -> bool {
    let actions = [CLEAR_ACTION, KEEP_ACTION]
        .into_iter()
        .map(|title| MessageActionItem { title: title.to_string(), properties: HashMap::new() })
        .collect();

    let response = backend
        .client
        .show_message_request(
            MessageType::INFO,
            prompt,
            Some(actions),
        )
        .await;

    match response {
        Ok(Some(item)) => item.title == CLEAR_ACTION,
        Ok(None) => false,
        Err(error) => {
            tracing::warn!(%error, "Confirmation request failed, keeping local changes");
            false
        }
    }
}

/// `statix.reset` コマンドを実行
async fn handle_reset(backend: &Backend) -> Result<Option<Value>> {
    let editable = {
        let guard = backend.state.lock_workbench().await;
        use_workbench(guard.as_ref()).editable()
    };
    if !editable {
        backend.client.log_message(MessageType::WARNING, WorkbenchError::ReadOnly.to_string()).await;
        return Ok(None);
    }

    Ok(Some(Value::Bool(reset(backend).await)))
}

/// 未保存の変更を破棄し、成功したかを返す
async fn reset(backend: &Backend) -> bool {
    let mut guard = backend.state.lock_workbench().await;
    let result = use_workbench_mut(guard.as_mut()).reset_changes();
    drop(guard);

    match result {
        Ok(()) => true,
        Err(error) => {
            tracing::warn!(%error, "Failed to clear persisted changes");
            backend.client.log_message(MessageType::WARNING, error.to_string()).await;
            false
        }
    }
}
