//! LSP lifecycle handlers: `initialize`, `initialized`.

use tower_lsp::jsonrpc::Result;
use tower_lsp::lsp_types::{
    ExecuteCommandOptions,
    InitializeParams,
    InitializeResult,
    InitializedParams,
    MessageType,
    ServerCapabilities,
    ServerInfo,
    WorkDoneProgressOptions,
};

use super::execute_command::COMMANDS;
use super::super::backend::Backend;

pub async fn handle_initialize(
    backend: &Backend,
    params: InitializeParams,
) -> Result<InitializeResult> {
    let workspace_root = params
        .workspace_folders
        .as_ref()
        .and_then(|folders| folders.first())
        .and_then(|folder| folder.uri.to_file_path().ok());

    let mut config_manager = backend.config_manager.lock().await;
    if let Err(error) = config_manager.load_settings(workspace_root) {
        backend
            .client
            .log_message(MessageType::ERROR, format!("Configuration error: {error}"))
            .await;
        tracing::error!("Configuration error during initialize: {}", error);
    }
    let workbench = Backend::open_workbench(&config_manager);
    drop(config_manager);

    tracing::debug!(?workbench, "Workbench session opened");
    backend.state.install(workbench).await;

    Ok(InitializeResult {
        server_info: Some(ServerInfo {
            name: env!("CARGO_PKG_NAME").to_string(),
            version: Some(env!("CARGO_PKG_VERSION").to_string()),
        }),
        capabilities: ServerCapabilities {
            execute_command_provider: Some(ExecuteCommandOptions {
                commands: COMMANDS.iter().map(ToString::to_string).collect(),
                work_done_progress_options: WorkDoneProgressOptions::default(),
            }),
            ..ServerCapabilities::default()
        },
    })
}

pub async fn handle_initialized(backend: &Backend, _: InitializedParams) {
    backend.client.log_message(MessageType::INFO, "initialized!").await;

    backend.reload_locales().await;

    let pending = {
        let workbench = backend.state.lock_workbench().await;
        workbench.as_ref().map_or(0, |workbench| workbench.pending_changes().languages().count())
    };
    if pending > 0 {
        backend
            .client
            .log_message(
                MessageType::INFO,
                format!("Restored pending changes for {pending} language(s)"),
            )
            .await;
    }
}
