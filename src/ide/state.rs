//! LSP サーバーの共有状態

use std::sync::Arc;

use tokio::sync::{
    Mutex,
    MutexGuard,
};

use crate::session::Workbench;

/// LSP サーバーの共有状態
///
/// ワークベンチは `initialize` で作成されるまで `None`。
/// すべてのコマンドはこの1つのロックを通して直列に実行される。
#[derive(Clone, Default)]
pub struct ServerState {
    /// 編集セッション
    pub workbench: Arc<Mutex<Option<Workbench>>>,
}

impl ServerState {
    /// 新しい `ServerState` を作成
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// ワークベンチのロックを取得
    pub async fn lock_workbench(&self) -> MutexGuard<'_, Option<Workbench>> {
        self.workbench.lock().await
    }

    /// ワークベンチを差し替える
    pub async fn install(&self, workbench: Workbench) {
        *self.workbench.lock().await = Some(workbench);
    }
}

impl std::fmt::Debug for ServerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerState").field("workbench", &"<Option<Workbench>>").finish()
    }
}

#[cfg(test)]
mod tests {
    use googletest::prelude::*;

    use super::*;
    use crate::config::WorkbenchSettings;
    use crate::store::MemoryStore;

    #[googletest::test]
    fn clone_shares_state() {
        let state1 = ServerState::new();
        let state2 = state1.clone();

        expect_that!(Arc::strong_count(&state1.workbench), eq(2));
        expect_that!(Arc::ptr_eq(&state1.workbench, &state2.workbench), eq(true));
    }

    #[googletest::test]
    fn debug_impl_works() {
        let debug_str = format!("{:?}", ServerState::new());

        expect_that!(debug_str, contains_substring("ServerState"));
        expect_that!(debug_str, contains_substring("workbench"));
    }

    #[tokio::test]
    async fn install_is_visible_through_clones() {
        let state1 = ServerState::new();
        let state2 = state1.clone();
        assert!(state2.lock_workbench().await.is_none());

        state1.install(Workbench::new(WorkbenchSettings::default(), Box::new(MemoryStore::new()))).await;

        let workbench = state2.lock_workbench().await;
        assert!(workbench.as_ref().is_some_and(|workbench| !workbench.editable()));
    }
}
