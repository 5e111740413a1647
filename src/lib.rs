//! statix
//!
//! Translation workbench core: committed locale trees are flattened into a
//! table, edits are staged as a changeset that only holds values diverging
//! from the committed translations, and the changeset is flushed to a save
//! handler. A `tower-lsp` server exposes the workbench to an editor host.

pub mod changes;
pub mod config;
pub mod ide;
pub mod input;
pub mod session;
pub mod store;
pub mod table;
mod test_utils;
pub mod tree;
pub mod types;

// Backend を再エクスポート
pub use ide::backend::Backend;
pub use session::{
    Workbench,
    use_workbench,
    use_workbench_mut,
};
