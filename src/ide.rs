//! LSP host exposing the workbench to an editor.

pub mod backend;
mod handlers;
pub mod state;
