//! Workbench configuration.
/// Configuration manager
mod manager;
/// Workspace file layout
mod paths;
/// Configuration types and settings
mod types;

pub use manager::ConfigManager;
pub use paths::{
    CONFIG_FILE_NAME,
    WorkspacePaths,
};
pub use types::{
    ConfigError,
    ServerSettings,
    ValidationError,
    WorkbenchSettings,
};
