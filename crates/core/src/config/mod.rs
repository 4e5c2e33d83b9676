//! Configuration and persisted UI state for task-tree

mod settings;
pub mod state;
pub mod validation;

// Re-export main types
pub use settings::{CONFIG_FILE_NAMES, GroupingConfig, SpecialFoldersConfig, TreeConfig};
pub use state::{FolderState, TreeState};
