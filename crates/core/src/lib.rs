//! task-tree-core - Builds a navigable tree of runnable tasks
//!
//! This crate provides functionality to:
//! - Organize discovered tasks into workspace folders, task files and items
//! - Group related tasks by source and by a shared label prefix
//! - Keep curated Favorites and Last Tasks folders in sync with saved state
//! - Coalesce refresh notifications while the hosting view is hidden
pub mod config;
pub mod error;
pub mod running;
pub mod tree;
pub mod types;
pub mod view;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;

// Re-export main API components
pub use config::{TreeConfig, TreeState};
pub use running::{RunningTask, RunningTaskRegistry, RunningTasks};
pub use tree::{NodeKey, TaskItemRef, TaskTreeBuilder};
pub use view::{TaskTree, TreeEvent, TreeServices, render_outline};
