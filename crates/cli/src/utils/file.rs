use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use task_tree_core::{Task, TreeConfig, TreeState};
use tracing::debug;

/// Reads the JSON task list written by the discovery layer
pub fn load_tasks(path: &Path) -> Result<Vec<Task>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read task list {}", path.display()))?;
    let tasks: Vec<Task> = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse task list {}", path.display()))?;
    debug!("Loaded {} tasks from {}", tasks.len(), path.display());
    Ok(tasks)
}

/// Explicit config file, else the nearest one above the working directory,
/// else defaults
pub fn load_config(explicit: Option<&Path>) -> Result<TreeConfig> {
    let path = match explicit {
        Some(path) => Some(path.to_path_buf()),
        None => TreeConfig::find_config_file(&std::env::current_dir()?),
    };
    match path {
        Some(path) => {
            debug!("Using config {}", path.display());
            TreeConfig::load_from_file(&path)
                .with_context(|| format!("Failed to load config {}", path.display()))
        }
        None => Ok(TreeConfig::default()),
    }
}

/// A missing state file means a fresh state
pub fn load_state(path: Option<&Path>) -> Result<TreeState> {
    match path {
        Some(path) if path.exists() => TreeState::load_from_file(path)
            .with_context(|| format!("Failed to load state {}", path.display())),
        _ => Ok(TreeState::default()),
    }
}
