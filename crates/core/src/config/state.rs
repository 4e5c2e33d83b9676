use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FolderState {
    pub expanded: bool,
}

/// Persisted UI state: folder expansion, favorites and recently run tasks
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct TreeState {
    pub folders: BTreeMap<String, FolderState>,
    /// Task item ids marked as favorite
    pub favorites: Vec<String>,
    /// Task item ids, most recently run first
    pub last_tasks: Vec<String>,
}

impl TreeState {
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        serde_json::from_str(&contents)
            .map_err(|e| Error::StateError(format!("Failed to parse state: {e}")))
    }

    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| Error::StateError(format!("Failed to serialize state: {e}")))?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Folders are expanded unless the user collapsed them
    pub fn is_folder_expanded(&self, label: &str) -> bool {
        self.folders.get(label).is_none_or(|state| state.expanded)
    }

    pub fn set_folder_expanded(&mut self, label: &str, expanded: bool) {
        self.folders
            .insert(label.to_string(), FolderState { expanded });
    }

    pub fn is_favorite(&self, id: &str) -> bool {
        self.favorites.iter().any(|f| f == id)
    }

    /// Returns false when the id was already a favorite
    pub fn add_favorite(&mut self, id: &str) -> bool {
        if self.is_favorite(id) {
            return false;
        }
        self.favorites.push(id.to_string());
        true
    }

    /// Returns false when the id was not a favorite
    pub fn remove_favorite(&mut self, id: &str) -> bool {
        let before = self.favorites.len();
        self.favorites.retain(|f| f != id);
        before != self.favorites.len()
    }

    /// Moves `id` to the front of the last-run list, keeping at most `max` entries
    pub fn push_last_task(&mut self, id: &str, max: usize) {
        self.last_tasks.retain(|t| t != id);
        self.last_tasks.insert(0, id.to_string());
        self.last_tasks.truncate(max);
    }
}
