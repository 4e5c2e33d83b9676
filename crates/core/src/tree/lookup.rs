//! Resolving host-side references back to live task items

use crate::tree::{
    builder::TaskTreeBuilder,
    node::{NodeKey, TreeNode},
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Lightweight task reference as sent across a process boundary
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LightTask {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub source: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskItemRef {
    Id(String),
    /// Task file path from a context-menu invocation, optionally narrowed
    /// to one task name
    Path { path: PathBuf, name: Option<String> },
    Light(LightTask),
}

impl TaskTreeBuilder {
    /// `None` when the reference no longer matches anything in the tree
    pub fn find_task_item(&self, reference: &TaskItemRef) -> Option<NodeKey> {
        match reference {
            TaskItemRef::Id(id) => self.find_by_id(id),
            TaskItemRef::Path { path, name } => self.find_by_path(path, name.as_deref()),
            TaskItemRef::Light(light) => self.find_light(light),
        }
    }

    fn find_by_id(&self, id: &str) -> Option<NodeKey> {
        if let Some(key) = self.task_map.get(id) {
            return Some(*key);
        }
        // special-folder copies carry prefixed ids
        self.items_in_order()
            .find(|key| self.forest.item(*key).is_some_and(|item| item.id == id))
    }

    fn find_by_path(&self, path: &Path, name: Option<&str>) -> Option<NodeKey> {
        self.live_items_in_order().find(|key| {
            self.forest.item(*key).is_some_and(|item| {
                item.uri == path && name.is_none_or(|name| item.task.name == name)
            })
        })
    }

    fn find_light(&self, light: &LightTask) -> Option<NodeKey> {
        if !light.id.is_empty() {
            if let Some(key) = self.find_by_id(&light.id) {
                return Some(key);
            }
        }
        if light.name.is_empty() {
            return None;
        }
        self.live_items_in_order().find(|key| {
            self.forest.item(*key).is_some_and(|item| {
                item.task.name == light.name
                    && (light.source.is_empty() || item.task_source == light.source)
                    && light.path.as_ref().is_none_or(|path| item.uri == *path)
            })
        })
    }

    /// Every item, special-folder copies included, in tree order
    fn items_in_order(&self) -> impl Iterator<Item = NodeKey> + '_ {
        self.forest
            .folders()
            .iter()
            .flat_map(|folder| self.forest.descendants(*folder))
            .filter(|key| matches!(self.forest.get(*key), Some(TreeNode::Item(_))))
    }

    /// Indexed items only, in tree order
    fn live_items_in_order(&self) -> impl Iterator<Item = NodeKey> + '_ {
        self.items_in_order().filter(|key| {
            self.forest
                .item(*key)
                .is_some_and(|item| self.task_map.get(&item.id) == Some(key))
        })
    }
}
