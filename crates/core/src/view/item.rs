use crate::tree::{FolderKind, Icon, NodeKey, TaskFile, TaskFolder, TaskItem};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Collapsible {
    None,
    Collapsed,
    Expanded,
}

/// Snapshot of a node in the shape the host widget renders
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TreeItem {
    pub key: NodeKey,
    pub id: String,
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tooltip: Option<String>,
    pub icon: Icon,
    pub context_value: String,
    pub collapsible: Collapsible,
}

fn proper_case(source: &str) -> String {
    let mut chars = source.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.map(|c| c.to_ascii_lowercase())).collect(),
        None => String::new(),
    }
}

impl TreeItem {
    pub fn from_folder(key: NodeKey, folder: &TaskFolder) -> Self {
        let context_value = match folder.kind {
            FolderKind::Workspace => "folder",
            FolderKind::User => "userTasks",
            FolderKind::Favorites => "favorites",
            FolderKind::LastTasks => "lastTasks",
        };
        Self {
            key,
            id: folder.id.clone(),
            label: folder.label.clone(),
            tooltip: folder
                .workspace_folder
                .as_ref()
                .map(|path| path.display().to_string()),
            icon: folder.kind.icon(),
            context_value: context_value.to_string(),
            collapsible: if folder.expanded {
                Collapsible::Expanded
            } else {
                Collapsible::Collapsed
            },
        }
    }

    pub fn from_file(key: NodeKey, file: &TaskFile) -> Self {
        let prefix = if file.is_group { "taskGroup" } else { "taskFile" };
        Self {
            key,
            id: file.id.clone(),
            label: file.label.clone(),
            tooltip: (!file.is_group).then(|| {
                if file.relative_path.is_empty() {
                    file.file_name.clone()
                } else {
                    format!("{}/{}", file.relative_path.trim_end_matches('/'), file.file_name)
                }
            }),
            icon: file.icon.clone(),
            context_value: format!("{prefix}{}", proper_case(&file.task_source)),
            collapsible: Collapsible::Collapsed,
        }
    }

    pub fn from_item(key: NodeKey, item: &TaskItem) -> Self {
        Self {
            key,
            id: item.id.clone(),
            label: item.label.clone(),
            tooltip: Some(item.tooltip.clone()),
            icon: item.icon.clone(),
            context_value: item.context_value.clone(),
            collapsible: Collapsible::None,
        }
    }
}
