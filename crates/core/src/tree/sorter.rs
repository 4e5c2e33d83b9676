//! Ordering policies applied to folders and their contents

use crate::tree::{
    forest::Forest,
    node::{NodeKey, TaskFile, TaskFolder, TaskItem, TreeNode},
};
use std::cmp::Ordering;

/// Ordering of nodes within a container
pub trait TaskSorter {
    fn compare_files(&self, a: &TaskFile, b: &TaskFile) -> Ordering;
    fn compare_items(&self, a: &TaskItem, b: &TaskItem) -> Ordering;
}

/// Case-insensitive label ordering with files ahead of items
#[derive(Debug, Clone, Copy, Default)]
pub struct LabelSorter;

impl TaskSorter for LabelSorter {
    fn compare_files(&self, a: &TaskFile, b: &TaskFile) -> Ordering {
        a.label
            .to_lowercase()
            .cmp(&b.label.to_lowercase())
            .then_with(|| a.task_source.cmp(&b.task_source))
    }

    fn compare_items(&self, a: &TaskItem, b: &TaskItem) -> Ordering {
        a.label
            .to_lowercase()
            .cmp(&b.label.to_lowercase())
            .then_with(|| a.task.name.cmp(&b.task.name))
    }
}

/// Last Tasks, Favorites, User Tasks, then workspace folders by label
pub fn compare_folders(a: &TaskFolder, b: &TaskFolder) -> Ordering {
    a.kind
        .sort_rank()
        .cmp(&b.kind.sort_rank())
        .then_with(|| a.label.to_lowercase().cmp(&b.label.to_lowercase()))
}

pub fn sort_folders(forest: &mut Forest) {
    forest.sort_folders_by(compare_folders);
}

/// Stable sort of the direct children of `parent`
pub fn sort_children(forest: &mut Forest, parent: NodeKey, sorter: &dyn TaskSorter) {
    let mut children = forest.children(parent).to_vec();
    children.sort_by(|a, b| match (forest.get(*a), forest.get(*b)) {
        (Some(TreeNode::File(a)), Some(TreeNode::File(b))) => sorter.compare_files(a, b),
        (Some(TreeNode::Item(a)), Some(TreeNode::Item(b))) => sorter.compare_items(a, b),
        (Some(TreeNode::File(_)), Some(TreeNode::Item(_))) => Ordering::Less,
        (Some(TreeNode::Item(_)), Some(TreeNode::File(_))) => Ordering::Greater,
        _ => Ordering::Equal,
    });
    match forest.get_mut(parent) {
        Some(TreeNode::Folder(folder)) => folder.tree_nodes = children,
        Some(TreeNode::File(file)) => file.tree_nodes = children,
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::node::FolderKind;

    #[test]
    fn test_folder_order() {
        let mut folders = vec![
            TaskFolder::new(FolderKind::Workspace, "zeta", None, true),
            TaskFolder::special(FolderKind::User, true),
            TaskFolder::new(FolderKind::Workspace, "Alpha", None, true),
            TaskFolder::special(FolderKind::Favorites, true),
            TaskFolder::special(FolderKind::LastTasks, true),
        ];
        folders.sort_by(compare_folders);
        let labels: Vec<&str> = folders.iter().map(|f| f.label.as_str()).collect();
        assert_eq!(labels, vec!["Last Tasks", "Favorites", "User Tasks", "Alpha", "zeta"]);
    }
}
