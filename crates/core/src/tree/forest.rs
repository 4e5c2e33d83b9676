//! Arena owning every node of the tree
//!
//! Parents own their children through `tree_nodes`; the `parent` slot on files
//! and items is a non-owning back-reference kept in step by [`Forest::add_child`]
//! and [`Forest::detach`].

use crate::{
    error::{Error, Result},
    tree::node::{NodeKey, NodeKind, PositionedNode, TaskFile, TaskFolder, TaskItem, TreeNode},
};
use std::collections::HashMap;

#[derive(Debug, Default)]
pub struct Forest {
    next_key: u64,
    nodes: HashMap<NodeKey, TreeNode>,
    folders: Vec<NodeKey>,
}

impl Forest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn allocate(&mut self, node: TreeNode) -> NodeKey {
        self.next_key += 1;
        let key = NodeKey(self.next_key);
        self.nodes.insert(key, node);
        key
    }

    /// Adds a top-level folder
    pub fn insert_folder(&mut self, folder: TaskFolder) -> NodeKey {
        let key = self.allocate(TreeNode::Folder(folder));
        self.folders.push(key);
        key
    }

    /// Adds a detached file or item; attach it with [`Forest::add_child`]
    pub fn insert(&mut self, node: TreeNode) -> NodeKey {
        self.allocate(node)
    }

    pub fn folders(&self) -> &[NodeKey] {
        &self.folders
    }

    pub fn sort_folders_by<F>(&mut self, mut compare: F)
    where
        F: FnMut(&TaskFolder, &TaskFolder) -> std::cmp::Ordering,
    {
        let nodes = &self.nodes;
        self.folders.sort_by(|a, b| match (nodes.get(a), nodes.get(b)) {
            (Some(TreeNode::Folder(a)), Some(TreeNode::Folder(b))) => compare(a, b),
            _ => std::cmp::Ordering::Equal,
        });
    }

    pub fn contains(&self, key: NodeKey) -> bool {
        self.nodes.contains_key(&key)
    }

    pub fn get(&self, key: NodeKey) -> Option<&TreeNode> {
        self.nodes.get(&key)
    }

    pub fn get_mut(&mut self, key: NodeKey) -> Option<&mut TreeNode> {
        self.nodes.get_mut(&key)
    }

    pub fn folder(&self, key: NodeKey) -> Option<&TaskFolder> {
        match self.nodes.get(&key) {
            Some(TreeNode::Folder(folder)) => Some(folder),
            _ => None,
        }
    }

    pub fn folder_mut(&mut self, key: NodeKey) -> Option<&mut TaskFolder> {
        match self.nodes.get_mut(&key) {
            Some(TreeNode::Folder(folder)) => Some(folder),
            _ => None,
        }
    }

    pub fn file(&self, key: NodeKey) -> Option<&TaskFile> {
        match self.nodes.get(&key) {
            Some(TreeNode::File(file)) => Some(file),
            _ => None,
        }
    }

    pub fn file_mut(&mut self, key: NodeKey) -> Option<&mut TaskFile> {
        match self.nodes.get_mut(&key) {
            Some(TreeNode::File(file)) => Some(file),
            _ => None,
        }
    }

    pub fn item(&self, key: NodeKey) -> Option<&TaskItem> {
        match self.nodes.get(&key) {
            Some(TreeNode::Item(item)) => Some(item),
            _ => None,
        }
    }

    pub fn item_mut(&mut self, key: NodeKey) -> Option<&mut TaskItem> {
        match self.nodes.get_mut(&key) {
            Some(TreeNode::Item(item)) => Some(item),
            _ => None,
        }
    }

    fn narrow<'a, T>(
        &'a self,
        key: NodeKey,
        expected: NodeKind,
        pick: impl FnOnce(&'a TreeNode) -> Option<&'a T>,
    ) -> Result<&'a T> {
        let node = self
            .nodes
            .get(&key)
            .ok_or_else(|| Error::Other(format!("{key} is not in the tree")))?;
        pick(node).ok_or_else(|| Error::NodeKindMismatch {
            key: key.to_string(),
            expected: expected.name(),
            actual: node.kind().name(),
        })
    }

    /// Strict narrowing; a mismatch is a bug in the caller
    pub fn expect_folder(&self, key: NodeKey) -> Result<&TaskFolder> {
        self.narrow(key, NodeKind::Folder, |node| match node {
            TreeNode::Folder(folder) => Some(folder),
            _ => None,
        })
    }

    pub fn expect_file(&self, key: NodeKey) -> Result<&TaskFile> {
        self.narrow(key, NodeKind::File, |node| match node {
            TreeNode::File(file) => Some(file),
            _ => None,
        })
    }

    pub fn expect_item(&self, key: NodeKey) -> Result<&TaskItem> {
        self.narrow(key, NodeKind::Item, |node| match node {
            TreeNode::Item(item) => Some(item),
            _ => None,
        })
    }

    pub fn children(&self, key: NodeKey) -> &[NodeKey] {
        self.nodes.get(&key).map(TreeNode::tree_nodes).unwrap_or(&[])
    }

    fn children_mut(&mut self, key: NodeKey) -> Option<&mut Vec<NodeKey>> {
        match self.nodes.get_mut(&key)? {
            TreeNode::Folder(folder) => Some(&mut folder.tree_nodes),
            TreeNode::File(file) => Some(&mut file.tree_nodes),
            TreeNode::Item(_) => None,
        }
    }

    pub fn parent(&self, key: NodeKey) -> Option<NodeKey> {
        self.nodes.get(&key).and_then(PositionedNode::parent)
    }

    /// Top-level folder containing `key`
    pub fn folder_of(&self, key: NodeKey) -> Option<NodeKey> {
        let mut current = key;
        loop {
            match self.nodes.get(&current)? {
                TreeNode::Folder(_) => return Some(current),
                node => current = node.parent()?,
            }
        }
    }

    /// Moves `child` under `parent` at `index` (append when `None`).
    ///
    /// Items take the parent's group level. A file inserted at a non-zero
    /// index is re-keyed into the parent's group.
    pub fn add_child(&mut self, parent: NodeKey, child: NodeKey, index: Option<usize>) -> NodeKey {
        if parent == child || !self.contains(child) {
            return child;
        }
        let Some(parent_node) = self.nodes.get(&parent) else {
            return child;
        };
        let parent_level = parent_node.group_level();
        let parent_id = parent_node.id().to_string();

        self.detach(child);

        let Some(children) = self.children_mut(parent) else {
            return child;
        };
        let position = index.map_or(children.len(), |i| i.min(children.len()));
        children.insert(position, child);

        match self.nodes.get_mut(&child) {
            Some(TreeNode::Item(item)) => {
                item.parent = Some(parent);
                item.group_level = parent_level;
            }
            Some(TreeNode::File(file)) => {
                file.parent = Some(parent);
                if matches!(index, Some(i) if i > 0) {
                    file.reassign_group(Some(parent_id));
                }
            }
            _ => {}
        }
        child
    }

    /// Unlinks `key` from its parent (or from the folder list) without
    /// dropping it. Returns the index it was removed from.
    pub fn detach(&mut self, key: NodeKey) -> Option<usize> {
        match self.nodes.get(&key)? {
            TreeNode::Folder(_) => {
                let index = self.folders.iter().position(|k| *k == key)?;
                self.folders.remove(index);
                Some(index)
            }
            node => {
                let parent = node.parent()?;
                let siblings = self.children_mut(parent)?;
                let index = siblings.iter().position(|k| *k == key);
                if let Some(i) = index {
                    siblings.remove(i);
                }
                match self.nodes.get_mut(&key) {
                    Some(TreeNode::File(file)) => file.parent = None,
                    Some(TreeNode::Item(item)) => item.parent = None,
                    _ => {}
                }
                index
            }
        }
    }

    /// Keys of `key` and everything below it, parents before children
    pub fn descendants(&self, key: NodeKey) -> Vec<NodeKey> {
        let mut out = Vec::new();
        let mut stack = vec![key];
        while let Some(current) = stack.pop() {
            if !self.contains(current) {
                continue;
            }
            out.push(current);
            stack.extend(self.children(current).iter().rev());
        }
        out
    }

    /// Detaches and drops `key` with its subtree, returning the dropped nodes
    pub fn remove(&mut self, key: NodeKey) -> Vec<TreeNode> {
        if !self.contains(key) {
            return Vec::new();
        }
        self.detach(key);
        self.descendants(key)
            .into_iter()
            .filter_map(|k| self.nodes.remove(&k))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        running::RunningTaskRegistry,
        tree::{icon::IconResolver, node::FolderKind},
        types::Task,
    };
    use std::rc::Rc;

    fn setup() -> (Forest, NodeKey, NodeKey, NodeKey) {
        let icons = IconResolver::default();
        let registry = RunningTaskRegistry::new();
        let mut forest = Forest::new();
        let folder = TaskFolder::new(FolderKind::Workspace, "app", None, true);
        let task = Rc::new(Task::new("build", "npm").in_workspace("app", "/ws/app"));
        let file = TaskFile::container(&folder, task.clone(), &icons);
        let folder_key = forest.insert_folder(folder);
        let file_key = forest.insert(TreeNode::File(file));
        forest.add_child(folder_key, file_key, None);
        let item = TaskItem::new(file_key, task, "npm", &registry, &icons);
        let item_key = forest.insert(TreeNode::Item(item));
        forest.add_child(file_key, item_key, None);
        (forest, folder_key, file_key, item_key)
    }

    #[test]
    fn test_add_child_moves_between_parents() {
        let (mut forest, folder_key, file_key, item_key) = setup();
        assert_eq!(forest.parent(item_key), Some(file_key));

        let group = TaskFile::group("app", forest.item(item_key).unwrap().task.clone(), "b", "", "b", 1, None);
        let group_key = forest.insert(TreeNode::File(group));
        forest.add_child(file_key, group_key, None);
        forest.add_child(group_key, item_key, None);

        assert_eq!(forest.children(file_key), &[group_key]);
        assert_eq!(forest.children(group_key), &[item_key]);
        assert_eq!(forest.item(item_key).unwrap().group_level, 1);
        assert_eq!(forest.folder_of(item_key), Some(folder_key));
    }

    #[test]
    fn test_file_inserted_at_nonzero_index_is_rekeyed() {
        let (mut forest, folder_key, file_key, _) = setup();
        let task = forest.file(file_key).unwrap().task.clone();
        let group = TaskFile::group("app", task.clone(), "npm", "", "", 0, None);
        let original_id = group.id.clone();
        let group_key = forest.insert(TreeNode::File(group));
        forest.add_child(folder_key, group_key, Some(1));

        let folder_id = forest.folder(folder_key).unwrap().id.clone();
        let group = forest.file(group_key).unwrap();
        assert_eq!(group.group_id.as_deref(), Some(folder_id.as_str()));
        assert_ne!(group.id, original_id);

        let other = TaskFile::group("app", task, "npm", "", "", 0, None);
        let other_key = forest.insert(TreeNode::File(other));
        forest.add_child(folder_key, other_key, Some(0));
        assert_eq!(forest.file(other_key).unwrap().id, original_id);
    }

    #[test]
    fn test_remove_drops_subtree() {
        let (mut forest, folder_key, file_key, item_key) = setup();
        let removed = forest.remove(file_key);

        assert_eq!(removed.len(), 2);
        assert!(!forest.contains(item_key));
        assert!(forest.children(folder_key).is_empty());
        assert!(forest.remove(file_key).is_empty());
    }

    #[test]
    fn test_expect_reports_kind_mismatch() {
        let (forest, folder_key, _, item_key) = setup();
        assert!(forest.expect_item(item_key).is_ok());
        let err = forest.expect_file(folder_key).unwrap_err();
        assert!(matches!(
            err,
            Error::NodeKindMismatch { expected: "file", actual: "folder", .. }
        ));
    }
}
