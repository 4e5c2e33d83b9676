//! Tree node model: folders, task files (containers and groups) and task items

use crate::{
    running::{RunningTask, RunningTasks},
    tree::{
        icon::{FOLDER_ICON, GROUP_ICON, Icon, IconResolver},
        identity, label,
    },
    types::{SourceKind, Task, is_script_type},
};
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;
use std::rc::Rc;

pub const USER_TASKS_LABEL: &str = "User Tasks";
pub const FAVORITES_LABEL: &str = "Favorites";
pub const LAST_TASKS_LABEL: &str = "Last Tasks";

/// Handle of a node in a [`Forest`](super::Forest). Keys are never reused,
/// so a handle to a removed node simply stops resolving.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct NodeKey(pub(crate) u64);

impl fmt::Display for NodeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "node({})", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Folder,
    File,
    Item,
}

impl NodeKind {
    pub fn name(self) -> &'static str {
        match self {
            NodeKind::Folder => "folder",
            NodeKind::File => "file",
            NodeKind::Item => "item",
        }
    }
}

/// What every node in the tree exposes regardless of its kind
pub trait PositionedNode {
    fn id(&self) -> &str;
    fn label(&self) -> &str;
    fn parent(&self) -> Option<NodeKey>;
    fn kind(&self) -> NodeKind;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FolderKind {
    Workspace,
    /// Tasks without a workspace folder
    User,
    Favorites,
    LastTasks,
}

impl FolderKind {
    /// Curated folders are populated from state, never pruned and never
    /// cleared by a rebuild
    pub fn is_special(self) -> bool {
        matches!(self, FolderKind::Favorites | FolderKind::LastTasks)
    }

    pub(crate) fn sort_rank(self) -> u8 {
        match self {
            FolderKind::LastTasks => 0,
            FolderKind::Favorites => 1,
            FolderKind::User => 2,
            FolderKind::Workspace => 3,
        }
    }

    pub fn default_label(self) -> Option<&'static str> {
        match self {
            FolderKind::Workspace => None,
            FolderKind::User => Some(USER_TASKS_LABEL),
            FolderKind::Favorites => Some(FAVORITES_LABEL),
            FolderKind::LastTasks => Some(LAST_TASKS_LABEL),
        }
    }

    pub fn icon(self) -> Icon {
        match self {
            FolderKind::Workspace => Icon::theme(FOLDER_ICON),
            FolderKind::User => Icon::theme("account"),
            FolderKind::Favorites => Icon::theme("star"),
            FolderKind::LastTasks => Icon::theme("history"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct TaskFolder {
    pub id: String,
    pub label: String,
    pub kind: FolderKind,
    pub workspace_folder: Option<PathBuf>,
    pub expanded: bool,
    pub tree_nodes: Vec<NodeKey>,
}

impl TaskFolder {
    pub fn new(
        kind: FolderKind,
        label: impl Into<String>,
        workspace_folder: Option<PathBuf>,
        expanded: bool,
    ) -> Self {
        let label = label.into();
        Self {
            id: identity::folder_id(&label),
            label,
            kind,
            workspace_folder,
            expanded,
            tree_nodes: Vec::new(),
        }
    }

    pub fn special(kind: FolderKind, expanded: bool) -> Self {
        let label = kind.default_label().unwrap_or(USER_TASKS_LABEL);
        Self::new(kind, label, None, expanded)
    }

    pub fn is_special(&self) -> bool {
        self.kind.is_special()
    }
}

/// A task-source container holding items, or a synthetic group node
#[derive(Debug, Clone)]
pub struct TaskFile {
    pub id: String,
    pub label: String,
    pub parent: Option<NodeKey>,
    pub folder_label: String,
    /// Representative task; for groups the first task that formed the group
    pub task: Rc<Task>,
    pub file_name: String,
    pub relative_path: String,
    pub task_source: String,
    /// Location part of the identity: absolute path for scripts, else
    /// `relative_path/file_name`
    pub path_key: String,
    /// Separator prefix this group stands for, empty for containers
    pub prefix: String,
    pub group_id: Option<String>,
    pub group_level: usize,
    pub is_group: bool,
    pub is_user: bool,
    pub icon: Icon,
    pub tree_nodes: Vec<NodeKey>,
}

impl TaskFile {
    /// Concrete container for the tasks of one task file
    pub fn container(folder: &TaskFolder, task: Rc<Task>, icons: &IconResolver) -> Self {
        let relative_path = task.relative_path();
        let file_name = task.file_name();
        let path_key = if is_script_type(&task.source) {
            task.absolute_path().to_string_lossy().to_string()
        } else {
            format!("{}/{}", relative_path.trim_end_matches('/'), file_name)
        };
        let id = identity::task_file_id(&folder.label, &task.source, &path_key, "", 0, None);

        Self {
            id,
            label: label::file_label(&task),
            parent: None,
            folder_label: folder.label.clone(),
            file_name,
            relative_path,
            task_source: task.source.clone(),
            path_key,
            prefix: String::new(),
            group_id: None,
            group_level: 0,
            is_group: false,
            is_user: task.is_user(),
            icon: icons.file_icon(&task),
            tree_nodes: Vec::new(),
            task,
        }
    }

    /// Synthetic group labelled with its raw group key
    pub fn group(
        folder_label: &str,
        task: Rc<Task>,
        group_label: &str,
        path_key: &str,
        prefix: &str,
        group_level: usize,
        group_id: Option<String>,
    ) -> Self {
        let id = identity::task_file_id(
            folder_label,
            &task.source,
            path_key,
            prefix,
            group_level,
            group_id.as_deref(),
        );

        Self {
            id,
            label: group_label.to_string(),
            parent: None,
            folder_label: folder_label.to_string(),
            file_name: task.file_name(),
            relative_path: task.relative_path(),
            task_source: task.source.clone(),
            path_key: path_key.to_string(),
            prefix: prefix.to_string(),
            group_id,
            group_level,
            is_group: true,
            is_user: task.is_user(),
            icon: Icon::theme(GROUP_ICON),
            tree_nodes: Vec::new(),
            task,
        }
    }

    pub(crate) fn reassign_group(&mut self, group_id: Option<String>) {
        self.id = identity::task_file_id(
            &self.folder_label,
            &self.task_source,
            &self.path_key,
            &self.prefix,
            self.group_level,
            group_id.as_deref(),
        );
        self.group_id = group_id;
    }
}

/// Leaf node for one runnable task
#[derive(Debug, Clone)]
pub struct TaskItem {
    pub id: String,
    pub label: String,
    pub parent: Option<NodeKey>,
    /// Container the item was built into; for special-folder copies this is
    /// the original's container, not the parent
    pub task_file: NodeKey,
    pub task: Rc<Task>,
    pub uri: PathBuf,
    pub task_source: String,
    pub group_level: usize,
    pub tooltip: String,
    pub paused: bool,
    pub execution: Option<RunningTask>,
    pub context_value: String,
    pub icon: Icon,
}

impl TaskItem {
    pub fn new(
        task_file: NodeKey,
        task: Rc<Task>,
        package_manager: &str,
        running: &dyn RunningTasks,
        icons: &IconResolver,
    ) -> Self {
        let mut item = Self {
            id: identity::task_item_id(&task),
            label: label::item_label(&task),
            parent: None,
            task_file,
            uri: task.absolute_path(),
            task_source: task.source.clone(),
            group_level: 0,
            tooltip: label::item_tooltip(&task, package_manager),
            paused: false,
            execution: None,
            context_value: String::new(),
            icon: icons.item_icon(false, false),
            task,
        };
        item.refresh_state(running, icons, false, false);
        item
    }

    /// Copy of `item` shown inside a special folder
    pub fn special_copy(item: &TaskItem, folder_label: &str, workspace_label: &str) -> Self {
        let mut copy = item.clone();
        copy.id = format!("{folder_label}:{}", item.id);
        copy.label = label::special_item_label(
            &label::item_label(&item.task),
            workspace_label,
            &item.task_source,
        );
        copy.parent = None;
        copy.group_level = 0;
        copy
    }

    pub fn is_running(&self) -> bool {
        self.execution.is_some()
    }

    /// Recomputes the running state, context value and icon
    pub fn refresh_state(
        &mut self,
        running: &dyn RunningTasks,
        icons: &IconResolver,
        animated: bool,
        favorite: bool,
    ) {
        self.execution = running
            .running()
            .into_iter()
            .find(|handle| handle.matches(&self.task));
        if self.execution.is_none() {
            self.paused = false;
        }

        let mut context = SourceKind::of(&self.task_source).context_prefix().to_string();
        if self.is_running() {
            context.push_str("Running");
        }
        if favorite {
            context.push_str("Fav");
        }
        self.context_value = context;
        self.icon = icons.item_icon(self.is_running(), animated);
    }
}

#[derive(Debug, Clone)]
pub enum TreeNode {
    Folder(TaskFolder),
    File(TaskFile),
    Item(TaskItem),
}

impl PositionedNode for TaskFolder {
    fn id(&self) -> &str {
        &self.id
    }

    fn label(&self) -> &str {
        &self.label
    }

    fn parent(&self) -> Option<NodeKey> {
        None
    }

    fn kind(&self) -> NodeKind {
        NodeKind::Folder
    }
}

impl PositionedNode for TaskFile {
    fn id(&self) -> &str {
        &self.id
    }

    fn label(&self) -> &str {
        &self.label
    }

    fn parent(&self) -> Option<NodeKey> {
        self.parent
    }

    fn kind(&self) -> NodeKind {
        NodeKind::File
    }
}

impl PositionedNode for TaskItem {
    fn id(&self) -> &str {
        &self.id
    }

    fn label(&self) -> &str {
        &self.label
    }

    fn parent(&self) -> Option<NodeKey> {
        self.parent
    }

    fn kind(&self) -> NodeKind {
        NodeKind::Item
    }
}

impl PositionedNode for TreeNode {
    fn id(&self) -> &str {
        match self {
            TreeNode::Folder(n) => n.id(),
            TreeNode::File(n) => n.id(),
            TreeNode::Item(n) => n.id(),
        }
    }

    fn label(&self) -> &str {
        match self {
            TreeNode::Folder(n) => n.label(),
            TreeNode::File(n) => n.label(),
            TreeNode::Item(n) => n.label(),
        }
    }

    fn parent(&self) -> Option<NodeKey> {
        match self {
            TreeNode::Folder(n) => n.parent(),
            TreeNode::File(n) => n.parent(),
            TreeNode::Item(n) => n.parent(),
        }
    }

    fn kind(&self) -> NodeKind {
        match self {
            TreeNode::Folder(_) => NodeKind::Folder,
            TreeNode::File(_) => NodeKind::File,
            TreeNode::Item(_) => NodeKind::Item,
        }
    }
}

impl TreeNode {
    pub fn tree_nodes(&self) -> &[NodeKey] {
        match self {
            TreeNode::Folder(n) => &n.tree_nodes,
            TreeNode::File(n) => &n.tree_nodes,
            TreeNode::Item(_) => &[],
        }
    }

    pub fn task_source(&self) -> Option<&str> {
        match self {
            TreeNode::Folder(_) => None,
            TreeNode::File(n) => Some(&n.task_source),
            TreeNode::Item(n) => Some(&n.task_source),
        }
    }

    pub fn group_level(&self) -> usize {
        match self {
            TreeNode::Folder(_) => 0,
            TreeNode::File(n) => n.group_level,
            TreeNode::Item(n) => n.group_level,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::running::RunningTaskRegistry;

    fn folder() -> TaskFolder {
        TaskFolder::new(FolderKind::Workspace, "app", Some(PathBuf::from("/ws/app")), true)
    }

    #[test]
    fn test_container_identity_ignores_label_formatting() {
        let icons = IconResolver::default();
        let a = Rc::new(
            Task::new("build", "npm")
                .in_workspace("app", "/ws/app")
                .with_file("client", "package.json"),
        );
        let b = Rc::new(
            Task::new("test", "npm")
                .in_workspace("app", "/ws/app")
                .with_file("client/", "package.json"),
        );
        let file_a = TaskFile::container(&folder(), a, &icons);
        let file_b = TaskFile::container(&folder(), b, &icons);

        assert_eq!(file_a.id, file_b.id);
        assert_eq!(file_a.label, "npm (client)");
        assert!(!file_a.is_group);
        assert_eq!(file_a.group_level, 0);
    }

    #[test]
    fn test_script_container_keyed_by_absolute_path() {
        let icons = IconResolver::default();
        let a = Rc::new(
            Task::new("deploy.sh", "bash")
                .in_workspace("app", "/ws/app")
                .with_file("scripts", "deploy.sh"),
        );
        let b = Rc::new(
            Task::new("clean.sh", "bash")
                .in_workspace("app", "/ws/app")
                .with_file("scripts", "clean.sh"),
        );
        let file_a = TaskFile::container(&folder(), a, &icons);
        let file_b = TaskFile::container(&folder(), b, &icons);
        assert_ne!(file_a.id, file_b.id);
        assert_eq!(file_a.path_key, "/ws/app/scripts/deploy.sh");
    }

    #[test]
    fn test_item_context_reflects_running_and_favorite() {
        let icons = IconResolver::default();
        let registry = RunningTaskRegistry::new();
        let task = Rc::new(
            Task::new("build", "npm")
                .in_workspace("app", "/ws/app")
                .with_file("", "package.json"),
        );
        let mut item = TaskItem::new(NodeKey(1), task.clone(), "npm", &registry, &icons);
        assert_eq!(item.context_value, "script");
        assert_eq!(item.icon, Icon::theme("wrench"));

        registry.start(&task);
        item.refresh_state(&registry, &icons, true, true);
        assert!(item.is_running());
        assert_eq!(item.context_value, "scriptRunningFav");
        assert_eq!(item.icon, Icon::theme("loading~spin"));

        registry.stop(&task);
        item.refresh_state(&registry, &icons, true, false);
        assert!(!item.is_running());
        assert_eq!(item.context_value, "script");
    }

    #[test]
    fn test_special_copy_has_prefixed_id() {
        let icons = IconResolver::default();
        let registry = RunningTaskRegistry::new();
        let task = Rc::new(
            Task::new("lint", "gulp")
                .in_workspace("app", "/ws/app")
                .with_file("", "gulpfile.js"),
        );
        let item = TaskItem::new(NodeKey(1), task, "npm", &registry, &icons);
        let copy = TaskItem::special_copy(&item, FAVORITES_LABEL, "app");

        assert_eq!(copy.id, format!("Favorites:{}", item.id));
        assert_eq!(copy.label, "lint (app - gulp)");
        assert_eq!(copy.task_file, item.task_file);
    }
}
