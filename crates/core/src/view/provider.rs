//! Data provider consumed by the hosting tree widget

use crate::{
    config::{TreeConfig, TreeState},
    running::{RunningTaskRegistry, RunningTasks},
    tree::{
        BuildContext, FolderKind, Forest, IconResolver, LabelSorter, NodeKey, PositionedNode,
        TaskItemRef, TaskSorter, TaskTreeBuilder, TreeNode, identity,
    },
    types::Task,
    view::{
        item::TreeItem,
        queue::{GLOBAL_REFRESH_ID, RefreshAction, RefreshQueue, Visibility},
    },
};
use std::collections::BTreeMap;
use std::rc::Rc;
use std::sync::mpsc::{Receiver, Sender, channel};
use tracing::debug;

/// Notifications for the host widget
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TreeEvent {
    /// Re-query `node`, or the whole tree when `None`
    Changed(Option<NodeKey>),
    /// The refreshes fired on becoming visible have been applied
    Loaded,
}

/// Everything the tree reads from outside, passed in rather than looked up
pub struct TreeServices {
    pub config: TreeConfig,
    pub state: TreeState,
    pub icons: IconResolver,
    pub sorter: Box<dyn TaskSorter>,
    pub running: Rc<dyn RunningTasks>,
}

impl TreeServices {
    pub fn new(config: TreeConfig, state: TreeState) -> Self {
        Self {
            icons: IconResolver::new(config.icons_dir.clone()),
            sorter: Box::new(LabelSorter),
            running: Rc::new(RunningTaskRegistry::new()),
            config,
            state,
        }
    }

    pub fn with_running(mut self, running: Rc<dyn RunningTasks>) -> Self {
        self.running = running;
        self
    }

    pub fn with_sorter(mut self, sorter: Box<dyn TaskSorter>) -> Self {
        self.sorter = sorter;
        self
    }

    fn build_context(&self) -> BuildContext<'_> {
        BuildContext {
            config: &self.config,
            state: &self.state,
            icons: &self.icons,
            sorter: self.sorter.as_ref(),
            running: self.running.as_ref(),
        }
    }
}

pub struct TaskTree {
    builder: TaskTreeBuilder,
    services: TreeServices,
    tasks: Vec<Rc<Task>>,
    queue: RefreshQueue,
    events: Option<Sender<TreeEvent>>,
}

impl TaskTree {
    pub fn new(services: TreeServices) -> Self {
        Self {
            builder: TaskTreeBuilder::new(),
            services,
            tasks: Vec::new(),
            queue: RefreshQueue::new(),
            events: None,
        }
    }

    /// Starts a new event stream, replacing any previous subscriber
    pub fn subscribe(&mut self) -> Receiver<TreeEvent> {
        let (tx, rx) = channel();
        self.events = Some(tx);
        rx
    }

    pub fn config(&self) -> &TreeConfig {
        &self.services.config
    }

    pub fn state(&self) -> &TreeState {
        &self.services.state
    }

    pub fn forest(&self) -> &Forest {
        self.builder.forest()
    }

    pub fn builder(&self) -> &TaskTreeBuilder {
        &self.builder
    }

    pub fn visibility(&self) -> Visibility {
        self.queue.visibility()
    }

    pub fn tasks(&self) -> &[Rc<Task>] {
        &self.tasks
    }

    /// Replaces the whole task list and rebuilds everything
    pub fn load(&mut self, tasks: Vec<Task>) {
        self.tasks = tasks.into_iter().map(Rc::new).collect();
        self.builder
            .build(&self.services.build_context(), &self.tasks, None);
        self.fire_tree_refresh_event(None);
    }

    /// Replaces the tasks of one source and rebuilds only that source
    pub fn update_source(&mut self, source: &str, tasks: Vec<Task>) {
        let before = self.forest().folders().to_vec();
        // folders losing every node of the source still need a refresh
        let mut affected = self.folders_holding(source);

        self.tasks.retain(|task| task.source != source);
        self.tasks.extend(
            tasks
                .into_iter()
                .filter(|task| task.source == source)
                .map(Rc::new),
        );
        self.builder
            .build(&self.services.build_context(), &self.tasks, Some(source));

        if before != self.forest().folders() {
            debug!("Folder set changed while rebuilding '{}'", source);
            self.fire_tree_refresh_event(None);
            return;
        }

        for folder in self.folders_holding(source) {
            if !affected.contains(&folder) {
                affected.push(folder);
            }
        }
        let order = self.forest().folders().to_vec();
        affected.sort_by_key(|folder| order.iter().position(|k| k == folder));
        for folder in affected {
            self.fire_tree_refresh_event(Some(folder));
        }
    }

    /// Special folders plus every folder with a direct child of `source`
    fn folders_holding(&self, source: &str) -> Vec<NodeKey> {
        let forest = self.forest();
        forest
            .folders()
            .iter()
            .copied()
            .filter(|folder| {
                forest.folder(*folder).is_some_and(|f| f.is_special())
                    || forest.children(*folder).iter().any(|child| {
                        forest
                            .get(*child)
                            .and_then(TreeNode::task_source)
                            .is_some_and(|s| s == source)
                    })
            })
            .collect()
    }

    pub fn remove_workspace_folder(&mut self, name: &str) -> bool {
        let removed = self
            .builder
            .remove_folder(&self.services.build_context(), name);
        if removed {
            self.tasks.retain(|task| task.scope_name() != Some(name));
            self.fire_tree_refresh_event(None);
        }
        removed
    }

    /// Children of `node`, or the top-level folders for the root query
    pub fn get_children(&self, node: Option<NodeKey>) -> Vec<NodeKey> {
        match node {
            None => self.forest().folders().to_vec(),
            Some(key) => self.forest().children(key).to_vec(),
        }
    }

    /// Items inside a special folder report the folder as their parent
    pub fn get_parent(&self, node: NodeKey) -> Option<NodeKey> {
        let forest = self.forest();
        match forest.get(node)? {
            TreeNode::Folder(_) => None,
            TreeNode::File(file) => file.parent,
            TreeNode::Item(item) => {
                let folder = forest.folder_of(node);
                match folder {
                    Some(f) if forest.folder(f).is_some_and(|f| f.is_special()) => Some(f),
                    _ => item.parent,
                }
            }
        }
    }

    /// Host-shaped snapshot of `node`; items recompute their running state
    pub fn get_tree_item(&mut self, node: NodeKey) -> Option<TreeItem> {
        let services = &self.services;
        match self.builder.forest_mut().get_mut(node)? {
            TreeNode::Folder(folder) => Some(TreeItem::from_folder(node, folder)),
            TreeNode::File(file) => Some(TreeItem::from_file(node, file)),
            TreeNode::Item(item) => {
                let favorite = services
                    .state
                    .is_favorite(&identity::task_item_id(&item.task));
                item.refresh_state(
                    services.running.as_ref(),
                    &services.icons,
                    services.config.animated_icons,
                    favorite,
                );
                Some(TreeItem::from_item(node, item))
            }
        }
    }

    pub fn find_task_item(&self, reference: &TaskItemRef) -> Option<NodeKey> {
        self.builder.find_task_item(reference)
    }

    pub fn task_counts(&self) -> BTreeMap<String, usize> {
        self.builder.task_counts()
    }

    /// Refreshes `node`, or the whole tree, subject to view visibility
    pub fn fire_tree_refresh_event(&mut self, node: Option<NodeKey>) {
        let id = node
            .and_then(|key| self.forest().get(key))
            .map(|n| n.id().to_string())
            .unwrap_or_else(|| GLOBAL_REFRESH_ID.to_string());
        if let RefreshAction::Fire(target) = self.queue.request(&id, node) {
            self.send(TreeEvent::Changed(target));
        }
    }

    pub fn on_visibility_changed(&mut self, visible: bool, data_changed: bool) {
        for target in self.queue.set_visible(visible, data_changed) {
            if let Some(key) = target {
                if !self.forest().contains(key) {
                    debug!("Skipping queued refresh of removed {}", key);
                    continue;
                }
            }
            self.send(TreeEvent::Changed(target));
        }
    }

    /// Delivers deferred notifications; call once the host has applied the
    /// refreshes from the previous visibility change
    pub fn tick(&mut self) {
        if self.queue.take_loaded() {
            self.send(TreeEvent::Loaded);
        }
    }

    /// Records a user expand/collapse so rebuilt folders keep it
    pub fn set_folder_expanded(&mut self, node: NodeKey, expanded: bool) -> bool {
        let Some(folder) = self.builder.forest_mut().folder_mut(node) else {
            return false;
        };
        folder.expanded = expanded;
        let label = folder.label.clone();
        self.services.state.set_folder_expanded(&label, expanded);
        true
    }

    /// Base item id of `node`, resolving special-folder copies to the original
    fn task_id(&self, node: NodeKey) -> Option<String> {
        self.forest()
            .item(node)
            .map(|item| identity::task_item_id(&item.task))
    }

    pub fn add_favorite(&mut self, node: NodeKey) -> bool {
        let Some(id) = self.task_id(node) else {
            return false;
        };
        let added = self.services.state.add_favorite(&id);
        if added {
            self.refresh_special_folder(FolderKind::Favorites);
        }
        added
    }

    pub fn remove_favorite(&mut self, node: NodeKey) -> bool {
        let Some(id) = self.task_id(node) else {
            return false;
        };
        let removed = self.services.state.remove_favorite(&id);
        if removed {
            self.refresh_special_folder(FolderKind::Favorites);
        }
        removed
    }

    /// Returns whether the task is a favorite afterwards
    pub fn toggle_favorite(&mut self, node: NodeKey) -> bool {
        let Some(id) = self.task_id(node) else {
            return false;
        };
        if self.services.state.is_favorite(&id) {
            self.remove_favorite(node);
            false
        } else {
            self.add_favorite(node)
        }
    }

    /// Pushes the task onto the Last Tasks list
    pub fn record_task_run(&mut self, node: NodeKey) -> bool {
        let Some(id) = self.task_id(node) else {
            return false;
        };
        let max = self.services.config.special_folders.num_last_tasks;
        self.services.state.push_last_task(&id, max);
        self.refresh_special_folder(FolderKind::LastTasks);
        true
    }

    pub fn clear_special_folder(&mut self, kind: FolderKind) {
        match kind {
            FolderKind::Favorites => self.services.state.favorites.clear(),
            FolderKind::LastTasks => self.services.state.last_tasks.clear(),
            FolderKind::Workspace | FolderKind::User => return,
        }
        self.refresh_special_folder(kind);
    }

    fn refresh_special_folder(&mut self, kind: FolderKind) {
        self.builder
            .populate_special_folders(&self.services.build_context());
        let folder = self.builder.special_folder(kind);
        if folder.is_some() {
            self.fire_tree_refresh_event(folder);
        }
    }

    /// Refreshes every node showing `task` after it started or stopped
    pub fn on_task_status_changed(&mut self, task: &Task) {
        let id = identity::task_item_id(task);
        let forest = self.forest();
        let targets: Vec<NodeKey> = forest
            .folders()
            .iter()
            .flat_map(|folder| forest.descendants(*folder))
            .filter(|key| {
                forest
                    .item(*key)
                    .is_some_and(|item| identity::task_item_id(&item.task) == id)
            })
            .collect();
        for target in targets {
            self.fire_tree_refresh_event(Some(target));
        }
    }

    fn send(&self, event: TreeEvent) {
        if let Some(tx) = &self.events {
            let _ = tx.send(event);
        }
    }
}
