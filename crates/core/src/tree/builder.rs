//! Materializes the node forest from the flat task list

use crate::{
    config::{TreeConfig, TreeState},
    running::RunningTasks,
    tree::{
        forest::Forest,
        grouper::TaskTreeGrouper,
        icon::IconResolver,
        identity,
        node::{FolderKind, NodeKey, TaskFile, TaskFolder, TaskItem, TreeNode, USER_TASKS_LABEL},
        sorter::{TaskSorter, sort_children, sort_folders},
    },
    types::{Task, TaskScope, is_script_type},
};
use std::collections::{BTreeMap, HashMap};
use std::rc::Rc;
use tracing::{debug, warn};

/// Collaborators a build pass reads from
pub struct BuildContext<'a> {
    pub config: &'a TreeConfig,
    pub state: &'a TreeState,
    pub icons: &'a IconResolver,
    pub sorter: &'a dyn TaskSorter,
    pub running: &'a dyn RunningTasks,
}

#[derive(Debug, Default)]
pub struct TaskTreeBuilder {
    pub(crate) forest: Forest,
    /// Item id to live task item, kept in step with the forest
    pub(crate) task_map: HashMap<String, NodeKey>,
    /// Folder label to folder node
    pub(crate) folder_index: HashMap<String, NodeKey>,
}

impl TaskTreeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn forest(&self) -> &Forest {
        &self.forest
    }

    pub fn forest_mut(&mut self) -> &mut Forest {
        &mut self.forest
    }

    pub fn task_map(&self) -> &HashMap<String, NodeKey> {
        &self.task_map
    }

    pub fn folder(&self, label: &str) -> Option<NodeKey> {
        self.folder_index.get(label).copied()
    }

    /// Rebuilds the forest from `tasks`. With `source`, only that source's
    /// nodes are invalidated and rebuilt and tasks of other sources are
    /// ignored.
    pub fn build(&mut self, ctx: &BuildContext<'_>, tasks: &[Rc<Task>], source: Option<&str>) {
        debug!(
            "build: {} tasks, source filter {:?}",
            tasks.len(),
            source
        );
        self.invalidate(source);

        let mut containers: HashMap<String, NodeKey> = HashMap::new();
        for task in tasks {
            if source.is_some_and(|s| task.source != s) || task.is_install_task() {
                continue;
            }
            let id = identity::task_item_id(task);
            if self.task_map.contains_key(&id) {
                debug!("Skipping duplicate task '{}' ({})", task.name, task.source);
                continue;
            }

            let folder = self.folder_for(ctx, task);
            let container = self.container_for(ctx, folder, task, &mut containers);
            let item = TaskItem::new(
                container,
                task.clone(),
                &ctx.config.package_manager,
                ctx.running,
                ctx.icons,
            );
            let key = self.forest.insert(TreeNode::Item(item));
            self.forest.add_child(container, key, None);
            self.task_map.insert(id, key);
        }

        self.prune();

        sort_folders(&mut self.forest);
        let targets = self.group_targets(source);
        for &folder in &targets {
            sort_children(&mut self.forest, folder, ctx.sorter);
        }
        for &container in containers.values() {
            sort_children(&mut self.forest, container, ctx.sorter);
        }

        TaskTreeGrouper::new(&ctx.config.grouping).group(&mut self.forest, &targets, source);
        sort_folders(&mut self.forest);

        self.populate_special_folders(ctx);
        debug!(
            "build complete: {} folders, {} task items",
            self.forest.folders().len(),
            self.task_map.len()
        );
    }

    /// Destroys a workspace folder with everything in it
    pub fn remove_folder(&mut self, ctx: &BuildContext<'_>, label: &str) -> bool {
        let Some(folder) = self.folder_index.remove(label) else {
            return false;
        };
        self.forest.remove(folder);
        let forest = &self.forest;
        self.task_map.retain(|_, key| forest.contains(*key));
        self.populate_special_folders(ctx);
        true
    }

    /// Number of live task items per source
    pub fn task_counts(&self) -> BTreeMap<String, usize> {
        let mut counts = BTreeMap::new();
        for key in self.task_map.values() {
            if let Some(item) = self.forest.item(*key) {
                *counts.entry(item.task_source.clone()).or_insert(0) += 1;
            }
        }
        counts
    }

    fn invalidate(&mut self, source: Option<&str>) {
        match source {
            None => self.task_map.clear(),
            Some(source) => {
                let forest = &self.forest;
                self.task_map
                    .retain(|_, key| forest.item(*key).is_some_and(|item| item.task_source != source));
            }
        }

        for folder in self.forest.folders().to_vec() {
            if self.forest.folder(folder).is_none_or(TaskFolder::is_special) {
                continue;
            }
            for child in self.forest.children(folder).to_vec() {
                let matches = match source {
                    None => true,
                    Some(source) => self
                        .forest
                        .get(child)
                        .and_then(TreeNode::task_source)
                        .is_some_and(|s| s == source),
                };
                if matches {
                    self.forest.remove(child);
                }
            }
        }
    }

    fn folder_for(&mut self, ctx: &BuildContext<'_>, task: &Task) -> NodeKey {
        let (kind, label, path) = match &task.scope {
            Some(TaskScope::Workspace { name, path }) if !name.is_empty() => {
                (FolderKind::Workspace, name.clone(), Some(path.clone()))
            }
            Some(TaskScope::User) => (FolderKind::User, USER_TASKS_LABEL.to_string(), None),
            _ => {
                warn!(
                    "Task '{}' ({}) has no usable scope, treating it as a user task",
                    task.name, task.source
                );
                (FolderKind::User, USER_TASKS_LABEL.to_string(), None)
            }
        };

        if let Some(key) = self.folder_index.get(&label) {
            if self.forest.contains(*key) {
                return *key;
            }
        }

        let expanded = ctx.state.is_folder_expanded(&label);
        let key = self
            .forest
            .insert_folder(TaskFolder::new(kind, label.clone(), path, expanded));
        debug!("Created folder '{}'", label);
        self.folder_index.insert(label, key);
        key
    }

    /// One container per script file, or per task file for other sources
    fn container_for(
        &mut self,
        ctx: &BuildContext<'_>,
        folder: NodeKey,
        task: &Rc<Task>,
        containers: &mut HashMap<String, NodeKey>,
    ) -> NodeKey {
        let Some(folder_node) = self.forest.folder(folder) else {
            return folder;
        };
        let container_key = if is_script_type(&task.source) {
            format!(
                "{}|{}|{}",
                folder_node.label,
                task.absolute_path().display(),
                task.source
            )
        } else {
            format!(
                "{}|{}|{}|{}",
                folder_node.label,
                task.source,
                identity::normalize_path(&task.relative_path()),
                task.file_name()
            )
        };

        if let Some(key) = containers.get(&container_key) {
            return *key;
        }
        let file = TaskFile::container(folder_node, task.clone(), ctx.icons);
        let key = self.forest.insert(TreeNode::File(file));
        self.forest.add_child(folder, key, None);
        containers.insert(container_key, key);
        key
    }

    /// Removes non-special folders left without children
    fn prune(&mut self) {
        for folder in self.forest.folders().to_vec() {
            let empty = self
                .forest
                .folder(folder)
                .is_some_and(|f| !f.is_special() && f.tree_nodes.is_empty());
            if empty {
                debug!("Pruning empty folder {}", folder);
                self.forest.remove(folder);
                self.folder_index.retain(|_, key| *key != folder);
            }
        }
    }

    /// Non-special folders, restricted to those holding `source` nodes
    fn group_targets(&self, source: Option<&str>) -> Vec<NodeKey> {
        self.forest
            .folders()
            .iter()
            .copied()
            .filter(|key| self.forest.folder(*key).is_some_and(|f| !f.is_special()))
            .filter(|key| match source {
                None => true,
                Some(source) => self.forest.children(*key).iter().any(|child| {
                    self.forest
                        .get(*child)
                        .and_then(TreeNode::task_source)
                        .is_some_and(|s| s == source)
                }),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        running::RunningTaskRegistry,
        tree::{node::PositionedNode, sorter::LabelSorter},
    };

    struct Env {
        config: TreeConfig,
        state: TreeState,
        icons: IconResolver,
        sorter: LabelSorter,
        running: RunningTaskRegistry,
    }

    impl Env {
        fn new() -> Self {
            let mut config = TreeConfig::default();
            config.special_folders.show_favorites = false;
            config.special_folders.show_last_tasks = false;
            Self {
                config,
                state: TreeState::default(),
                icons: IconResolver::default(),
                sorter: LabelSorter,
                running: RunningTaskRegistry::new(),
            }
        }

        fn ctx(&self) -> BuildContext<'_> {
            BuildContext {
                config: &self.config,
                state: &self.state,
                icons: &self.icons,
                sorter: &self.sorter,
                running: &self.running,
            }
        }
    }

    fn npm(name: &str, folder: &str) -> Rc<Task> {
        Rc::new(
            Task::new(name, "npm")
                .in_workspace(folder, format!("/ws/{folder}"))
                .with_file("", "package.json"),
        )
    }

    fn labels(builder: &TaskTreeBuilder, keys: &[NodeKey]) -> Vec<String> {
        keys.iter()
            .map(|k| builder.forest().get(*k).unwrap().label().to_string())
            .collect()
    }

    #[test]
    fn test_build_groups_by_scope_and_source() {
        let env = Env::new();
        let mut builder = TaskTreeBuilder::new();
        let tasks = vec![
            npm("test", "app"),
            npm("build", "app"),
            npm("install", "app"),
            npm("start", "lib"),
            Rc::new(Task::new("lint", "gulp").in_workspace("app", "/ws/app").with_file("", "gulpfile.js")),
        ];
        builder.build(&env.ctx(), &tasks, None);

        let folders = builder.forest().folders().to_vec();
        assert_eq!(labels(&builder, &folders), vec!["app", "lib"]);
        let app_children = builder.forest().children(folders[0]).to_vec();
        assert_eq!(labels(&builder, &app_children), vec!["gulp", "npm"]);
        let npm_items = builder.forest().children(app_children[1]).to_vec();
        assert_eq!(labels(&builder, &npm_items), vec!["build", "test"]);
        assert_eq!(builder.task_map().len(), 4);
    }

    #[test]
    fn test_missing_scope_goes_to_user_folder() {
        let env = Env::new();
        let mut builder = TaskTreeBuilder::new();
        let tasks = vec![npm("build", "app"), Rc::new(Task::new("echo", "shell"))];
        builder.build(&env.ctx(), &tasks, None);

        let folders = builder.forest().folders().to_vec();
        assert_eq!(labels(&builder, &folders), vec![USER_TASKS_LABEL, "app"]);
        let user = builder.forest().folder(folders[0]).unwrap();
        assert_eq!(user.kind, FolderKind::User);
    }

    #[test]
    fn test_empty_folders_pruned() {
        let env = Env::new();
        let mut builder = TaskTreeBuilder::new();
        builder.build(&env.ctx(), &[npm("build", "app"), npm("start", "lib")], None);
        builder.build(&env.ctx(), &[npm("build", "app")], None);

        let folders = builder.forest().folders().to_vec();
        assert_eq!(labels(&builder, &folders), vec!["app"]);
        assert!(builder.folder("lib").is_none());
    }

    #[test]
    fn test_collapse_state_read_from_state() {
        let mut env = Env::new();
        env.state.set_folder_expanded("app", false);
        let mut builder = TaskTreeBuilder::new();
        builder.build(&env.ctx(), &[npm("build", "app")], None);

        let folder = builder.folder("app").unwrap();
        assert!(!builder.forest().folder(folder).unwrap().expanded);
    }

    #[test]
    fn test_source_filter_leaves_other_sources_alone() {
        let env = Env::new();
        let mut builder = TaskTreeBuilder::new();
        let gulp = Rc::new(Task::new("lint", "gulp").in_workspace("app", "/ws/app").with_file("", "gulpfile.js"));
        builder.build(&env.ctx(), &[npm("build", "app"), gulp.clone()], None);

        let folder = builder.folder("app").unwrap();
        let gulp_file = builder.forest().children(folder)[0];
        let gulp_id = builder.forest().file(gulp_file).unwrap().id.clone();

        builder.build(&env.ctx(), &[npm("build", "app"), npm("watch", "app"), gulp], Some("npm"));

        let children = builder.forest().children(folder).to_vec();
        assert_eq!(children[0], gulp_file);
        assert_eq!(builder.forest().file(gulp_file).unwrap().id, gulp_id);
        let npm_items = builder.forest().children(children[1]).to_vec();
        assert_eq!(labels(&builder, &npm_items), vec!["build", "watch"]);
        assert_eq!(builder.task_map().len(), 3);
    }

    #[test]
    fn test_script_tasks_get_one_container_per_file() {
        let env = Env::new();
        let mut builder = TaskTreeBuilder::new();
        let script = |file: &str| {
            Rc::new(
                Task::new(file, "bash")
                    .in_workspace("app", "/ws/app")
                    .with_file("scripts", file),
            )
        };
        builder.build(&env.ctx(), &[script("a.sh"), script("b.sh")], None);

        let folder = builder.folder("app").unwrap();
        let children = builder.forest().children(folder).to_vec();
        assert_eq!(children.len(), 1);
        let group = builder.forest().file(children[0]).unwrap();
        assert!(group.is_group);
        assert_eq!(group.tree_nodes.len(), 2);
    }

    #[test]
    fn test_task_counts_and_remove_folder() {
        let env = Env::new();
        let mut builder = TaskTreeBuilder::new();
        let gulp = Rc::new(Task::new("lint", "gulp").in_workspace("lib", "/ws/lib").with_file("", "gulpfile.js"));
        builder.build(&env.ctx(), &[npm("build", "app"), npm("test", "app"), gulp], None);

        let counts = builder.task_counts();
        assert_eq!(counts.get("npm"), Some(&2));
        assert_eq!(counts.get("gulp"), Some(&1));

        assert!(builder.remove_folder(&env.ctx(), "app"));
        assert!(!builder.remove_folder(&env.ctx(), "app"));
        assert_eq!(builder.task_map().len(), 1);
        assert_eq!(builder.forest().folders().len(), 1);
    }
}
