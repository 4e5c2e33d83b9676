use anyhow::{Context, Result};
use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use std::rc::Rc;
use std::sync::mpsc::channel;
use std::time::{Duration, Instant};
use task_tree_core::{Task, TaskTree, render_outline};
use tracing::{debug, warn};

use crate::cli::TreeArgs;
use crate::commands::build_tree;
use crate::utils::load_tasks;

/// Quiet period before a burst of file events triggers a rebuild
const DEBOUNCE_MS: u64 = 100;

fn by_source<'a>(tasks: impl Iterator<Item = &'a Task>) -> BTreeMap<&'a str, Vec<&'a Task>> {
    let mut map: BTreeMap<&str, Vec<&Task>> = BTreeMap::new();
    for task in tasks {
        map.entry(task.source.as_str()).or_default().push(task);
    }
    map
}

/// Sources whose task lists differ between `old` and `new`, including
/// sources that appeared or vanished
pub fn changed_sources(old: &[Rc<Task>], new: &[Task]) -> Vec<String> {
    let old = by_source(old.iter().map(|task| task.as_ref()));
    let new = by_source(new.iter());
    let sources: BTreeSet<&str> = old.keys().chain(new.keys()).copied().collect();
    sources
        .into_iter()
        .filter(|source| old.get(source) != new.get(source))
        .map(str::to_string)
        .collect()
}

/// Folder each task lands in, `None` standing for user tasks
fn scopes<'a>(tasks: impl Iterator<Item = &'a Task>) -> BTreeSet<Option<&'a str>> {
    tasks.map(Task::scope_name).collect()
}

/// Applies a reloaded task list: a full rebuild when folders appear or
/// disappear, otherwise one scoped rebuild per changed source
pub fn apply_task_changes(tree: &mut TaskTree, tasks: Vec<Task>) -> Vec<String> {
    let changed = changed_sources(tree.tasks(), &tasks);
    if changed.is_empty() {
        return changed;
    }

    if scopes(tree.tasks().iter().map(|task| task.as_ref())) != scopes(tasks.iter()) {
        debug!("Workspace folders changed, rebuilding all {} tasks", tasks.len());
        tree.load(tasks);
        return changed;
    }

    for source in &changed {
        let scoped: Vec<Task> = tasks
            .iter()
            .filter(|task| task.source == *source)
            .cloned()
            .collect();
        debug!("Source '{}' changed, rebuilding {} tasks", source, scoped.len());
        tree.update_source(source, scoped);
    }
    changed
}

pub fn watch_command(args: &TreeArgs) -> Result<()> {
    let mut tree = build_tree(args)?;
    tree.on_visibility_changed(true, true);
    print!("{}", render_outline(&tree));

    let watched = args
        .tasks
        .canonicalize()
        .with_context(|| format!("Failed to resolve {}", args.tasks.display()))?;
    let dir = watched.parent().unwrap_or(Path::new("."));

    let (tx, rx) = channel();
    let mut watcher = RecommendedWatcher::new(
        move |res: notify::Result<Event>| {
            if let Ok(event) = res {
                for path in event.paths {
                    let _ = tx.send(path);
                }
            }
        },
        Config::default(),
    )?;
    // editors replace files on save, so watch the directory
    watcher.watch(dir, RecursiveMode::NonRecursive)?;
    println!("👀 Watching {} (Ctrl+C to stop)", watched.display());

    let mut last_change: Option<Instant> = None;
    loop {
        if let Ok(path) = rx.recv_timeout(Duration::from_millis(50)) {
            if path.file_name() == watched.file_name() {
                last_change = Some(Instant::now());
            }
        }

        let settled = last_change.is_some_and(|t| t.elapsed() >= Duration::from_millis(DEBOUNCE_MS));
        if !settled {
            continue;
        }
        last_change = None;

        let tasks = match load_tasks(&watched) {
            Ok(tasks) => tasks,
            Err(e) => {
                warn!("Keeping previous tree: {:#}", e);
                continue;
            }
        };
        let changed = apply_task_changes(&mut tree, tasks);
        if changed.is_empty() {
            continue;
        }
        tree.tick();
        println!("{}", "=".repeat(80));
        println!("🔄 Rebuilt: {}", changed.join(", "));
        print!("{}", render_outline(&tree));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use task_tree_core::{TaskItemRef, TreeConfig, TreeServices, TreeState, tree::identity};

    fn task(name: &str, source: &str) -> Task {
        Task::new(name, source)
            .in_workspace("app", "/ws/app")
            .with_file("", "tasks.json")
    }

    #[test]
    fn test_changed_sources_detects_added_removed_and_edited() {
        let old: Vec<Rc<Task>> = vec![task("a", "npm"), task("b", "gulp"), task("c", "make")]
            .into_iter()
            .map(Rc::new)
            .collect();
        let new = vec![task("a", "npm"), task("b2", "gulp"), task("d", "grunt")];

        assert_eq!(changed_sources(&old, &new), vec!["grunt", "gulp", "make"]);
    }

    #[test]
    fn test_apply_task_changes_keeps_unchanged_sources() {
        let mut tree = TaskTree::new(TreeServices::new(TreeConfig::default(), TreeState::default()));
        let npm = task("build", "npm");
        tree.load(vec![npm.clone(), task("serve", "gulp")]);
        let reference = TaskItemRef::Id(identity::task_item_id(&npm));
        let before = tree.find_task_item(&reference);
        assert!(before.is_some());

        let changed = apply_task_changes(&mut tree, vec![npm, task("deploy", "gulp")]);
        assert_eq!(changed, vec!["gulp"]);
        assert_eq!(tree.find_task_item(&reference), before);
        assert_eq!(tree.tasks().len(), 2);
    }

    #[test]
    fn test_apply_task_changes_rebuilds_all_when_folders_change() {
        let mut tree = TaskTree::new(TreeServices::new(TreeConfig::default(), TreeState::default()));
        let npm = task("build", "npm");
        tree.load(vec![npm.clone()]);
        let reference = TaskItemRef::Id(identity::task_item_id(&npm));
        let before = tree.find_task_item(&reference);

        let other = Task::new("lint", "gulp")
            .in_workspace("lib", "/ws/lib")
            .with_file("", "gulpfile.js");
        let changed = apply_task_changes(&mut tree, vec![npm, other]);

        assert_eq!(changed, vec!["gulp"]);
        assert!(tree.builder().folder("lib").is_some());
        // a full rebuild gives unchanged tasks fresh keys
        assert_ne!(tree.find_task_item(&reference), before);
        assert!(tree.find_task_item(&reference).is_some());
    }
}
