//! Registry of currently executing tasks

use crate::types::Task;
use std::cell::RefCell;
use std::path::PathBuf;

/// Handle of a running task, matched against tasks by `(name, source, scope, path)`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunningTask {
    pub name: String,
    pub source: String,
    pub scope: Option<String>,
    pub path: PathBuf,
}

impl RunningTask {
    pub fn from_task(task: &Task) -> Self {
        Self {
            name: task.name.clone(),
            source: task.source.clone(),
            scope: task.scope_name().map(str::to_string),
            path: task.absolute_path(),
        }
    }

    pub fn matches(&self, task: &Task) -> bool {
        self.name == task.name
            && self.source == task.source
            && self.scope.as_deref() == task.scope_name()
            && self.path == task.absolute_path()
    }
}

/// Answers "is this task running" for icon and context state
pub trait RunningTasks {
    fn running(&self) -> Vec<RunningTask>;

    fn is_running(&self, task: &Task) -> bool {
        self.running().iter().any(|r| r.matches(task))
    }
}

/// In-memory registry fed by the host's task start/stop events
#[derive(Debug, Default)]
pub struct RunningTaskRegistry {
    tasks: RefCell<Vec<RunningTask>>,
}

impl RunningTaskRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(&self, task: &Task) {
        let handle = RunningTask::from_task(task);
        let mut tasks = self.tasks.borrow_mut();
        if !tasks.contains(&handle) {
            tasks.push(handle);
        }
    }

    pub fn stop(&self, task: &Task) {
        self.tasks.borrow_mut().retain(|r| !r.matches(task));
    }

    pub fn clear(&self) {
        self.tasks.borrow_mut().clear();
    }
}

impl RunningTasks for RunningTaskRegistry {
    fn running(&self) -> Vec<RunningTask> {
        self.tasks.borrow().clone()
    }

    fn is_running(&self, task: &Task) -> bool {
        self.tasks.borrow().iter().any(|r| r.matches(task))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_matches_on_scope_and_path() {
        let registry = RunningTaskRegistry::new();
        let task = Task::new("build", "npm")
            .in_workspace("app", "/ws/app")
            .with_file("", "package.json");
        let other_folder = Task::new("build", "npm")
            .in_workspace("lib", "/ws/lib")
            .with_file("", "package.json");

        registry.start(&task);
        registry.start(&task);
        assert_eq!(registry.running().len(), 1);
        assert!(registry.is_running(&task));
        assert!(!registry.is_running(&other_folder));

        registry.stop(&task);
        assert!(!registry.is_running(&task));
    }
}
