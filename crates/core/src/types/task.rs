use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Where a task lives: a workspace folder, or the user-level sentinel
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TaskScope {
    Workspace { name: String, path: PathBuf },
    User,
}

/// Source-specific description of a task as reported by discovery
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskDefinition {
    #[serde(rename = "type", default)]
    pub task_type: String,
    /// Directory of the task file relative to the workspace folder
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub script: Option<String>,
    /// Absolute location of the task file
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uri: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cmd_line: Option<String>,
    #[serde(default)]
    pub takes_args: bool,
    #[serde(default)]
    pub script_file: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tsconfig: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon_dark: Option<PathBuf>,
}

/// Command line used to run a task, only used for display
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskExecution {
    pub command: String,
    #[serde(default)]
    pub args: Vec<String>,
}

impl TaskExecution {
    pub fn command_line(&self) -> String {
        if self.args.is_empty() {
            self.command.clone()
        } else {
            format!("{} {}", self.command, self.args.join(" "))
        }
    }
}

/// A runnable unit of work discovered from some project file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub name: String,
    pub source: String,
    #[serde(default)]
    pub scope: Option<TaskScope>,
    #[serde(default)]
    pub definition: TaskDefinition,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub execution: Option<TaskExecution>,
}

impl Task {
    pub fn new(name: impl Into<String>, source: impl Into<String>) -> Self {
        let source = source.into();
        Self {
            name: name.into(),
            definition: TaskDefinition {
                task_type: source.clone(),
                ..Default::default()
            },
            source,
            scope: None,
            execution: None,
        }
    }

    pub fn in_workspace(mut self, name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        self.scope = Some(TaskScope::Workspace {
            name: name.into(),
            path: path.into(),
        });
        self
    }

    pub fn in_user_scope(mut self) -> Self {
        self.scope = Some(TaskScope::User);
        self
    }

    pub fn with_file(mut self, relative_path: impl Into<String>, file_name: impl Into<String>) -> Self {
        self.definition.path = Some(relative_path.into());
        self.definition.file_name = Some(file_name.into());
        self
    }

    pub fn with_execution(mut self, command: impl Into<String>, args: &[&str]) -> Self {
        self.execution = Some(TaskExecution {
            command: command.into(),
            args: args.iter().map(|a| a.to_string()).collect(),
        });
        self
    }

    /// Name of the owning workspace folder, `None` for user-level or unscoped tasks
    pub fn scope_name(&self) -> Option<&str> {
        match &self.scope {
            Some(TaskScope::Workspace { name, .. }) if !name.is_empty() => Some(name),
            _ => None,
        }
    }

    pub fn is_user(&self) -> bool {
        self.scope_name().is_none()
    }

    pub fn task_type(&self) -> &str {
        if self.definition.task_type.is_empty() {
            &self.source
        } else {
            &self.definition.task_type
        }
    }

    /// Directory of the task file relative to its workspace folder, `/`-separated
    pub fn relative_path(&self) -> String {
        self.definition
            .path
            .as_deref()
            .map(|p| p.replace('\\', "/"))
            .unwrap_or_default()
    }

    pub fn file_name(&self) -> String {
        if let Some(name) = self.definition.file_name.as_deref().filter(|n| !n.is_empty()) {
            return name.to_string();
        }
        self.definition
            .uri
            .as_deref()
            .and_then(Path::file_name)
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default()
    }

    /// Absolute path of the task file, falling back to the relative location
    /// when the task carries neither a uri nor a workspace scope
    pub fn absolute_path(&self) -> PathBuf {
        if let Some(uri) = &self.definition.uri {
            return uri.clone();
        }
        let mut path = match &self.scope {
            Some(TaskScope::Workspace { path, .. }) => path.clone(),
            _ => PathBuf::new(),
        };
        let relative = self.relative_path();
        if !relative.is_empty() {
            path.push(relative.trim_end_matches('/'));
        }
        let file_name = self.file_name();
        if !file_name.is_empty() {
            path.push(file_name);
        }
        path
    }

    /// Package-manager install meta-tasks are never shown in the tree
    pub fn is_install_task(&self) -> bool {
        self.source == "npm" && (self.name == "install" || self.name.starts_with("install - "))
    }

    pub fn command_line(&self) -> Option<String> {
        self.definition
            .cmd_line
            .clone()
            .or_else(|| self.execution.as_ref().map(TaskExecution::command_line))
    }
}
