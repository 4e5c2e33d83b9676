//! Classification of task sources

/// Sources where every script file is its own logical container
pub const SCRIPT_TYPES: &[&str] = &[
    "bash",
    "batch",
    "nsis",
    "perl",
    "powershell",
    "python",
    "ruby",
];

/// Ant build file name that needs no disambiguation in labels
pub const DEFAULT_ANT_FILE: &str = "build.xml";

pub fn is_script_type(source: &str) -> bool {
    SCRIPT_TYPES.contains(&source)
}

/// Kind of a task item as seen by the host's context menus
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    /// npm scripts
    Script,
    /// bash, python and other script files
    ScriptFile,
    Task,
}

impl SourceKind {
    pub fn of(source: &str) -> Self {
        if source == "npm" {
            SourceKind::Script
        } else if is_script_type(source) {
            SourceKind::ScriptFile
        } else {
            SourceKind::Task
        }
    }

    pub fn context_prefix(self) -> &'static str {
        match self {
            SourceKind::Script => "script",
            SourceKind::ScriptFile => "scriptFile",
            SourceKind::Task => "task",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_kinds() {
        assert_eq!(SourceKind::of("npm"), SourceKind::Script);
        assert_eq!(SourceKind::of("bash"), SourceKind::ScriptFile);
        assert_eq!(SourceKind::of("grunt"), SourceKind::Task);
        assert!(!is_script_type("npm"));
    }
}
