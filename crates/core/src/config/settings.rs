use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Config file names searched for, in order, by [`TreeConfig::find_config_file`]
pub const CONFIG_FILE_NAMES: &[&str] = &[".task-tree.json", "task-tree.json"];

/// Separator-based grouping of task labels
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct GroupingConfig {
    /// Master switch for separator grouping
    pub enabled: bool,
    pub separator: char,
    /// Maximum nesting depth of separator groups
    pub max_level: usize,
    /// Also group script-type sources (bash, python, ...)
    pub group_scripts: bool,
    /// Strip the shared group prefix from non-script task labels
    pub strip_task_label: bool,
    /// Strip the shared group prefix from script labels
    pub strip_script_label: bool,
}

impl Default for GroupingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            separator: '-',
            max_level: 5,
            group_scripts: true,
            strip_task_label: true,
            strip_script_label: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct SpecialFoldersConfig {
    pub show_favorites: bool,
    pub show_last_tasks: bool,
    pub num_last_tasks: usize,
}

impl Default for SpecialFoldersConfig {
    fn default() -> Self {
        Self {
            show_favorites: true,
            show_last_tasks: true,
            num_last_tasks: 10,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct TreeConfig {
    pub grouping: GroupingConfig,
    pub special_folders: SpecialFoldersConfig,
    /// Package manager named in npm tooltips
    pub package_manager: String,
    pub animated_icons: bool,
    /// Directory holding `sources/<source>.svg` icon assets
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icons_dir: Option<PathBuf>,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            grouping: GroupingConfig::default(),
            special_folders: SpecialFoldersConfig::default(),
            package_manager: "npm".to_string(),
            animated_icons: true,
            icons_dir: None,
        }
    }
}

impl TreeConfig {
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: TreeConfig = serde_json::from_str(&contents)
            .map_err(|e| Error::ConfigError(format!("Failed to parse config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| Error::ConfigError(format!("Failed to serialize config: {e}")))?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    pub fn find_config_file(start_path: &Path) -> Option<PathBuf> {
        let mut current = start_path;

        loop {
            for name in CONFIG_FILE_NAMES {
                let config_path = current.join(name);
                if config_path.exists() {
                    return Some(config_path);
                }
            }

            current = current.parent()?;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_partial_config_uses_defaults() {
        let json = r#"{ "grouping": { "separator": ":", "max_level": 2 } }"#;
        let config: TreeConfig = serde_json::from_str(json).unwrap();

        assert_eq!(config.grouping.separator, ':');
        assert_eq!(config.grouping.max_level, 2);
        assert!(config.grouping.enabled);
        assert!(config.special_folders.show_favorites);
        assert_eq!(config.package_manager, "npm");
    }

    #[test]
    fn test_config_file_round_trip() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let path = temp_dir.path().join(".task-tree.json");

        let mut config = TreeConfig::default();
        config.grouping.group_scripts = false;
        config.package_manager = "pnpm".to_string();
        config.save_to_file(&path)?;

        let loaded = TreeConfig::load_from_file(&path)?;
        assert_eq!(loaded, config);
        Ok(())
    }

    #[test]
    fn test_find_config_file_walks_up() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let nested = temp_dir.path().join("a").join("b");
        std::fs::create_dir_all(&nested)?;
        std::fs::write(temp_dir.path().join("task-tree.json"), "{}")?;

        let found = TreeConfig::find_config_file(&nested);
        assert_eq!(found, Some(temp_dir.path().join("task-tree.json")));
        Ok(())
    }

    #[test]
    fn test_invalid_config_rejected_on_load() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let path = temp_dir.path().join(".task-tree.json");
        std::fs::write(&path, r#"{ "grouping": { "max_level": 0 } }"#)?;

        let err = TreeConfig::load_from_file(&path).unwrap_err();
        assert!(matches!(err, Error::ConfigError(_)));
        Ok(())
    }
}
