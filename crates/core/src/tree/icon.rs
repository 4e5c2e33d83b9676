//! Icon resolution with fallbacks for missing assets

use crate::types::Task;
use serde::Serialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Icon {
    /// Image files for light and dark themes
    Path { light: PathBuf, dark: PathBuf },
    /// A named icon supplied by the host
    Theme(String),
}

impl Icon {
    pub fn theme(name: &str) -> Self {
        Icon::Theme(name.to_string())
    }
}

pub const FILE_ICON: &str = "file";
pub const FOLDER_ICON: &str = "folder";
pub const GROUP_ICON: &str = "folder-library";
pub const TASK_ICON: &str = "wrench";
pub const RUNNING_ICON: &str = "sync";
pub const RUNNING_ANIMATED_ICON: &str = "loading~spin";

/// Resolves icons against an optional asset directory laid out as
/// `sources/<source>.svg`
#[derive(Debug, Clone, Default)]
pub struct IconResolver {
    assets_dir: Option<PathBuf>,
}

impl IconResolver {
    pub fn new(assets_dir: Option<PathBuf>) -> Self {
        Self { assets_dir }
    }

    /// Explicit task icon, then the source's asset, then the generic file icon
    pub fn file_icon(&self, task: &Task) -> Icon {
        if let Some(light) = &task.definition.icon {
            let dark = task.definition.icon_dark.clone().unwrap_or_else(|| light.clone());
            return Icon::Path {
                light: light.clone(),
                dark,
            };
        }
        if let Some(path) = self.source_asset(&task.source) {
            return Icon::Path {
                light: path.clone(),
                dark: path,
            };
        }
        Icon::theme(FILE_ICON)
    }

    pub fn item_icon(&self, running: bool, animated: bool) -> Icon {
        match (running, animated) {
            (true, true) => Icon::theme(RUNNING_ANIMATED_ICON),
            (true, false) => Icon::theme(RUNNING_ICON),
            (false, _) => Icon::theme(TASK_ICON),
        }
    }

    fn source_asset(&self, source: &str) -> Option<PathBuf> {
        let dir = self.assets_dir.as_deref()?;
        let path = asset_path(dir, source);
        path.is_file().then_some(path)
    }
}

fn asset_path(dir: &Path, source: &str) -> PathBuf {
    dir.join("sources").join(format!("{}.svg", source.to_lowercase()))
}
