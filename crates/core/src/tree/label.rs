//! Display labels and tooltips for tree nodes

use crate::types::{Task, source::DEFAULT_ANT_FILE};
use regex::Regex;
use std::sync::LazyLock;

static APP_PUBLISHER_FILE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\.publishrc\.(.+)\.(?:json|jsonc|js|yaml|yml)$").expect("valid regex")
});

static WEBPACK_FILE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^webpack\.config\.(.+)\.(?:js|cjs|mjs|ts)$").expect("valid regex")
});

fn file_tag(pattern: &Regex, file_name: &str) -> Option<String> {
    pattern
        .captures(file_name)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// A relative path worth showing: not empty, not `.vscode`, not `.`
fn is_meaningful_path(relative_path: &str) -> bool {
    let trimmed = relative_path.trim_end_matches(['/', '\\']);
    !trimmed.is_empty() && trimmed != ".vscode" && trimmed != "."
}

/// Label of an ungrouped task file container
pub fn file_label(task: &Task) -> String {
    let relative_path = task.relative_path();
    let relative_path = relative_path.trim_end_matches(['/', '\\']);
    let file_name = task.file_name();
    let mut label = task.source.clone();
    let mut shows_path = false;

    match task.source.as_str() {
        "ant" if !file_name.is_empty() && !file_name.eq_ignore_ascii_case(DEFAULT_ANT_FILE) => {
            let location = if is_meaningful_path(relative_path) {
                format!("{relative_path}/{file_name}")
            } else {
                file_name.clone()
            };
            label.push_str(&format!(" ({location})"));
            shows_path = true;
        }
        "apppublisher" => {
            if let Some(tag) = file_tag(&APP_PUBLISHER_FILE, &file_name) {
                label.push_str(&format!(" ({tag})"));
            }
        }
        "webpack" => {
            if let Some(tag) = file_tag(&WEBPACK_FILE, &file_name) {
                label.push_str(&format!(" ({tag})"));
            }
        }
        _ => {}
    }

    if !shows_path && is_meaningful_path(relative_path) {
        label.push_str(&format!(" ({relative_path})"));
    }

    label.to_lowercase()
}

/// Label of a task item: the task name, with compiler tasks showing their
/// config file as `build (tsconfig.json)`
pub fn item_label(task: &Task) -> String {
    if task.source != "tsc" {
        return task.name.clone();
    }
    let name = task.name.strip_prefix("tsc: ").unwrap_or(&task.name);
    match name.split_once(" - ") {
        Some((command, hint)) if hint.ends_with(".json") => {
            let config_file = hint.rsplit(['/', '\\']).next().unwrap_or(hint);
            format!("{command} ({config_file})")
        }
        _ => name.to_string(),
    }
}

/// Label of a task item copied into a special folder
pub fn special_item_label(label: &str, folder_label: &str, source: &str) -> String {
    format!("{label} ({folder_label} - {source})")
}

pub fn item_tooltip(task: &Task, package_manager: &str) -> String {
    let mut lines = vec![format!("source: {}", task.source)];

    if task.source == "npm" {
        if let Some(script) = &task.definition.script {
            lines.push(format!("script: {script}"));
        }
        lines.push(format!("package manager: {package_manager}"));
    } else if let Some(target) = &task.definition.target {
        lines.push(format!("target: {target}"));
    }
    if let Some(command) = task.command_line() {
        lines.push(format!("command: {command}"));
    }

    let file_name = task.file_name();
    if !file_name.is_empty() {
        lines.push(format!("file: {file_name}"));
    }
    let relative_path = task.relative_path();
    if !relative_path.is_empty() {
        lines.push(format!("path: {relative_path}"));
    }
    if task.definition.takes_args {
        lines.push("arguments: prompted".to_string());
    }

    lines.join("\n")
}
