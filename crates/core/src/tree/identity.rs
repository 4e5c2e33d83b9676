//! Stable node identities
//!
//! Ids are md5 digests over the fields that define a node's logical identity,
//! so the same task or group gets the same id on every rebuild.

use crate::types::Task;

const FIELD_SEPARATOR: &str = "\u{1f}";

fn digest(parts: &[&str]) -> String {
    format!("{:x}", md5::compute(parts.join(FIELD_SEPARATOR).as_bytes()))
}

/// Forward slashes, no trailing separator, lower case
pub fn normalize_path(path: &str) -> String {
    path.replace('\\', "/").trim_end_matches('/').to_lowercase()
}

/// Id of a task item, independent of where grouping places it
pub fn task_item_id(task: &Task) -> String {
    let path = task.absolute_path().to_string_lossy().replace('\\', "/");
    digest(&[&path, &task.source, task.task_type(), &task.name])
}

/// Id of a task file container or group node
pub fn task_file_id(
    folder_label: &str,
    source: &str,
    path: &str,
    prefix: &str,
    group_level: usize,
    group_id: Option<&str>,
) -> String {
    let level = group_level.to_string();
    digest(&[
        folder_label,
        source,
        &normalize_path(path),
        &prefix.to_lowercase(),
        &level,
        group_id.unwrap_or_default(),
    ])
}

pub fn folder_id(label: &str) -> String {
    digest(&["folder", label])
}
