//! Grouping passes run over a built forest
//!
//! Both passes are single left-to-right sweeps over the existing order: only
//! *adjacent* siblings are ever merged, so the outcome depends on the sort
//! applied by the builder beforehand.

use crate::{
    config::GroupingConfig,
    tree::{
        forest::Forest,
        node::{NodeKey, TaskFile, TreeNode},
    },
    types::is_script_type,
};
use std::collections::HashMap;
use tracing::{debug, trace};

pub struct TaskTreeGrouper<'a> {
    config: &'a GroupingConfig,
}

impl<'a> TaskTreeGrouper<'a> {
    pub fn new(config: &'a GroupingConfig) -> Self {
        Self { config }
    }

    /// Groups the direct children of each folder, restricted to `source`
    /// when given
    pub fn group(&self, forest: &mut Forest, folders: &[NodeKey], source: Option<&str>) {
        for &folder in folders {
            match forest.folder(folder) {
                Some(f) if !f.is_special() => {}
                _ => continue,
            }

            self.group_by_source(forest, folder, source);

            if self.config.enabled {
                let Some(folder_label) = forest.folder(folder).map(|f| f.label.clone()) else {
                    continue;
                };
                for file in self.separator_targets(forest, folder, source) {
                    self.group_by_separator(forest, &folder_label, file, 0);
                }
            }

            self.strip_labels(forest, folder, source);
        }
    }

    fn matches_source(forest: &Forest, key: NodeKey, source: Option<&str>) -> bool {
        match (forest.get(key).and_then(TreeNode::task_source), source) {
            (Some(_), None) => true,
            (Some(node_source), Some(wanted)) => node_source == wanted,
            (None, _) => false,
        }
    }

    /// Pass A: consecutive same-source files of a folder move under one
    /// group node per source
    fn group_by_source(&self, forest: &mut Forest, folder: NodeKey, source: Option<&str>) {
        let Some((folder_label, folder_id)) =
            forest.folder(folder).map(|f| (f.label.clone(), f.id.clone()))
        else {
            return;
        };
        let candidates: Vec<NodeKey> = forest
            .children(folder)
            .iter()
            .copied()
            .filter(|key| forest.file(*key).is_some_and(|f| !f.is_group))
            .filter(|key| Self::matches_source(forest, *key, source))
            .collect();

        let mut groups: HashMap<String, NodeKey> = HashMap::new();
        let mut prev: Option<(NodeKey, String)> = None;

        for key in candidates {
            let Some(task_source) = forest.file(key).map(|f| f.task_source.clone()) else {
                continue;
            };

            if let Some((prev_key, prev_source)) = &prev {
                if *prev_source == task_source {
                    let group = match groups.get(&task_source) {
                        Some(group) => *group,
                        None => {
                            let Some(task) = forest.file(*prev_key).map(|f| f.task.clone()) else {
                                continue;
                            };
                            let node = TaskFile::group(
                                &folder_label,
                                task,
                                &task_source,
                                "",
                                "",
                                0,
                                Some(folder_id.clone()),
                            );
                            let group = forest.insert(TreeNode::File(node));
                            let index = forest.children(folder).iter().position(|k| k == prev_key);
                            forest.add_child(folder, group, index);
                            groups.insert(task_source.clone(), group);
                            debug!("Grouped '{}' files of folder '{}'", task_source, folder_label);
                            group
                        }
                    };
                    if forest.parent(*prev_key) != Some(group) {
                        forest.add_child(group, *prev_key, None);
                    }
                    forest.add_child(group, key, None);
                }
            }

            prev = Some((key, task_source));
        }
    }

    /// Files whose children are items, including those moved under a
    /// source group by pass A
    fn separator_targets(&self, forest: &Forest, folder: NodeKey, source: Option<&str>) -> Vec<NodeKey> {
        let mut targets = Vec::new();
        for &key in forest.children(folder) {
            let Some(file) = forest.file(key) else {
                continue;
            };
            if !Self::matches_source(forest, key, source) {
                continue;
            }
            if !self.config.group_scripts && is_script_type(&file.task_source) {
                continue;
            }
            if file.is_group {
                targets.extend(
                    file.tree_nodes
                        .iter()
                        .copied()
                        .filter(|child| forest.file(*child).is_some()),
                );
            } else {
                targets.push(key);
            }
        }
        targets
    }

    /// Pass B: consecutive items sharing the label prefix up to `tree_level`
    /// move under a group named after the token at `tree_level`, recursing
    /// until `max_level`
    fn group_by_separator(&self, forest: &mut Forest, folder_label: &str, file: NodeKey, tree_level: usize) {
        let separator = self.config.separator;
        let Some((file_id, path_key)) = forest.file(file).map(|f| (f.id.clone(), f.path_key.clone())) else {
            return;
        };

        let mut groups: HashMap<String, NodeKey> = HashMap::new();
        let mut created: Vec<NodeKey> = Vec::new();
        let mut prev: Option<(NodeKey, Vec<String>)> = None;

        for key in forest.children(file).to_vec() {
            let Some(item) = forest.item(key) else {
                prev = None;
                continue;
            };
            let parts: Vec<String> = item.label.split(separator).map(str::to_string).collect();

            if let Some((prev_key, prev_parts)) = &prev {
                if shares_prefix(prev_parts, &parts, tree_level) {
                    let prefix = parts[..=tree_level].join(&separator.to_string());
                    let group = match groups.get(&prefix) {
                        Some(group) => *group,
                        None => {
                            let Some(task) = forest.item(*prev_key).map(|i| i.task.clone()) else {
                                continue;
                            };
                            let node = TaskFile::group(
                                folder_label,
                                task,
                                &parts[tree_level],
                                &path_key,
                                &prefix,
                                tree_level + 1,
                                Some(file_id.clone()),
                            );
                            let group = forest.insert(TreeNode::File(node));
                            let index = forest.children(file).iter().position(|k| k == prev_key);
                            forest.add_child(file, group, index);
                            groups.insert(prefix.clone(), group);
                            created.push(group);
                            trace!("Created group '{}' at level {}", prefix, tree_level + 1);
                            group
                        }
                    };
                    if forest.parent(*prev_key) != Some(group) {
                        forest.add_child(group, *prev_key, None);
                    }
                    forest.add_child(group, key, None);
                }
            }

            prev = Some((key, parts));
        }

        if tree_level + 1 < self.config.max_level {
            for group in created {
                self.group_by_separator(forest, folder_label, group, tree_level + 1);
            }
        }
    }

    /// Drops the shared group prefix from grouped item labels
    fn strip_labels(&self, forest: &mut Forest, folder: NodeKey, source: Option<&str>) {
        let separator = self.config.separator;
        for key in forest.descendants(folder) {
            if !Self::matches_source(forest, key, source) {
                continue;
            }
            let Some(item) = forest.item_mut(key) else {
                continue;
            };
            if item.group_level == 0 {
                continue;
            }
            let strip = if is_script_type(&item.task_source) {
                self.config.strip_script_label
            } else {
                self.config.strip_task_label
            };
            if !strip {
                continue;
            }
            let parts: Vec<&str> = item.label.split(separator).collect();
            if parts.len() > item.group_level {
                item.label = parts[item.group_level..].join(&separator.to_string());
            }
        }
    }
}

/// Both labels have a remainder past `level` and agree on every token up to it
fn shares_prefix(prev: &[String], current: &[String], level: usize) -> bool {
    prev.len() > level + 1 && current.len() > level + 1 && prev[..=level] == current[..=level]
}
