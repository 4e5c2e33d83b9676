use serde::Serialize;
use std::collections::BTreeMap;
use task_tree_core::{NodeKey, TaskTree, view::TreeItem};

/// Tree item with its depth, for JSON output
#[derive(Debug, Serialize)]
pub struct OutlineEntry {
    pub depth: usize,
    #[serde(flatten)]
    pub item: TreeItem,
}

/// Every node in display order, resolved to the shape the host renders
pub fn outline_entries(tree: &mut TaskTree) -> Vec<OutlineEntry> {
    let mut keys: Vec<(usize, NodeKey)> = Vec::new();
    let mut stack: Vec<(usize, NodeKey)> = tree
        .get_children(None)
        .into_iter()
        .rev()
        .map(|key| (0, key))
        .collect();
    while let Some((depth, key)) = stack.pop() {
        keys.push((depth, key));
        stack.extend(
            tree.get_children(Some(key))
                .into_iter()
                .rev()
                .map(|child| (depth + 1, child)),
        );
    }

    keys.into_iter()
        .filter_map(|(depth, key)| tree.get_tree_item(key).map(|item| OutlineEntry { depth, item }))
        .collect()
}

pub fn format_item(item: &TreeItem) -> String {
    let mut lines = vec![
        format!("🔧 {}", item.label),
        format!("   🆔 id: {}", item.id),
        format!("   🏷️  context: {}", item.context_value),
    ];
    if let Some(tooltip) = &item.tooltip {
        lines.extend(tooltip.lines().map(|line| format!("   {line}")));
    }
    lines.join("\n")
}

pub fn format_counts(counts: &BTreeMap<String, usize>) -> String {
    if counts.is_empty() {
        return "No tasks found".to_string();
    }
    let total: usize = counts.values().sum();
    let mut lines: Vec<String> = counts
        .iter()
        .map(|(source, count)| format!("{source}: {count}"))
        .collect();
    lines.push("=".repeat(20));
    lines.push(format!("total: {total}"));
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_counts_totals_sources() {
        let counts = BTreeMap::from([("gulp".to_string(), 1), ("npm".to_string(), 3)]);
        let text = format_counts(&counts);
        assert!(text.starts_with("gulp: 1\nnpm: 3\n"));
        assert!(text.ends_with("total: 4"));
    }

    #[test]
    fn test_format_counts_empty() {
        assert_eq!(format_counts(&BTreeMap::new()), "No tasks found");
    }
}
