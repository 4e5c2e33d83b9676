//! Plain-text rendering of the tree, used by the CLI and snapshot tests

use crate::tree::{NodeKey, PositionedNode, TreeNode};
use crate::view::provider::TaskTree;
use std::fmt::Write;

/// Renders every node with two spaces of indentation per level. Task items
/// are prefixed with `- `, folders and files are printed as-is.
pub fn render_outline(tree: &TaskTree) -> String {
    let mut out = String::new();
    for folder in tree.get_children(None) {
        render_node(tree, folder, 0, &mut out);
    }
    out
}

fn render_node(tree: &TaskTree, key: NodeKey, depth: usize, out: &mut String) {
    let Some(node) = tree.forest().get(key) else {
        return;
    };
    let indent = "  ".repeat(depth);
    match node {
        TreeNode::Item(item) => {
            let _ = writeln!(out, "{indent}- {}", item.label());
        }
        other => {
            let _ = writeln!(out, "{indent}{}", other.label());
        }
    }
    for child in tree.get_children(Some(key)) {
        render_node(tree, child, depth + 1, out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{SpecialFoldersConfig, TreeConfig, TreeState};
    use crate::types::Task;
    use crate::view::provider::TreeServices;

    #[test]
    fn test_outline_indents_by_depth() {
        let config = TreeConfig {
            special_folders: SpecialFoldersConfig {
                show_favorites: false,
                show_last_tasks: false,
                ..Default::default()
            },
            ..Default::default()
        };
        let mut tree = TaskTree::new(TreeServices::new(config, TreeState::default()));
        tree.load(vec![
            Task::new("lint", "npm")
                .in_workspace("app", "/ws/app")
                .with_file("", "package.json"),
        ]);

        insta::assert_snapshot!(render_outline(&tree), @r"
        app
          npm
            - lint
        ");
    }
}
