use anyhow::{Result, bail};
use std::path::PathBuf;
use task_tree_core::TaskItemRef;

use crate::cli::TreeArgs;
use crate::commands::build_tree;
use crate::display::format_item;

/// Anything with a path separator is a task file, otherwise an item id
pub fn parse_reference(reference: &str, name: Option<&str>) -> TaskItemRef {
    if reference.contains(['/', '\\']) {
        TaskItemRef::Path {
            path: PathBuf::from(reference),
            name: name.map(str::to_string),
        }
    } else {
        TaskItemRef::Id(reference.to_string())
    }
}

pub fn find_command(args: &TreeArgs, reference: &str, name: Option<&str>) -> Result<()> {
    let mut tree = build_tree(args)?;

    let Some(key) = tree.find_task_item(&parse_reference(reference, name)) else {
        bail!("No task item matches '{}'", reference);
    };
    let Some(item) = tree.get_tree_item(key) else {
        bail!("Task item for '{}' disappeared", reference);
    };
    println!("{}", format_item(&item));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_reference() {
        assert_eq!(
            parse_reference("abc123", Some("ignored")),
            TaskItemRef::Id("abc123".to_string())
        );
        assert_eq!(
            parse_reference("/ws/app/package.json", Some("build")),
            TaskItemRef::Path {
                path: PathBuf::from("/ws/app/package.json"),
                name: Some("build".to_string()),
            }
        );
    }
}
