use anyhow::Result;
use task_tree_core::render_outline;
use tracing::debug;

use crate::cli::TreeArgs;
use crate::commands::build_tree;
use crate::display::outline_entries;

pub fn show_command(args: &TreeArgs, source: Option<&str>, json: bool) -> Result<()> {
    let mut tree = build_tree(args)?;

    if let Some(source) = source {
        let tasks: Vec<_> = tree
            .tasks()
            .iter()
            .filter(|task| task.source == source)
            .map(|task| (**task).clone())
            .collect();
        debug!("Rebuilding {} '{}' tasks", tasks.len(), source);
        tree.update_source(source, tasks);
    }

    if json {
        let entries = outline_entries(&mut tree);
        println!("{}", serde_json::to_string_pretty(&entries)?);
    } else {
        print!("{}", render_outline(&tree));
    }
    Ok(())
}
