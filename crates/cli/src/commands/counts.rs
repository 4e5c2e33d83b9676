use anyhow::Result;

use crate::cli::TreeArgs;
use crate::commands::build_tree;
use crate::display::format_counts;

pub fn counts_command(args: &TreeArgs) -> Result<()> {
    let tree = build_tree(args)?;
    println!("{}", format_counts(&tree.task_counts()));
    Ok(())
}
