pub mod counts;
pub mod find;
pub mod show;
pub mod watch;

pub use counts::counts_command;
pub use find::find_command;
pub use show::show_command;
pub use watch::watch_command;

use crate::cli::TreeArgs;
use crate::utils::{load_config, load_state, load_tasks};
use anyhow::Result;
use task_tree_core::{TaskTree, TreeServices};

/// Loads config, state and tasks and builds a tree from them
pub fn build_tree(args: &TreeArgs) -> Result<TaskTree> {
    let config = load_config(args.config.as_deref())?;
    let state = load_state(args.state.as_deref())?;
    let tasks = load_tasks(&args.tasks)?;

    let mut tree = TaskTree::new(TreeServices::new(config, state));
    tree.load(tasks);
    Ok(tree)
}
