use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "task-tree")]
#[command(version, about, long_about = None)]
#[command(after_help = "ENVIRONMENT:\n    RUST_LOG=debug    Enable debug logging")]
pub struct Cli {
    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Inputs shared by every command that builds a tree
#[derive(Args, Debug, Clone)]
pub struct TreeArgs {
    /// JSON file holding the discovered task list
    #[arg(short, long)]
    pub tasks: PathBuf,

    /// Tree configuration (defaults to the nearest .task-tree.json)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Saved tree state: expanded folders, favorites and last tasks
    #[arg(short, long)]
    pub state: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build the tree and print it
    #[command(visible_alias = "s")]
    Show {
        #[command(flatten)]
        tree: TreeArgs,

        /// Rebuild only this source on top of the full build
        #[arg(long)]
        source: Option<String>,

        /// Print tree items as JSON instead of an outline
        #[arg(long)]
        json: bool,
    },
    /// Resolve a task item id or task file path
    #[command(visible_alias = "f")]
    Find {
        #[command(flatten)]
        tree: TreeArgs,

        /// Item id, or the path of a task file
        reference: String,

        /// Narrow a path reference to one task name
        #[arg(short, long)]
        name: Option<String>,
    },
    /// Print the number of task items per source
    Counts {
        #[command(flatten)]
        tree: TreeArgs,
    },
    /// Rebuild and reprint whenever the task list changes
    #[command(visible_alias = "w")]
    Watch {
        #[command(flatten)]
        tree: TreeArgs,
    },
}
