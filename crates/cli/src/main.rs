use anyhow::Result;
use clap::Parser;
use task_tree::{
    Cli, Commands,
    commands::{counts_command, find_command, show_command, watch_command},
};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // RUST_LOG wins unless --verbose asks for debug output
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Show { tree, source, json } => show_command(&tree, source.as_deref(), json),
        Commands::Find {
            tree,
            reference,
            name,
        } => find_command(&tree, &reference, name.as_deref()),
        Commands::Counts { tree } => counts_command(&tree),
        Commands::Watch { tree } => watch_command(&tree),
    }
}
