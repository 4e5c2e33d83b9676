pub mod file;

pub use file::{load_config, load_state, load_tasks};
