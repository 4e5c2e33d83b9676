pub mod source;
pub mod task;

// Re-export commonly used types
pub use source::{SourceKind, is_script_type};
pub use task::{Task, TaskDefinition, TaskExecution, TaskScope};
