pub mod formatter;

pub use formatter::{OutlineEntry, format_counts, format_item, outline_entries};
