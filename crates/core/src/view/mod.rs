//! Host-facing view layer: provider, refresh queue and rendered items

pub mod item;
pub mod outline;
pub mod provider;
pub mod queue;

pub use item::{Collapsible, TreeItem};
pub use outline::render_outline;
pub use provider::{TaskTree, TreeEvent, TreeServices};
pub use queue::{GLOBAL_REFRESH_ID, RefreshAction, RefreshQueue, Visibility};
