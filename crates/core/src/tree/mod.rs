//! Task tree model, builder and grouping passes

pub mod builder;
pub mod forest;
pub mod grouper;
pub mod icon;
pub mod identity;
pub mod label;
pub mod lookup;
pub mod node;
pub mod sorter;
mod special;

pub use builder::{BuildContext, TaskTreeBuilder};
pub use forest::Forest;
pub use grouper::TaskTreeGrouper;
pub use icon::{Icon, IconResolver};
pub use lookup::{LightTask, TaskItemRef};
pub use node::{
    FAVORITES_LABEL, FolderKind, LAST_TASKS_LABEL, NodeKey, NodeKind, PositionedNode, TaskFile,
    TaskFolder, TaskItem, TreeNode, USER_TASKS_LABEL,
};
pub use sorter::{LabelSorter, TaskSorter};
