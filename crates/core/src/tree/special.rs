//! Curated special folders: Favorites and Last Tasks

use crate::tree::{
    builder::{BuildContext, TaskTreeBuilder},
    node::{FolderKind, NodeKey, TaskFolder, TaskItem, TreeNode},
    sorter::sort_folders,
};
use tracing::trace;

impl TaskTreeBuilder {
    pub fn special_folder(&self, kind: FolderKind) -> Option<NodeKey> {
        self.forest
            .folders()
            .iter()
            .copied()
            .find(|key| self.forest.folder(*key).is_some_and(|f| f.kind == kind))
    }

    /// Refills the special folders from the persisted id lists. Ids that no
    /// longer resolve to a task item are skipped, not forgotten.
    pub fn populate_special_folders(&mut self, ctx: &BuildContext<'_>) {
        let settings = &ctx.config.special_folders;
        let lists = [
            (
                FolderKind::LastTasks,
                settings.show_last_tasks,
                &ctx.state.last_tasks,
                settings.num_last_tasks,
            ),
            (
                FolderKind::Favorites,
                settings.show_favorites,
                &ctx.state.favorites,
                usize::MAX,
            ),
        ];

        for (kind, enabled, ids, limit) in lists {
            let existing = self.special_folder(kind);
            if !enabled {
                if let Some(folder) = existing {
                    self.forest.remove(folder);
                }
                continue;
            }

            let folder = match existing {
                Some(folder) => folder,
                None => {
                    let label = kind.default_label().unwrap_or_default();
                    let expanded = ctx.state.is_folder_expanded(label);
                    self.forest.insert_folder(TaskFolder::special(kind, expanded))
                }
            };
            for child in self.forest.children(folder).to_vec() {
                self.forest.remove(child);
            }

            let Some(folder_label) = self.forest.folder(folder).map(|f| f.label.clone()) else {
                continue;
            };
            let mut copies: Vec<TaskItem> = ids
                .iter()
                .filter_map(|id| self.task_map.get(id))
                .take(limit)
                .filter_map(|key| {
                    let item = self.forest.item(*key)?;
                    let workspace = self
                        .forest
                        .folder_of(*key)
                        .and_then(|f| self.forest.folder(f))
                        .map(|f| f.label.clone())
                        .unwrap_or_default();
                    Some(TaskItem::special_copy(item, &folder_label, &workspace))
                })
                .collect();
            if kind == FolderKind::Favorites {
                copies.sort_by(|a, b| ctx.sorter.compare_items(a, b));
            }

            trace!("Populating '{}' with {} items", folder_label, copies.len());
            for copy in copies {
                let key = self.forest.insert(TreeNode::Item(copy));
                self.forest.add_child(folder, key, None);
            }
        }

        sort_folders(&mut self.forest);
    }
}
