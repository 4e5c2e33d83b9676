//! Refresh notifications gated on view visibility
//!
//! While the view is hidden after having been shown, refresh requests are
//! queued by node id and replayed when it becomes visible again. Before the
//! first show there is nobody to notify, so requests are dropped.

use crate::tree::NodeKey;
use indexmap::IndexMap;
use tracing::trace;

/// Queue key used for refreshes of the whole tree
pub const GLOBAL_REFRESH_ID: &str = "*";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Visibility {
    #[default]
    NeverShown,
    Visible,
    HiddenAfterShown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshAction {
    /// Notify the host now
    Fire(Option<NodeKey>),
    Queued,
    Dropped,
}

#[derive(Debug, Default)]
pub struct RefreshQueue {
    visibility: Visibility,
    pending: IndexMap<String, Option<NodeKey>>,
    loaded_pending: bool,
}

impl RefreshQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Handles a refresh for the node with `id`, or for the whole tree when
    /// `node` is `None`
    pub fn request(&mut self, id: &str, node: Option<NodeKey>) -> RefreshAction {
        match self.visibility {
            Visibility::Visible => RefreshAction::Fire(node),
            Visibility::NeverShown => {
                trace!("Dropping refresh for '{}', view never shown", id);
                RefreshAction::Dropped
            }
            Visibility::HiddenAfterShown => {
                let id = if node.is_none() {
                    self.pending.clear();
                    GLOBAL_REFRESH_ID
                } else {
                    id
                };
                // a repeat keeps its first position but takes the latest key,
                // since rebuilds give surviving ids fresh keys
                self.pending.insert(id.to_string(), node);
                trace!("Queued refresh for '{}' ({} pending)", id, self.pending.len());
                RefreshAction::Queued
            }
        }
    }

    /// Applies a visibility change and returns the notifications to fire,
    /// in order
    pub fn set_visible(&mut self, visible: bool, data_changed: bool) -> Vec<Option<NodeKey>> {
        if !visible {
            if self.visibility == Visibility::Visible {
                self.visibility = Visibility::HiddenAfterShown;
            }
            return Vec::new();
        }

        let was_shown = self.visibility != Visibility::NeverShown;
        self.visibility = Visibility::Visible;
        if !data_changed {
            return Vec::new();
        }

        self.loaded_pending = true;
        if was_shown {
            self.pending.drain(..).map(|(_, node)| node).collect()
        } else {
            self.pending.clear();
            vec![None]
        }
    }

    /// True once per drain; the caller signals "tree loaded" on the tick
    /// after the drained refreshes were applied
    pub fn take_loaded(&mut self) -> bool {
        std::mem::take(&mut self.loaded_pending)
    }
}
