//! Drag Reorder Controller
//!
//! Turns drag gestures over the rendered list into one persisted renumbering.
//! Indices refer to positions in the sync view; the permutation is computed
//! from the view as it is when the gesture ends.

use std::sync::Arc;

use drag_reorder::{splice, DragReorder, DragState, Move};

use crate::domain::{DomainResult, OrderUpdate};
use crate::repository::RemoteListStore;
use crate::sync::OrderedListSync;

pub struct DragReorderController<S: RemoteListStore> {
    dnd: DragReorder,
    sync: Arc<OrderedListSync<S>>,
}

impl<S: RemoteListStore + 'static> DragReorderController<S> {
    pub fn new(sync: Arc<OrderedListSync<S>>) -> Self {
        Self {
            dnd: DragReorder::new(),
            sync,
        }
    }

    pub fn state(&self) -> DragState {
        self.dnd.state()
    }

    pub fn on_drag_start(&mut self, source: usize) {
        self.dnd.start(source);
    }

    pub fn on_drag_enter(&mut self, target: usize) {
        self.dnd.enter(target);
    }

    /// Finish the gesture and persist the resulting order.
    ///
    /// Returns the written batch, or `None` when nothing was written: the
    /// gesture never reached a target, or an index no longer exists in the
    /// view. The controller is back to `Idle` whatever the outcome.
    pub async fn on_drag_end(&mut self) -> DomainResult<Option<Vec<OrderUpdate>>> {
        let Some(Move { from, to }) = self.dnd.end() else {
            log::debug!("Drag ended without a target");
            return Ok(None);
        };

        let view = self.sync.view();
        let Some(sequence) = splice(&view.ids(), from, to) else {
            log::warn!(
                "Drag {} -> {} out of range for {} item(s), nothing written",
                from,
                to,
                view.len()
            );
            return Ok(None);
        };

        let updates = self.sync.persist_order(&sequence).await?;
        Ok(Some(updates))
    }
}
