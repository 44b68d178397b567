//! Drag Reorder State Machine
//!
//! Tracks a drag gesture over an ordered list by index.
//! The gesture is an owned value: `Idle` until a drag starts, `Dragging`
//! until it ends, with the hovered target updated on every enter event.

/// Gesture state
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DragState {
    #[default]
    Idle,
    Dragging {
        /// Index the drag started from
        source: usize,
        /// Last index the pointer entered, if any
        target: Option<usize>,
    },
}

/// A completed gesture: move the item at `from` so it ends up at `to`
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Move {
    pub from: usize,
    pub to: usize,
}

/// Drag gesture tracker
#[derive(Clone, Copy, Debug, Default)]
pub struct DragReorder {
    state: DragState,
}

impl DragReorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> DragState {
        self.state
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging { .. })
    }

    /// Begin a drag. A start while already dragging restarts the gesture.
    pub fn start(&mut self, source: usize) {
        self.state = DragState::Dragging { source, target: None };
    }

    /// Record the hovered index. Ignored unless a drag is in progress.
    pub fn enter(&mut self, index: usize) {
        if let DragState::Dragging { target, .. } = &mut self.state {
            *target = Some(index);
        }
    }

    /// Finish the gesture and return to `Idle`.
    ///
    /// Yields a move only if both a source and a target were recorded.
    pub fn end(&mut self) -> Option<Move> {
        match std::mem::take(&mut self.state) {
            DragState::Dragging {
                source,
                target: Some(to),
            } => Some(Move { from: source, to }),
            _ => None,
        }
    }

    /// Drop the gesture without producing a move
    pub fn cancel(&mut self) {
        self.state = DragState::Idle;
    }
}

/// Remove the element at `from`, then insert it at `to`.
///
/// Indices after the removal point shift down by one before the insertion,
/// matching list splice semantics. Returns `None` if either index is out of range.
pub fn splice<T: Clone>(items: &[T], from: usize, to: usize) -> Option<Vec<T>> {
    if from >= items.len() || to >= items.len() {
        return None;
    }
    let mut out = items.to_vec();
    let moved = out.remove(from);
    out.insert(to, moved);
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_gesture_yields_move() {
        let mut dnd = DragReorder::new();
        dnd.start(1);
        dnd.enter(2);
        dnd.enter(0);
        assert_eq!(dnd.end(), Some(Move { from: 1, to: 0 }));
        assert_eq!(dnd.state(), DragState::Idle);
    }

    #[test]
    fn test_end_without_target_is_cancelled() {
        let mut dnd = DragReorder::new();
        dnd.start(3);
        assert_eq!(dnd.end(), None);
        assert!(!dnd.is_dragging());
    }

    #[test]
    fn test_end_while_idle() {
        let mut dnd = DragReorder::new();
        assert_eq!(dnd.end(), None);
    }

    #[test]
    fn test_enter_while_idle_is_ignored() {
        let mut dnd = DragReorder::new();
        dnd.enter(2);
        assert_eq!(dnd.state(), DragState::Idle);
        dnd.start(0);
        assert_eq!(dnd.end(), None);
    }

    #[test]
    fn test_restart_clears_previous_target() {
        let mut dnd = DragReorder::new();
        dnd.start(0);
        dnd.enter(2);
        dnd.start(1);
        assert_eq!(dnd.state(), DragState::Dragging { source: 1, target: None });
    }

    #[test]
    fn test_cancel() {
        let mut dnd = DragReorder::new();
        dnd.start(0);
        dnd.enter(1);
        dnd.cancel();
        assert_eq!(dnd.end(), None);
    }

    #[test]
    fn test_splice_forward_and_back() {
        let items = ["a", "b", "c", "d"];
        assert_eq!(splice(&items, 1, 0).unwrap(), vec!["b", "a", "c", "d"]);
        assert_eq!(splice(&items, 0, 2).unwrap(), vec!["b", "c", "a", "d"]);
        assert_eq!(splice(&items, 0, 3).unwrap(), vec!["b", "c", "d", "a"]);
        assert_eq!(splice(&items, 3, 1).unwrap(), vec!["a", "d", "b", "c"]);
    }

    #[test]
    fn test_splice_same_index_keeps_sequence() {
        let items = [1, 2, 3];
        assert_eq!(splice(&items, 2, 2).unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn test_splice_out_of_range() {
        let items = [1, 2, 3];
        assert!(splice(&items, 3, 0).is_none());
        assert!(splice(&items, 0, 3).is_none());
        assert!(splice::<i32>(&[], 0, 0).is_none());
    }
}
