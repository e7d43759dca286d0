//! Reordering of the widget selector, including drag gestures.

use crate::error::CoreResult;
use crate::store::order_store::OrderStore;
use crate::widget::order::WidgetOrder;

/// Owns the latest committed [`WidgetOrder`] and persists every change.
///
/// All moves are computed against the order held here, never against a
/// caller's snapshot, so a burst of hover events during one drag cannot
/// lose updates.
pub struct ReorderController {
    order: WidgetOrder,
    store: OrderStore,
}

impl ReorderController {
    /// Creates a controller seeded from the persisted order.
    pub fn new(store: OrderStore) -> Self {
        let order = store.load();
        Self { order, store }
    }

    /// The latest committed order.
    pub fn order(&self) -> &WidgetOrder {
        &self.order
    }

    /// Moves the widget at `from` to `to` and persists the result.
    ///
    /// Returns `Ok(false)` without touching persistence when
    /// `from == to`, `Ok(true)` when the order changed. A failed write is
    /// logged and the new order still commits; the next successful save
    /// overwrites whatever is on disk.
    ///
    /// # Errors
    ///
    /// [`CoreError::InvalidInput`](crate::CoreError::InvalidInput) if an
    /// index is out of range. The committed order is left unchanged.
    pub fn move_item(&mut self, from: usize, to: usize) -> CoreResult<bool> {
        let next = self.order.moved(from, to)?;
        if from == to {
            return Ok(false);
        }
        if let Err(e) = self.store.save(&next) {
            tracing::error!("Failed to persist widget order: {e}");
        }
        tracing::debug!("Moved widget {from} -> {to}");
        self.order = next;
        Ok(true)
    }

    /// Clears the persisted order and restores catalog order.
    pub fn reset(&mut self) -> &WidgetOrder {
        self.order = self.store.reset();
        &self.order
    }
}

/// An in-progress drag of one selector tile.
///
/// Tracks where the dragged tile currently sits so that each hover issues
/// a move from its *current* index, exactly one position change per event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DragSession {
    current: usize,
}

impl DragSession {
    /// Starts dragging the tile at `index`.
    pub fn begin(index: usize) -> Self {
        Self { current: index }
    }

    /// Index the dragged tile occupies now.
    pub fn current(&self) -> usize {
        self.current
    }

    /// The dragged tile hovers over `target`.
    ///
    /// Issues a move only when the tile is not already there. Returns the
    /// updated session; an out-of-range target leaves it unchanged.
    pub fn hover(self, controller: &mut ReorderController, target: usize) -> CoreResult<Self> {
        if self.current == target {
            return Ok(self);
        }
        controller.move_item(self.current, target)?;
        Ok(Self { current: target })
    }

    /// Ends the gesture, returning the final index of the dragged tile.
    pub fn drop(self) -> usize {
        self.current
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{CoreError, CoreResult};
    use crate::store::memory::MemoryStore;
    use crate::store::{keys, KeyValueStore};
    use crate::widget::registry::WidgetKind::{self, *};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    /// Counts writes so tests can assert on persistence traffic.
    #[derive(Default)]
    struct CountingStore {
        inner: MemoryStore,
        writes: AtomicUsize,
    }

    impl KeyValueStore for CountingStore {
        fn get(&self, key: &str) -> CoreResult<Option<String>> {
            self.inner.get(key)
        }
        fn set(&self, key: &str, value: &str) -> CoreResult<()> {
            self.writes.fetch_add(1, Ordering::SeqCst);
            self.inner.set(key, value)
        }
        fn remove(&self, key: &str) -> CoreResult<()> {
            self.inner.remove(key)
        }
    }

    struct FailingStore;

    impl KeyValueStore for FailingStore {
        fn get(&self, _key: &str) -> CoreResult<Option<String>> {
            Ok(None)
        }
        fn set(&self, _key: &str, _value: &str) -> CoreResult<()> {
            Err(CoreError::Storage("disk full".to_string()))
        }
        fn remove(&self, _key: &str) -> CoreResult<()> {
            Ok(())
        }
    }

    fn controller() -> (Arc<CountingStore>, ReorderController) {
        let backing = Arc::new(CountingStore::default());
        let ctrl = ReorderController::new(OrderStore::new(backing.clone()));
        (backing, ctrl)
    }

    fn kinds(ctrl: &ReorderController) -> Vec<WidgetKind> {
        ctrl.order().iter().collect()
    }

    // --- move_item ---

    #[test]
    fn move_zero_to_two_matches_reference_scenario() {
        let (_, mut ctrl) = controller();
        assert!(ctrl.move_item(0, 2).unwrap());
        assert_eq!(kinds(&ctrl), vec![News, Finance, Weather, Github, Movie, Spotify]);
    }

    #[test]
    fn move_persists_new_order() {
        let (backing, mut ctrl) = controller();
        ctrl.move_item(0, 2).unwrap();
        let raw = backing.get(keys::WIDGET_ORDER).unwrap().unwrap();
        assert_eq!(WidgetOrder::from_json(&raw).as_ref(), Some(ctrl.order()));
    }

    #[test]
    fn same_index_move_skips_persistence() {
        let (backing, mut ctrl) = controller();
        assert!(!ctrl.move_item(3, 3).unwrap());
        assert_eq!(backing.writes.load(Ordering::SeqCst), 0);
        assert_eq!(ctrl.order(), &WidgetOrder::default());
    }

    #[test]
    fn out_of_range_move_leaves_order_unchanged() {
        let (backing, mut ctrl) = controller();
        assert!(ctrl.move_item(0, 9).is_err());
        assert_eq!(ctrl.order(), &WidgetOrder::default());
        assert_eq!(backing.writes.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn consecutive_moves_build_on_committed_order() {
        let (_, mut ctrl) = controller();
        ctrl.move_item(0, 1).unwrap();
        ctrl.move_item(1, 2).unwrap();
        // Weather walked from 0 to 2 via two single-step moves.
        assert_eq!(kinds(&ctrl), vec![News, Finance, Weather, Github, Movie, Spotify]);
    }

    #[test]
    fn new_controller_loads_persisted_order() {
        let backing = Arc::new(MemoryStore::new());
        let mut first = ReorderController::new(OrderStore::new(backing.clone()));
        first.move_item(5, 0).unwrap();

        let second = ReorderController::new(OrderStore::new(backing));
        assert_eq!(second.order().get(0), Some(Spotify));
    }

    #[test]
    fn failed_save_still_commits_in_memory() {
        let mut ctrl = ReorderController::new(OrderStore::new(Arc::new(FailingStore)));
        assert!(ctrl.move_item(0, 5).unwrap());
        assert_eq!(ctrl.order().get(5), Some(Weather));
    }

    // --- reset ---

    #[test]
    fn reset_restores_default_and_clears_storage() {
        let (backing, mut ctrl) = controller();
        ctrl.move_item(0, 5).unwrap();
        ctrl.move_item(2, 0).unwrap();
        assert_eq!(ctrl.reset(), &WidgetOrder::default());
        assert_eq!(backing.get(keys::WIDGET_ORDER).unwrap(), None);
    }

    // --- drag sessions ---

    #[test]
    fn drag_hover_sequence_moves_tile_step_by_step() {
        let (backing, mut ctrl) = controller();
        let drag = DragSession::begin(0);
        let drag = drag.hover(&mut ctrl, 1).unwrap();
        let drag = drag.hover(&mut ctrl, 2).unwrap();
        let drag = drag.hover(&mut ctrl, 3).unwrap();
        assert_eq!(drag.drop(), 3);
        assert_eq!(kinds(&ctrl), vec![News, Finance, Github, Weather, Movie, Spotify]);
        assert_eq!(backing.writes.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn drag_hover_over_own_slot_is_noop() {
        let (backing, mut ctrl) = controller();
        let drag = DragSession::begin(2).hover(&mut ctrl, 2).unwrap();
        assert_eq!(drag.current(), 2);
        assert_eq!(backing.writes.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn drag_repeated_hover_on_same_target_moves_once() {
        let (backing, mut ctrl) = controller();
        let drag = DragSession::begin(0);
        let drag = drag.hover(&mut ctrl, 4).unwrap();
        let drag = drag.hover(&mut ctrl, 4).unwrap();
        let drag = drag.hover(&mut ctrl, 4).unwrap();
        assert_eq!(drag.current(), 4);
        assert_eq!(ctrl.order().get(4), Some(Weather));
        assert_eq!(backing.writes.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn drag_back_and_forth_returns_to_start() {
        let (_, mut ctrl) = controller();
        let drag = DragSession::begin(1);
        let drag = drag.hover(&mut ctrl, 4).unwrap();
        let drag = drag.hover(&mut ctrl, 1).unwrap();
        assert_eq!(drag.drop(), 1);
        assert_eq!(ctrl.order(), &WidgetOrder::default());
    }

    #[test]
    fn drag_out_of_range_hover_errors_without_moving() {
        let (_, mut ctrl) = controller();
        let drag = DragSession::begin(0);
        assert!(drag.hover(&mut ctrl, 10).is_err());
        assert_eq!(ctrl.order(), &WidgetOrder::default());
    }
}
