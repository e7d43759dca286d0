//! Top-level dashboard controller.

use crate::event::{Command, Event};
use crate::selection::Selection;
use crate::store::order_store::OrderStore;
use crate::widget::order::WidgetOrder;
use crate::widget::registry::{WidgetDescriptor, WidgetRegistry};
use crate::widget::reorder::ReorderController;

/// Owns the widget order and the selection, and applies [`Command`]s.
pub struct Dashboard {
    registry: WidgetRegistry,
    reorder: ReorderController,
    selection: Selection,
}

impl Dashboard {
    /// Creates a dashboard seeded from the persisted order, showing the
    /// selector grid.
    pub fn new(store: OrderStore) -> Self {
        Self {
            registry: WidgetRegistry::new(),
            reorder: ReorderController::new(store),
            selection: Selection::default(),
        }
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    pub fn order(&self) -> &WidgetOrder {
        self.reorder.order()
    }

    pub fn registry(&self) -> &WidgetRegistry {
        &self.registry
    }

    /// Mutable access for drag sessions, which issue moves directly.
    pub fn reorder_mut(&mut self) -> &mut ReorderController {
        &mut self.reorder
    }

    /// Descriptors in the user's order.
    pub fn tiles(&self) -> Vec<&WidgetDescriptor> {
        self.order().iter().map(|kind| self.registry.get(kind)).collect()
    }

    /// Applies `cmd` and returns the resulting events.
    ///
    /// A move onto the same index changes nothing and yields no event.
    pub fn handle_command(&mut self, cmd: Command) -> Vec<Event> {
        match cmd {
            Command::Select(kind) => {
                self.selection = self.selection.select(kind);
                vec![Event::SelectionChanged(self.selection)]
            }
            Command::ClearSelection => {
                if self.selection.is_selector() {
                    return Vec::new();
                }
                self.selection = self.selection.clear();
                vec![Event::SelectionChanged(self.selection)]
            }
            Command::MoveWidget { from, to } => match self.reorder.move_item(from, to) {
                Ok(true) => vec![Event::OrderChanged(self.order().clone())],
                Ok(false) => Vec::new(),
                Err(e) => vec![Event::OperationFailed {
                    operation: format!("move widget {from} -> {to}"),
                    error: e.to_string(),
                }],
            },
            Command::ResetOrder => {
                let order = self.reorder.reset().clone();
                vec![Event::OrderChanged(order)]
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::MemoryStore;
    use crate::widget::registry::WidgetKind;
    use std::sync::Arc;

    fn dashboard() -> Dashboard {
        Dashboard::new(OrderStore::new(Arc::new(MemoryStore::new())))
    }

    #[test]
    fn starts_on_selector_with_default_order() {
        let dash = dashboard();
        assert!(dash.selection().is_selector());
        assert_eq!(dash.order(), &WidgetOrder::default());
    }

    #[test]
    fn select_emits_selection_changed() {
        let mut dash = dashboard();
        let events = dash.handle_command(Command::Select(WidgetKind::Finance));
        assert_eq!(
            events,
            vec![Event::SelectionChanged(Selection::Active(WidgetKind::Finance))]
        );
    }

    #[test]
    fn clear_on_selector_emits_nothing() {
        let mut dash = dashboard();
        assert!(dash.handle_command(Command::ClearSelection).is_empty());
    }

    #[test]
    fn clear_after_select_returns_to_selector() {
        let mut dash = dashboard();
        dash.handle_command(Command::Select(WidgetKind::News));
        let events = dash.handle_command(Command::ClearSelection);
        assert_eq!(events, vec![Event::SelectionChanged(Selection::Selector)]);
    }

    #[test]
    fn move_emits_order_changed() {
        let mut dash = dashboard();
        let events = dash.handle_command(Command::MoveWidget { from: 0, to: 2 });
        let expected = WidgetOrder::default().moved(0, 2).unwrap();
        assert_eq!(events, vec![Event::OrderChanged(expected)]);
    }

    #[test]
    fn noop_move_emits_nothing() {
        let mut dash = dashboard();
        assert!(dash
            .handle_command(Command::MoveWidget { from: 1, to: 1 })
            .is_empty());
    }

    #[test]
    fn bad_move_emits_failure() {
        let mut dash = dashboard();
        let events = dash.handle_command(Command::MoveWidget { from: 0, to: 42 });
        assert!(matches!(events.as_slice(), [Event::OperationFailed { .. }]));
    }

    #[test]
    fn reset_emits_default_order() {
        let mut dash = dashboard();
        dash.handle_command(Command::MoveWidget { from: 0, to: 5 });
        let events = dash.handle_command(Command::ResetOrder);
        assert_eq!(events, vec![Event::OrderChanged(WidgetOrder::default())]);
    }

    #[test]
    fn tiles_follow_order() {
        let mut dash = dashboard();
        dash.handle_command(Command::MoveWidget { from: 5, to: 0 });
        assert_eq!(dash.tiles()[0].label, "Spotify");
        assert_eq!(dash.tiles().len(), 6);
    }

    #[test]
    fn selection_is_independent_of_order() {
        let mut dash = dashboard();
        dash.handle_command(Command::Select(WidgetKind::Github));
        dash.handle_command(Command::MoveWidget { from: 3, to: 0 });
        assert_eq!(dash.selection().active(), Some(WidgetKind::Github));
    }
}
