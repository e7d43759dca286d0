//! Event system for communication between UI and Core.
//!
//! The UI translates user input into [`Command`]s, which the
//! [`Dashboard`](crate::dashboard::Dashboard) processes and answers with
//! [`Event`]s. This decoupling lets any frontend drive the same logic.

use crate::selection::Selection;
use crate::widget::order::WidgetOrder;
use crate::widget::registry::WidgetKind;

/// An action the UI requests the core to perform.
///
/// Commands flow **UI → Core**. The core never creates commands itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Open the detail view of a widget.
    Select(WidgetKind),
    /// Return to the selector grid.
    ClearSelection,
    /// Move the selector tile at `from` to `to`.
    MoveWidget { from: usize, to: usize },
    /// Restore the catalog order and forget the persisted one.
    ResetOrder,
}

/// A notification the core sends back to the UI.
///
/// Events flow **Core → UI**. The UI uses these to update its display state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// The selection state machine moved to a new state.
    SelectionChanged(Selection),
    /// The widget order changed and has been persisted.
    OrderChanged(WidgetOrder),
    /// A command could not be applied.
    OperationFailed {
        /// Human-readable description of the operation.
        operation: String,
        /// The error message.
        error: String,
    },
}
