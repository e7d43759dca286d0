//! Which widget, if any, is currently open.

use serde::Serialize;

use crate::widget::registry::WidgetKind;

/// Two-state machine: the selector grid, or one active widget.
///
/// Transitions return a **new** value. There is no terminal state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "widget", rename_all = "lowercase")]
pub enum Selection {
    /// The selector grid is shown.
    #[default]
    Selector,
    /// The detail view of one widget is shown.
    Active(WidgetKind),
}

impl Selection {
    /// Opens `kind`. Switching directly between widgets is allowed.
    #[must_use]
    pub fn select(self, kind: WidgetKind) -> Self {
        Self::Active(kind)
    }

    /// Returns to the selector grid. No-op when already there.
    #[must_use]
    pub fn clear(self) -> Self {
        Self::Selector
    }

    /// The active widget, if any.
    pub fn active(&self) -> Option<WidgetKind> {
        match self {
            Self::Selector => None,
            Self::Active(kind) => Some(*kind),
        }
    }

    pub fn is_selector(&self) -> bool {
        matches!(self, Self::Selector)
    }
}
