//! Persistence boundary for the widget ordering preference.

use std::sync::Arc;

use crate::error::CoreResult;
use crate::store::{keys, KeyValueStore};
use crate::widget::order::WidgetOrder;

/// Loads, saves and resets the persisted [`WidgetOrder`].
#[derive(Clone)]
pub struct OrderStore {
    store: Arc<dyn KeyValueStore>,
}

impl OrderStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Reads the persisted order.
    ///
    /// Never fails: a missing entry, a read error, or an entry that fails
    /// the structural check all yield the catalog order.
    pub fn load(&self) -> WidgetOrder {
        match self.store.get(keys::WIDGET_ORDER) {
            Ok(Some(raw)) => WidgetOrder::from_json(&raw).unwrap_or_else(|| {
                tracing::warn!("Persisted widget order is malformed, using defaults");
                WidgetOrder::default()
            }),
            Ok(None) => WidgetOrder::default(),
            Err(e) => {
                tracing::warn!("Failed to read widget order: {e}");
                WidgetOrder::default()
            }
        }
    }

    /// Overwrites the persisted order.
    pub fn save(&self, order: &WidgetOrder) -> CoreResult<()> {
        let raw = order.to_json()?;
        self.store.set(keys::WIDGET_ORDER, &raw)?;
        tracing::debug!("Saved widget order: {raw}");
        Ok(())
    }

    /// Clears the persisted order and returns the catalog order.
    pub fn reset(&self) -> WidgetOrder {
        if let Err(e) = self.store.remove(keys::WIDGET_ORDER) {
            tracing::warn!("Failed to clear widget order: {e}");
        }
        WidgetOrder::default()
    }
}
