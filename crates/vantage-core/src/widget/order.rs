//! The user's preferred ordering of the widget catalog.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::widget::registry::WidgetKind;

/// An ordered permutation of every [`WidgetKind`].
///
/// The type upholds the invariant that the set of kinds always equals the
/// full catalog: construction from untrusted data goes through
/// [`WidgetOrder::from_kinds`], and the only mutation is [`WidgetOrder::moved`],
/// which returns a **new** order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct WidgetOrder(Vec<WidgetKind>);

/// One element of a persisted order. Older state stored whole descriptor
/// objects (`{"type": "news", ...}`) instead of bare identifiers.
#[derive(Deserialize)]
#[serde(untagged)]
enum PersistedEntry {
    Id(String),
    Descriptor {
        #[serde(rename = "type")]
        kind: String,
    },
}

impl WidgetOrder {
    /// Validates that `kinds` is a permutation of the catalog.
    ///
    /// Returns `None` on wrong length or duplicates.
    pub fn from_kinds(kinds: Vec<WidgetKind>) -> Option<Self> {
        if kinds.len() != WidgetKind::ALL.len() {
            return None;
        }
        let unique: HashSet<_> = kinds.iter().copied().collect();
        if unique.len() != kinds.len() {
            return None;
        }
        Some(Self(kinds))
    }

    /// Parses a persisted JSON order, returning `None` if it fails the
    /// structural check (not an array, unknown id, wrong length, duplicate).
    pub fn from_json(raw: &str) -> Option<Self> {
        let entries: Vec<PersistedEntry> = serde_json::from_str(raw).ok()?;
        let kinds = entries
            .into_iter()
            .map(|entry| match entry {
                PersistedEntry::Id(id) | PersistedEntry::Descriptor { kind: id } => {
                    id.parse::<WidgetKind>().ok()
                }
            })
            .collect::<Option<Vec<_>>>()?;
        Self::from_kinds(kinds)
    }

    /// Serialises the order as a JSON array of identifiers.
    pub fn to_json(&self) -> CoreResult<String> {
        Ok(serde_json::to_string(&self.0)?)
    }

    /// Returns a new order with the element at `from` removed and
    /// reinserted at `to`.
    ///
    /// This is a stable move, not a swap: every other element keeps its
    /// relative position. `from == to` returns an identical order.
    ///
    /// # Errors
    ///
    /// [`CoreError::InvalidInput`] if either index is out of range.
    pub fn moved(&self, from: usize, to: usize) -> CoreResult<Self> {
        let len = self.0.len();
        if from >= len || to >= len {
            return Err(CoreError::InvalidInput(format!(
                "move {from} -> {to} out of range for {len} widgets"
            )));
        }
        let mut kinds = self.0.clone();
        let kind = kinds.remove(from);
        kinds.insert(to, kind);
        Ok(Self(kinds))
    }

    pub fn as_slice(&self) -> &[WidgetKind] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = WidgetKind> + '_ {
        self.0.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the kind at `index`, if any.
    pub fn get(&self, index: usize) -> Option<WidgetKind> {
        self.0.get(index).copied()
    }

    /// Position of `kind` in this order.
    pub fn position(&self, kind: WidgetKind) -> Option<usize> {
        self.0.iter().position(|k| *k == kind)
    }
}

impl Default for WidgetOrder {
    /// Catalog order.
    fn default() -> Self {
        Self(WidgetKind::ALL.to_vec())
    }
}
