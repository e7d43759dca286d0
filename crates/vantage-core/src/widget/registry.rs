//! Static catalog of dashboard widgets.
//!
//! Every selectable widget is represented by the [`WidgetKind`] enum.
//! [`WidgetRegistry`] provides the display metadata (label, accent) and
//! the default catalog order.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Every widget the dashboard can show.
///
/// The serialised form is the lowercase identifier persisted in the
/// widget order (`"weather"`, `"news"`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WidgetKind {
    Weather,
    News,
    Finance,
    Github,
    Movie,
    Spotify,
}

impl WidgetKind {
    /// All widget kinds in default catalog order.
    pub const ALL: [WidgetKind; 6] = [
        WidgetKind::Weather,
        WidgetKind::News,
        WidgetKind::Finance,
        WidgetKind::Github,
        WidgetKind::Movie,
        WidgetKind::Spotify,
    ];

    /// Stable identifier used for persistence.
    pub fn id(self) -> &'static str {
        match self {
            Self::Weather => "weather",
            Self::News => "news",
            Self::Finance => "finance",
            Self::Github => "github",
            Self::Movie => "movie",
            Self::Spotify => "spotify",
        }
    }
}

impl fmt::Display for WidgetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for WidgetKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.id() == s)
            .ok_or_else(|| CoreError::InvalidInput(format!("unknown widget id: {s}")))
    }
}

/// Immutable display metadata for one widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WidgetDescriptor {
    #[serde(rename = "type")]
    pub kind: WidgetKind,
    /// Human-readable title shown on the selector tile.
    pub label: &'static str,
    /// Opaque style token; frontends map it to their own palette.
    pub accent: &'static str,
}

/// The fixed widget catalog.
#[derive(Debug, Clone)]
pub struct WidgetRegistry {
    descriptors: Vec<WidgetDescriptor>,
}

static WEATHER: WidgetDescriptor = WidgetDescriptor {
    kind: WidgetKind::Weather,
    label: "Weather",
    accent: "blue-cyan",
};
static NEWS: WidgetDescriptor = WidgetDescriptor {
    kind: WidgetKind::News,
    label: "News",
    accent: "green-emerald",
};
static FINANCE: WidgetDescriptor = WidgetDescriptor {
    kind: WidgetKind::Finance,
    label: "Finance",
    accent: "purple-pink",
};
static GITHUB: WidgetDescriptor = WidgetDescriptor {
    kind: WidgetKind::Github,
    label: "GitHub",
    accent: "gray",
};
static MOVIE: WidgetDescriptor = WidgetDescriptor {
    kind: WidgetKind::Movie,
    label: "Movies",
    accent: "red-orange",
};
static SPOTIFY: WidgetDescriptor = WidgetDescriptor {
    kind: WidgetKind::Spotify,
    label: "Spotify",
    accent: "green",
};

/// The descriptor for `kind`. Adding a variant fails to compile until it
/// has an entry here.
fn descriptor(kind: WidgetKind) -> &'static WidgetDescriptor {
    match kind {
        WidgetKind::Weather => &WEATHER,
        WidgetKind::News => &NEWS,
        WidgetKind::Finance => &FINANCE,
        WidgetKind::Github => &GITHUB,
        WidgetKind::Movie => &MOVIE,
        WidgetKind::Spotify => &SPOTIFY,
    }
}

impl WidgetRegistry {
    /// Builds the registry containing every known widget.
    pub fn new() -> Self {
        let descriptors = WidgetKind::ALL.into_iter().map(|kind| *descriptor(kind)).collect();
        Self { descriptors }
    }

    /// All descriptors in catalog order.
    pub fn all(&self) -> &[WidgetDescriptor] {
        &self.descriptors
    }

    /// Looks up the descriptor for a widget kind.
    pub fn get(&self, kind: WidgetKind) -> &WidgetDescriptor {
        descriptor(kind)
    }
}

impl Default for WidgetRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn registry_covers_every_kind_once() {
        let reg = WidgetRegistry::new();
        let kinds: HashSet<_> = reg.all().iter().map(|d| d.kind).collect();
        assert_eq!(kinds.len(), WidgetKind::ALL.len());
        assert_eq!(reg.all().len(), WidgetKind::ALL.len());
    }

    #[test]
    fn registry_order_matches_all() {
        let reg = WidgetRegistry::new();
        let kinds: Vec<_> = reg.all().iter().map(|d| d.kind).collect();
        assert_eq!(kinds, WidgetKind::ALL.to_vec());
    }

    #[test]
    fn get_returns_matching_descriptor() {
        let reg = WidgetRegistry::new();
        for kind in WidgetKind::ALL {
            assert_eq!(reg.get(kind).kind, kind);
        }
        assert_eq!(reg.get(WidgetKind::Movie).label, "Movies");
    }

    #[test]
    fn lookup_agrees_with_catalog_entries() {
        let reg = WidgetRegistry::new();
        for d in reg.all() {
            assert_eq!(reg.get(d.kind), d);
        }
        assert_eq!(reg.get(WidgetKind::Spotify).accent, "green");
        assert_ne!(reg.get(WidgetKind::Spotify), reg.get(WidgetKind::Weather));
    }

    #[test]
    fn ids_round_trip_through_from_str() {
        for kind in WidgetKind::ALL {
            assert_eq!(kind.id().parse::<WidgetKind>().unwrap(), kind);
        }
    }

    #[test]
    fn unknown_id_is_rejected() {
        assert!(matches!(
            "calendar".parse::<WidgetKind>(),
            Err(CoreError::InvalidInput(_))
        ));
    }

    #[test]
    fn serde_uses_lowercase_ids() {
        let json = serde_json::to_string(&WidgetKind::Github).unwrap();
        assert_eq!(json, "\"github\"");
        let kind: WidgetKind = serde_json::from_str("\"spotify\"").unwrap();
        assert_eq!(kind, WidgetKind::Spotify);
    }

    #[test]
    fn descriptor_serialises_kind_as_type() {
        let reg = WidgetRegistry::new();
        let value = serde_json::to_value(reg.get(WidgetKind::News)).unwrap();
        assert_eq!(value["type"], "news");
        assert_eq!(value["label"], "News");
    }
}
