//! Key-value persistence for client state.
//!
//! [`KeyValueStore`] is the only way the core touches persisted state. The
//! [`memory::MemoryStore`] keeps everything in process (tests, ephemeral
//! sessions); [`file::FileStore`] keeps one JSON document on disk.

pub mod file;
pub mod memory;
pub mod order_store;

use crate::error::CoreResult;

/// Well-known keys for persisted entries.
pub mod keys {
    /// Serialised [`WidgetOrder`](crate::widget::order::WidgetOrder).
    pub const WIDGET_ORDER: &str = "widgetsOrder";
    /// Music-streaming bearer token.
    pub const MUSIC_TOKEN: &str = "spotify_access_token";
    /// Absolute token expiry, milliseconds since the Unix epoch.
    pub const MUSIC_TOKEN_EXPIRY: &str = "spotify_token_expiry";
}

/// String-keyed persistence with last-write-wins semantics.
///
/// Methods take `&self` so one store can be shared behind an `Arc` by the
/// order store and the token store.
pub trait KeyValueStore: Send + Sync {
    /// Reads the value stored under `key`.
    fn get(&self, key: &str) -> CoreResult<Option<String>>;

    /// Overwrites the value stored under `key`.
    fn set(&self, key: &str, value: &str) -> CoreResult<()>;

    /// Removes `key`. Removing a missing key is not an error.
    fn remove(&self, key: &str) -> CoreResult<()>;
}
