//! Persisted music-streaming access token.

use std::sync::Arc;
use std::time::Duration;

use crate::error::CoreResult;
use crate::store::{keys, KeyValueStore};

/// Default lifetime of an implicit-grant token.
pub const DEFAULT_TTL: Duration = Duration::from_secs(3600);

/// Milliseconds since the Unix epoch, the unit token expiries are stored in.
pub fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Reads and writes the token and its absolute expiry.
#[derive(Clone)]
pub struct TokenStore {
    store: Arc<dyn KeyValueStore>,
    default_ttl: Duration,
}

impl TokenStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            default_ttl: DEFAULT_TTL,
        }
    }

    /// Lifetime assumed when the provider does not state one.
    #[must_use]
    pub fn with_default_ttl(mut self, ttl: Duration) -> Self {
        self.default_ttl = ttl;
        self
    }

    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    /// Persists `token`, valid until `expires_at_ms`.
    ///
    /// The old expiry is cleared before the token is replaced, so a write
    /// that fails part-way leaves no valid token behind.
    pub fn save(&self, token: &str, expires_at_ms: i64) -> CoreResult<()> {
        self.store.remove(keys::MUSIC_TOKEN_EXPIRY)?;
        self.store.set(keys::MUSIC_TOKEN, token)?;
        self.store
            .set(keys::MUSIC_TOKEN_EXPIRY, &expires_at_ms.to_string())?;
        tracing::info!("Stored music token, expires at {expires_at_ms}");
        Ok(())
    }

    /// Stored expiry, if present and numeric.
    pub fn expires_at(&self) -> Option<i64> {
        match self.store.get(keys::MUSIC_TOKEN_EXPIRY) {
            Ok(Some(raw)) => raw.trim().parse().ok(),
            Ok(None) => None,
            Err(e) => {
                tracing::warn!("Failed to read token expiry: {e}");
                None
            }
        }
    }

    /// The token, only while `now_ms < expiry`.
    ///
    /// A missing or malformed expiry means no valid token.
    pub fn valid_token(&self, now_ms: i64) -> Option<String> {
        let expiry = self.expires_at()?;
        if now_ms >= expiry {
            return None;
        }
        match self.store.get(keys::MUSIC_TOKEN) {
            Ok(token) => token.filter(|t| !t.is_empty()),
            Err(e) => {
                tracing::warn!("Failed to read music token: {e}");
                None
            }
        }
    }

    pub fn is_connected(&self, now_ms: i64) -> bool {
        self.valid_token(now_ms).is_some()
    }

    /// Forgets the token and its expiry.
    pub fn logout(&self) -> CoreResult<()> {
        self.store.remove(keys::MUSIC_TOKEN)?;
        self.store.remove(keys::MUSIC_TOKEN_EXPIRY)?;
        tracing::info!("Cleared music token");
        Ok(())
    }
}
