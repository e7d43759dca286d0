//! Implicit-grant authorize URL and callback handling.

use std::collections::HashMap;

use serde::Serialize;

use crate::auth::token::TokenStore;
use crate::config::settings::MusicConfig;
use crate::error::{CoreError, CoreResult};

/// Where the callback always sends the user afterwards.
pub const HOME_ROUTE: &str = "/";

/// Parameters of the authorize redirect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OAuthConfig {
    pub authorize_url: String,
    pub client_id: String,
    pub redirect_uri: String,
    pub scopes: Vec<String>,
}

impl From<&MusicConfig> for OAuthConfig {
    fn from(config: &MusicConfig) -> Self {
        Self {
            authorize_url: config.authorize_url.clone(),
            client_id: config.client_id.clone(),
            redirect_uri: config.redirect_uri.clone(),
            scopes: config.scopes.clone(),
        }
    }
}

impl OAuthConfig {
    /// The URL to send the browser to for login.
    ///
    /// # Errors
    ///
    /// [`CoreError::InvalidInput`] if no client id is configured or the
    /// configured authorize endpoint is not a URL.
    pub fn authorize_url(&self) -> CoreResult<String> {
        if self.client_id.is_empty() {
            return Err(CoreError::InvalidInput(
                "Music client id is not configured.".to_string(),
            ));
        }
        let scope = self.scopes.join(" ");
        let url = url::Url::parse_with_params(
            &self.authorize_url,
            [
                ("client_id", self.client_id.as_str()),
                ("redirect_uri", self.redirect_uri.as_str()),
                ("scope", scope.as_str()),
                ("response_type", "token"),
                ("show_dialog", "true"),
            ],
        )
        .map_err(|e| CoreError::InvalidInput(format!("bad authorize url: {e}")))?;
        Ok(url.to_string())
    }
}

/// Splits a URL fragment into its `key=value` pairs.
///
/// The leading `#` is optional. Each piece is split at its first `=`;
/// a piece without one maps to an empty value. Both sides are
/// percent-decoded. Empty pieces are skipped and the last duplicate wins.
pub fn parse_fragment(fragment: &str) -> HashMap<String, String> {
    let fragment = fragment.strip_prefix('#').unwrap_or(fragment);
    fragment
        .split('&')
        .filter(|piece| !piece.is_empty())
        .map(|piece| {
            let (key, value) = piece.split_once('=').unwrap_or((piece, ""));
            (decode(key), decode(value))
        })
        .collect()
}

fn decode(raw: &str) -> String {
    urlencoding::decode(raw)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| raw.to_string())
}

/// Result of processing the provider's redirect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CallbackOutcome {
    pub authenticated: bool,
    /// Always [`HOME_ROUTE`]: failures land on the main view too.
    pub redirect: &'static str,
}

/// Persists the token carried by `fragment`.
///
/// Expiry is `now_ms + expires_in` seconds, falling back to the store's
/// default lifetime when `expires_in` is absent or not a positive number.
/// No token, or a failed write, yields an unauthenticated outcome with
/// nothing persisted. The redirect is [`HOME_ROUTE`] either way.
pub fn complete_callback(fragment: &str, tokens: &TokenStore, now_ms: i64) -> CallbackOutcome {
    let params = parse_fragment(fragment);
    let unauthenticated = CallbackOutcome {
        authenticated: false,
        redirect: HOME_ROUTE,
    };

    let Some(token) = params.get("access_token").filter(|t| !t.is_empty()) else {
        match params.get("error") {
            Some(reason) => tracing::error!("Music login failed: {reason}"),
            None => tracing::error!("No access token found in callback"),
        }
        return unauthenticated;
    };

    let ttl_secs = params
        .get("expires_in")
        .and_then(|raw| raw.parse::<u64>().ok())
        .filter(|secs| *secs > 0)
        .unwrap_or_else(|| tokens.default_ttl().as_secs());
    let ttl_ms = i64::try_from(ttl_secs.saturating_mul(1000)).unwrap_or(i64::MAX);
    let expires_at = now_ms.saturating_add(ttl_ms);

    if let Err(e) = tokens.save(token, expires_at) {
        tracing::error!("Failed to persist music token: {e}");
        return unauthenticated;
    }
    CallbackOutcome {
        authenticated: true,
        redirect: HOME_ROUTE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::MemoryStore;
    use crate::store::{keys, KeyValueStore};
    use std::sync::Arc;
    use std::time::Duration;

    fn tokens() -> (Arc<MemoryStore>, TokenStore) {
        let backing = Arc::new(MemoryStore::new());
        (backing.clone(), TokenStore::new(backing))
    }

    fn oauth() -> OAuthConfig {
        OAuthConfig {
            client_id: "cid".to_string(),
            ..OAuthConfig::from(&MusicConfig::default())
        }
    }

    // --- authorize url ---

    #[test]
    fn authorize_url_carries_all_parameters() {
        let raw = oauth().authorize_url().unwrap();
        let url = url::Url::parse(&raw).unwrap();
        let pairs: HashMap<String, String> = url.query_pairs().into_owned().collect();

        assert!(raw.starts_with("https://accounts.spotify.com/authorize?"));
        assert_eq!(pairs["client_id"], "cid");
        assert_eq!(pairs["redirect_uri"], "http://localhost:3000/callback");
        assert_eq!(
            pairs["scope"],
            "user-top-read playlist-read-private user-read-recently-played"
        );
        assert_eq!(pairs["response_type"], "token");
        assert_eq!(pairs["show_dialog"], "true");
    }

    #[test]
    fn authorize_url_requires_client_id() {
        let config = OAuthConfig::from(&MusicConfig::default());
        assert!(matches!(config.authorize_url(), Err(CoreError::InvalidInput(_))));
    }

    // --- fragment parsing ---

    #[test]
    fn parse_fragment_with_hash() {
        let params = parse_fragment("#access_token=abc&token_type=Bearer&expires_in=3600");
        assert_eq!(params["access_token"], "abc");
        assert_eq!(params["token_type"], "Bearer");
        assert_eq!(params["expires_in"], "3600");
    }

    #[test]
    fn parse_fragment_decodes_and_splits_at_first_equals() {
        let params = parse_fragment("state=a%20b&token=x=y");
        assert_eq!(params["state"], "a b");
        assert_eq!(params["token"], "x=y");
    }

    #[test]
    fn parse_fragment_skips_empty_pieces() {
        let params = parse_fragment("#&&flag&a=1&");
        assert_eq!(params.len(), 2);
        assert_eq!(params["flag"], "");
        assert_eq!(params["a"], "1");
    }

    #[test]
    fn parse_empty_fragment() {
        assert!(parse_fragment("").is_empty());
        assert!(parse_fragment("#").is_empty());
    }

    // --- callback ---

    #[test]
    fn callback_persists_token_with_stated_expiry() {
        let (_, store) = tokens();
        let outcome = complete_callback("#access_token=abc&expires_in=600", &store, 1_000);
        assert_eq!(
            outcome,
            CallbackOutcome {
                authenticated: true,
                redirect: "/"
            }
        );
        assert_eq!(store.expires_at(), Some(601_000));
        assert_eq!(store.valid_token(600_999).as_deref(), Some("abc"));
        assert_eq!(store.valid_token(601_000), None);
    }

    #[test]
    fn callback_defaults_expiry_to_an_hour() {
        let (_, store) = tokens();
        complete_callback("access_token=abc", &store, 0);
        assert_eq!(store.expires_at(), Some(3_600_000));
    }

    #[test]
    fn callback_with_malformed_expiry_uses_store_default() {
        let (_, store) = tokens();
        let store = store.with_default_ttl(Duration::from_secs(10));
        complete_callback("access_token=abc&expires_in=soon", &store, 0);
        assert_eq!(store.expires_at(), Some(10_000));
    }

    #[test]
    fn callback_without_token_persists_nothing_and_goes_home() {
        let (backing, store) = tokens();
        let outcome = complete_callback("#error=access_denied&state=x", &store, 0);

        assert!(!outcome.authenticated);
        assert_eq!(outcome.redirect, HOME_ROUTE);
        assert_eq!(backing.get(keys::MUSIC_TOKEN).unwrap(), None);
        assert_eq!(backing.get(keys::MUSIC_TOKEN_EXPIRY).unwrap(), None);
        assert!(!store.is_connected(0));
    }

    #[test]
    fn callback_with_empty_token_is_unauthenticated() {
        let (backing, store) = tokens();
        assert!(!complete_callback("access_token=", &store, 0).authenticated);
        assert!(backing.is_empty());
    }
}
