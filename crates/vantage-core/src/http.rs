//! HTTP seam shared by every provider adapter.
//!
//! Adapters never talk to `reqwest` directly. They build an [`HttpRequest`],
//! hand it to an [`HttpClient`], and decode the body with [`fetch_json`].
//! Tests substitute `StubClient`, built with the `test-support` feature.

#[cfg(any(test, feature = "test-support"))]
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde::de::DeserializeOwned;

use crate::error::{CoreError, CoreResult};

/// A GET request: base URL, query pairs and an optional bearer token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub url: String,
    pub query: Vec<(String, String)>,
    pub bearer: Option<String>,
}

impl HttpRequest {
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            query: Vec::new(),
            bearer: None,
        }
    }

    #[must_use]
    pub fn query(mut self, key: &str, value: impl ToString) -> Self {
        self.query.push((key.to_string(), value.to_string()));
        self
    }

    #[must_use]
    pub fn bearer(mut self, token: impl Into<String>) -> Self {
        self.bearer = Some(token.into());
        self
    }

    /// Value of the first query pair named `key`.
    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// The URL with its query string, secrets redacted. Used for logs and
    /// error messages.
    pub fn display_url(&self) -> String {
        if self.query.is_empty() {
            return self.url.clone();
        }
        let pairs = self.query.iter().map(|(k, v)| {
            let shown = if is_secret(k) { "***" } else { v.as_str() };
            (k.as_str(), shown)
        });
        match url::Url::parse_with_params(&self.url, pairs) {
            Ok(u) => u.to_string(),
            Err(_) => self.url.clone(),
        }
    }
}

fn is_secret(key: &str) -> bool {
    matches!(key, "apiKey" | "api_key" | "apikey" | "token")
}

/// Status code and raw body of a response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Performs GET requests on behalf of the provider adapters.
#[async_trait]
pub trait HttpClient: Send + Sync {
    /// Sends `request`. A non-success status is still `Ok`; only a
    /// request that could not complete is an error.
    async fn get(&self, request: HttpRequest) -> CoreResult<HttpResponse>;
}

/// Sends `request` and decodes a JSON body into `T`.
///
/// # Errors
///
/// - [`CoreError::Transport`] if the request could not complete.
/// - [`CoreError::Http`] for any non-2xx status.
/// - [`CoreError::Decode`] if the body does not match `T`.
pub async fn fetch_json<T: DeserializeOwned>(
    client: &dyn HttpClient,
    request: HttpRequest,
) -> CoreResult<T> {
    let shown = request.display_url();
    tracing::debug!("GET {shown}");
    let response = client.get(request).await?;
    if !response.is_success() {
        return Err(CoreError::Http {
            status: response.status,
            url: shown,
        });
    }
    serde_json::from_str(&response.body).map_err(|e| CoreError::Decode(format!("{shown}: {e}")))
}

/// Production client backed by `reqwest` with rustls.
#[derive(Debug, Clone)]
pub struct ReqwestClient {
    inner: reqwest::Client,
}

impl ReqwestClient {
    /// Builds a client that sends `user_agent` on every request. The
    /// geocoder and the repository API both reject anonymous agents.
    pub fn new(user_agent: &str) -> CoreResult<Self> {
        let inner = reqwest::Client::builder()
            .user_agent(user_agent)
            .build()
            .map_err(|e| CoreError::Transport(e.to_string()))?;
        Ok(Self { inner })
    }
}

#[async_trait]
impl HttpClient for ReqwestClient {
    async fn get(&self, request: HttpRequest) -> CoreResult<HttpResponse> {
        let mut builder = self.inner.get(&request.url).query(&request.query);
        if let Some(token) = &request.bearer {
            builder = builder.bearer_auth(token);
        }
        let response = builder
            .send()
            .await
            .map_err(|e| CoreError::Transport(e.to_string()))?;
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| CoreError::Transport(e.to_string()))?;
        Ok(HttpResponse { status, body })
    }
}

/// In-memory [`HttpClient`] that answers from canned routes and records
/// every request it sees.
///
/// A route matches when its pattern is a substring of the request URL; the
/// longest matching pattern wins, so `repos/o/r/commits` beats `repos/o/r`.
/// A route added later overrides an earlier one with the same pattern.
#[cfg(any(test, feature = "test-support"))]
#[derive(Debug, Default)]
pub struct StubClient {
    routes: Vec<(String, HttpResponse)>,
    seen: Mutex<Vec<HttpRequest>>,
}

#[cfg(any(test, feature = "test-support"))]
impl StubClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answers requests matching `pattern` with `status` and `body`.
    #[must_use]
    pub fn route(mut self, pattern: &str, status: u16, body: impl Into<String>) -> Self {
        self.routes
            .push((pattern.to_string(), HttpResponse::new(status, body)));
        self
    }

    /// Shorthand for a 200 route.
    #[must_use]
    pub fn ok(self, pattern: &str, body: impl Into<String>) -> Self {
        self.route(pattern, 200, body)
    }

    pub fn into_shared(self) -> Arc<dyn HttpClient> {
        Arc::new(self)
    }

    /// Requests received so far, in order.
    pub fn requests(&self) -> Vec<HttpRequest> {
        self.seen
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests().len()
    }
}

#[cfg(any(test, feature = "test-support"))]
#[async_trait]
impl HttpClient for StubClient {
    async fn get(&self, request: HttpRequest) -> CoreResult<HttpResponse> {
        let matched = self
            .routes
            .iter()
            .filter(|(pattern, _)| request.url.contains(pattern.as_str()))
            .max_by_key(|(pattern, _)| pattern.len())
            .map(|(_, response)| response.clone());
        let url = request.url.clone();
        self.seen
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(request);
        matched.ok_or_else(|| CoreError::Transport(format!("no stub route for {url}")))
    }
}
