//! Film metadata: weekly trending, title search and autocomplete.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::config::settings::FilmConfig;
use crate::error::{CoreError, CoreResult};
use crate::http::{fetch_json, HttpClient, HttpRequest};
use crate::providers::describe_with;

/// Autocomplete entries shown under the search box.
pub const MAX_AUTOCOMPLETE: usize = 5;

const TRENDING_FAILED: &str = "Failed to fetch trending movies";
const SEARCH_FAILED: &str = "Failed to search movies";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    pub id: u64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub vote_average: f64,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub overview: String,
}

impl Movie {
    /// Full poster URL under `image_base`, if the film has a poster.
    pub fn poster_url(&self, image_base: &str) -> Option<String> {
        self.poster_path
            .as_deref()
            .map(|path| format!("{}/{}", image_base.trim_end_matches('/'), path.trim_start_matches('/')))
    }

    /// Release year, when the date is present.
    pub fn year(&self) -> Option<&str> {
        self.release_date
            .as_deref()
            .and_then(|d| d.get(..4))
            .filter(|y| !y.is_empty())
    }
}

#[derive(Deserialize)]
struct ResultsBody {
    #[serde(default)]
    results: Vec<Movie>,
}

pub struct FilmProvider {
    client: Arc<dyn HttpClient>,
    config: FilmConfig,
}

impl FilmProvider {
    pub fn new(client: Arc<dyn HttpClient>, config: FilmConfig) -> Self {
        Self { client, config }
    }

    pub fn image_base_url(&self) -> &str {
        &self.config.image_base_url
    }

    pub async fn trending(&self) -> CoreResult<Vec<Movie>> {
        let request = HttpRequest::get(format!("{}/trending/movie/week", self.config.base_url))
            .query("api_key", &self.config.api_key);
        let body: ResultsBody = fetch_json(self.client.as_ref(), request).await?;
        Ok(body.results)
    }

    /// Films matching `query`. A blank query returns nothing without a
    /// request.
    pub async fn search(&self, query: &str) -> CoreResult<Vec<Movie>> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }
        let request = HttpRequest::get(format!("{}/search/movie", self.config.base_url))
            .query("api_key", &self.config.api_key)
            .query("query", query);
        let body: ResultsBody = fetch_json(self.client.as_ref(), request).await?;
        Ok(body.results)
    }

    /// The first [`MAX_AUTOCOMPLETE`] search hits.
    pub async fn autocomplete(&self, query: &str) -> CoreResult<Vec<Movie>> {
        let mut hits = self.search(query).await?;
        hits.truncate(MAX_AUTOCOMPLETE);
        Ok(hits)
    }

    pub fn describe_trending_failure(err: &CoreError) -> String {
        describe_with(err, TRENDING_FAILED)
    }

    pub fn describe_failure(err: &CoreError) -> String {
        describe_with(err, SEARCH_FAILED)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::StubClient;

    fn results(n: usize) -> String {
        let items: Vec<String> = (0..n)
            .map(|i| {
                format!(
                    r#"{{"id": {i}, "title": "Film {i}", "poster_path": "/p{i}.jpg", "vote_average": 7.5, "release_date": "2023-0{}-01", "overview": "o"}}"#,
                    i % 9 + 1
                )
            })
            .collect();
        format!(r#"{{"page": 1, "results": [{}]}}"#, items.join(","))
    }

    fn provider(stub: StubClient) -> (Arc<StubClient>, FilmProvider) {
        let stub = Arc::new(stub);
        (stub.clone(), FilmProvider::new(stub, FilmConfig::default()))
    }

    #[tokio::test]
    async fn trending_returns_all_results() {
        let (stub, film) = provider(StubClient::new().ok("trending/movie/week", results(20)));
        let got = film.trending().await.unwrap();
        assert_eq!(got.len(), 20);
        assert!(stub.requests()[0].query_value("api_key").is_some());
    }

    #[tokio::test]
    async fn search_sends_query() {
        let (stub, film) = provider(StubClient::new().ok("search/movie", results(8)));
        let got = film.search("dune").await.unwrap();
        assert_eq!(got.len(), 8);
        assert_eq!(stub.requests()[0].query_value("query"), Some("dune"));
    }

    #[tokio::test]
    async fn blank_search_makes_no_request() {
        let (stub, film) = provider(StubClient::new());
        assert!(film.search("   ").await.unwrap().is_empty());
        assert_eq!(stub.request_count(), 0);
    }

    #[tokio::test]
    async fn autocomplete_truncates_to_five() {
        let (_, film) = provider(StubClient::new().ok("search/movie", results(8)));
        let got = film.autocomplete("du").await.unwrap();
        assert_eq!(got.len(), MAX_AUTOCOMPLETE);
        assert_eq!(got[0].title, "Film 0");
    }

    #[tokio::test]
    async fn trending_failure_message() {
        let (_, film) = provider(StubClient::new().route("trending", 401, "{}"));
        let err = film.trending().await.unwrap_err();
        assert_eq!(FilmProvider::describe_trending_failure(&err), TRENDING_FAILED);
    }

    #[test]
    fn poster_url_joins_base() {
        let movie = Movie {
            id: 1,
            title: "x".to_string(),
            poster_path: Some("/abc.jpg".to_string()),
            vote_average: 0.0,
            release_date: Some("1999-03-31".to_string()),
            overview: String::new(),
        };
        assert_eq!(
            movie.poster_url("https://image.tmdb.org/t/p/w500").as_deref(),
            Some("https://image.tmdb.org/t/p/w500/abc.jpg")
        );
        assert_eq!(movie.year(), Some("1999"));
    }

    #[test]
    fn missing_poster_and_date() {
        let movie: Movie = serde_json::from_str(r#"{"id": 2, "poster_path": null, "release_date": ""}"#).unwrap();
        assert_eq!(movie.poster_url("https://i"), None);
        assert_eq!(movie.year(), None);
    }
}
