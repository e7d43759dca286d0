//! Top headlines by category.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::config::settings::NewsConfig;
use crate::error::{CoreError, CoreResult};
use crate::http::{fetch_json, HttpClient, HttpRequest};
use crate::providers::describe_with;

/// Title marker the provider puts on withdrawn articles.
pub const REMOVED_MARKER: &str = "[Removed]";

const FETCH_FAILED: &str = "Failed to fetch news. Please try again later.";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NewsCategory {
    #[default]
    General,
    Technology,
    Science,
    Business,
    Health,
    Sports,
    Entertainment,
}

impl NewsCategory {
    pub const ALL: [NewsCategory; 7] = [
        NewsCategory::General,
        NewsCategory::Technology,
        NewsCategory::Science,
        NewsCategory::Business,
        NewsCategory::Health,
        NewsCategory::Sports,
        NewsCategory::Entertainment,
    ];

    pub fn id(self) -> &'static str {
        match self {
            Self::General => "general",
            Self::Technology => "technology",
            Self::Science => "science",
            Self::Business => "business",
            Self::Health => "health",
            Self::Sports => "sports",
            Self::Entertainment => "entertainment",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::General => "General",
            Self::Technology => "Technology",
            Self::Science => "Science",
            Self::Business => "Business",
            Self::Health => "Health",
            Self::Sports => "Sports",
            Self::Entertainment => "Entertainment",
        }
    }

    /// The following category, wrapping around.
    #[must_use]
    pub fn next(self) -> Self {
        let index = Self::ALL.iter().position(|c| *c == self).unwrap_or(0);
        Self::ALL[(index + 1) % Self::ALL.len()]
    }
}

impl fmt::Display for NewsCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for NewsCategory {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.id() == s)
            .ok_or_else(|| CoreError::InvalidInput(format!("unknown news category: {s}")))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Article {
    pub title: String,
    pub description: Option<String>,
    pub url: Option<String>,
    pub image_url: Option<String>,
    pub source: String,
    pub published_at: String,
    pub content: Option<String>,
}

impl Article {
    pub fn is_removed(&self) -> bool {
        self.title.contains(REMOVED_MARKER)
    }
}

#[derive(Deserialize)]
struct HeadlinesBody {
    #[serde(default)]
    articles: Vec<RawArticle>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawArticle {
    title: Option<String>,
    description: Option<String>,
    url: Option<String>,
    url_to_image: Option<String>,
    published_at: Option<String>,
    content: Option<String>,
    #[serde(default)]
    source: RawSource,
}

#[derive(Default, Deserialize)]
struct RawSource {
    name: Option<String>,
}

impl From<RawArticle> for Article {
    fn from(raw: RawArticle) -> Self {
        Self {
            title: raw.title.unwrap_or_default(),
            description: raw.description,
            url: raw.url,
            image_url: raw.url_to_image,
            source: raw.source.name.unwrap_or_default(),
            published_at: raw.published_at.unwrap_or_default(),
            content: raw.content,
        }
    }
}

/// Drops every article whose title carries [`REMOVED_MARKER`].
pub fn drop_removed(articles: Vec<Article>) -> Vec<Article> {
    articles.into_iter().filter(|a| !a.is_removed()).collect()
}

pub struct NewsProvider {
    client: Arc<dyn HttpClient>,
    config: NewsConfig,
}

impl NewsProvider {
    pub fn new(client: Arc<dyn HttpClient>, config: NewsConfig) -> Self {
        Self { client, config }
    }

    pub fn items_per_page(&self) -> usize {
        self.config.items_per_page
    }

    /// Headlines for `category`, removed articles already filtered out.
    pub async fn top_headlines(&self, category: NewsCategory) -> CoreResult<Vec<Article>> {
        let request = HttpRequest::get(format!("{}/top-headlines", self.config.base_url))
            .query("category", category.id())
            .query("country", &self.config.country)
            .query("pageSize", self.config.page_size)
            .query("apiKey", &self.config.api_key);
        let body: HeadlinesBody = fetch_json(self.client.as_ref(), request).await?;
        let total = body.articles.len();
        let articles = drop_removed(body.articles.into_iter().map(Article::from).collect());
        tracing::debug!(
            "News {category}: {} articles kept of {total}",
            articles.len()
        );
        Ok(articles)
    }

    pub fn describe_failure(err: &CoreError) -> String {
        describe_with(err, FETCH_FAILED)
    }
}

/// Client-side pagination over a fetched headline list.
#[derive(Debug, Clone, PartialEq)]
pub struct NewsFeed {
    articles: Vec<Article>,
    page: usize,
    per_page: usize,
}

impl NewsFeed {
    /// Starts at the first page. A `per_page` of zero is treated as one.
    pub fn new(articles: Vec<Article>, per_page: usize) -> Self {
        Self {
            articles,
            page: 1,
            per_page: per_page.max(1),
        }
    }

    /// Articles on every page loaded so far.
    pub fn visible(&self) -> &[Article] {
        let end = (self.page * self.per_page).min(self.articles.len());
        &self.articles[..end]
    }

    pub fn has_more(&self) -> bool {
        self.articles.len() > self.page * self.per_page
    }

    /// Reveals one more page. Returns `false` when nothing was left.
    pub fn load_more(&mut self) -> bool {
        if !self.has_more() {
            return false;
        }
        self.page += 1;
        true
    }

    pub fn total(&self) -> usize {
        self.articles.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::StubClient;

    fn article_json(title: &str) -> String {
        format!(
            r#"{{"title": "{title}", "description": "d", "url": "https://n/{title}",
                "urlToImage": null, "publishedAt": "2024-05-01T10:00:00Z",
                "content": "c", "source": {{"id": null, "name": "Wire"}}}}"#
        )
    }

    fn body(titles: &[&str]) -> String {
        let items: Vec<String> = titles.iter().map(|t| article_json(t)).collect();
        format!(r#"{{"status": "ok", "articles": [{}]}}"#, items.join(","))
    }

    fn article(title: &str) -> Article {
        Article {
            title: title.to_string(),
            description: None,
            url: None,
            image_url: None,
            source: String::new(),
            published_at: String::new(),
            content: None,
        }
    }

    // --- category ---

    #[test]
    fn category_defaults_to_general_and_cycles() {
        assert_eq!(NewsCategory::default(), NewsCategory::General);
        assert_eq!(NewsCategory::General.next(), NewsCategory::Technology);
        assert_eq!(NewsCategory::Entertainment.next(), NewsCategory::General);
    }

    #[test]
    fn category_parses_ids() {
        assert_eq!("sports".parse::<NewsCategory>().unwrap(), NewsCategory::Sports);
        assert!("weather".parse::<NewsCategory>().is_err());
    }

    // --- removed filter ---

    #[tokio::test]
    async fn removed_articles_are_excluded() {
        let titles = ["Alpha", "[Removed]", "Beta", "Gamma [Removed]", "Delta"];
        let stub = Arc::new(StubClient::new().ok("top-headlines", body(&titles)));
        let news = NewsProvider::new(stub.clone(), NewsConfig::default());

        let got = news.top_headlines(NewsCategory::Science).await.unwrap();
        assert_eq!(got.len(), titles.len() - 2);
        assert!(got.iter().all(|a| !a.title.contains(REMOVED_MARKER)));
        assert_eq!(got[0].source, "Wire");

        let request = &stub.requests()[0];
        assert_eq!(request.query_value("category"), Some("science"));
        assert_eq!(request.query_value("country"), Some("us"));
        assert_eq!(request.query_value("pageSize"), Some("100"));
    }

    #[tokio::test]
    async fn headline_failure_message() {
        let stub = StubClient::new().route("top-headlines", 426, "{}").into_shared();
        let news = NewsProvider::new(stub, NewsConfig::default());
        let err = news.top_headlines(NewsCategory::General).await.unwrap_err();
        assert_eq!(NewsProvider::describe_failure(&err), FETCH_FAILED);
    }

    // --- pagination ---

    #[test]
    fn feed_reveals_five_at_a_time() {
        let articles: Vec<Article> = (0..12).map(|i| article(&format!("a{i}"))).collect();
        let mut feed = NewsFeed::new(articles, 5);

        assert_eq!(feed.visible().len(), 5);
        assert!(feed.load_more());
        assert_eq!(feed.visible().len(), 10);
        assert!(feed.load_more());
        assert_eq!(feed.visible().len(), 12);
        assert!(!feed.has_more());
        assert!(!feed.load_more());
    }

    #[test]
    fn feed_shorter_than_a_page() {
        let feed = NewsFeed::new(vec![article("only")], 5);
        assert_eq!(feed.visible().len(), 1);
        assert!(!feed.has_more());
    }
}
