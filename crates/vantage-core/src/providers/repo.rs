//! Source-repository statistics from a pasted URL.

use std::sync::{Arc, OnceLock};

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::config::settings::GithubConfig;
use crate::error::{CoreError, CoreResult};
use crate::http::{fetch_json, HttpClient, HttpRequest};
use crate::providers::describe_with;

/// Commits and contributors shown per repository.
pub const MAX_LISTED: usize = 5;

pub const INVALID_URL: &str = "Invalid GitHub repository URL";
const FETCH_FAILED: &str = "Failed to fetch repository data. Please check the URL and try again.";

/// `owner/name` pair identifying a repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RepoRef {
    pub owner: String,
    pub name: String,
}

impl RepoRef {
    /// Extracts `owner/name` from anything containing `github.com/owner/name`.
    ///
    /// A trailing `.git`, query string and fragment are ignored.
    ///
    /// # Errors
    ///
    /// [`CoreError::InvalidInput`] when the text holds no such pattern.
    pub fn parse(input: &str) -> CoreResult<Self> {
        static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
        let pattern = PATTERN
            .get_or_init(|| Regex::new(r"github\.com/([^/\s?#]+)/([^/\s?#]+)").ok())
            .as_ref()
            .ok_or_else(|| CoreError::InvalidInput(INVALID_URL.to_string()))?;
        let caps = pattern
            .captures(input.trim())
            .ok_or_else(|| CoreError::InvalidInput(INVALID_URL.to_string()))?;
        let owner = caps[1].to_string();
        let name = caps[2].trim_end_matches(".git").to_string();
        if name.is_empty() {
            return Err(CoreError::InvalidInput(INVALID_URL.to_string()));
        }
        Ok(Self { owner, name })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommitSummary {
    pub sha: String,
    /// First line of the commit message.
    pub message: String,
    pub author: String,
    pub date: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Contributor {
    pub login: String,
    pub avatar_url: String,
    pub contributions: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RepoStats {
    pub name: String,
    pub description: Option<String>,
    pub stars: u64,
    pub forks: u64,
    pub watchers: u64,
    pub commits: Vec<CommitSummary>,
    pub contributors: Vec<Contributor>,
}

#[derive(Deserialize)]
struct RawRepo {
    name: String,
    description: Option<String>,
    #[serde(default)]
    stargazers_count: u64,
    #[serde(default)]
    forks_count: u64,
    #[serde(default)]
    watchers_count: u64,
}

#[derive(Deserialize)]
struct RawCommit {
    sha: String,
    commit: RawCommitDetail,
}

#[derive(Deserialize)]
struct RawCommitDetail {
    message: String,
    author: Option<RawAuthor>,
}

#[derive(Deserialize)]
struct RawAuthor {
    #[serde(default)]
    name: String,
    #[serde(default)]
    date: String,
}

#[derive(Deserialize)]
struct RawContributor {
    login: String,
    #[serde(default)]
    avatar_url: String,
    #[serde(default)]
    contributions: u64,
}

impl From<RawCommit> for CommitSummary {
    fn from(raw: RawCommit) -> Self {
        let (author, date) = raw
            .commit
            .author
            .map(|a| (a.name, a.date))
            .unwrap_or_default();
        Self {
            sha: raw.sha,
            message: raw.commit.message.lines().next().unwrap_or_default().to_string(),
            author,
            date,
        }
    }
}

pub struct RepoProvider {
    client: Arc<dyn HttpClient>,
    config: GithubConfig,
}

impl RepoProvider {
    pub fn new(client: Arc<dyn HttpClient>, config: GithubConfig) -> Self {
        Self { client, config }
    }

    fn request(&self, url: String) -> HttpRequest {
        let request = HttpRequest::get(url);
        match &self.config.token {
            Some(token) => request.bearer(token),
            None => request,
        }
    }

    /// Metadata, recent commits and top contributors, fetched concurrently.
    pub async fn stats(&self, repo: &RepoRef) -> CoreResult<RepoStats> {
        let base = format!(
            "{}/repos/{}/{}",
            self.config.base_url, repo.owner, repo.name
        );
        let client = self.client.as_ref();
        let (meta, commits, contributors) = tokio::try_join!(
            fetch_json::<RawRepo>(client, self.request(base.clone())),
            fetch_json::<Vec<RawCommit>>(
                client,
                self.request(format!("{base}/commits")).query("per_page", MAX_LISTED)
            ),
            fetch_json::<Vec<RawContributor>>(
                client,
                self.request(format!("{base}/contributors")).query("per_page", MAX_LISTED)
            ),
        )?;
        Ok(RepoStats {
            name: meta.name,
            description: meta.description,
            stars: meta.stargazers_count,
            forks: meta.forks_count,
            watchers: meta.watchers_count,
            commits: commits
                .into_iter()
                .take(MAX_LISTED)
                .map(CommitSummary::from)
                .collect(),
            contributors: contributors
                .into_iter()
                .take(MAX_LISTED)
                .map(|c| Contributor {
                    login: c.login,
                    avatar_url: c.avatar_url,
                    contributions: c.contributions,
                })
                .collect(),
        })
    }

    /// Parses `url` and fetches its stats. An unparseable URL fails before
    /// any request is made.
    pub async fn stats_for_url(&self, url: &str) -> CoreResult<RepoStats> {
        let repo = RepoRef::parse(url)?;
        self.stats(&repo).await
    }

    pub fn describe_failure(err: &CoreError) -> String {
        describe_with(err, FETCH_FAILED)
    }
}
