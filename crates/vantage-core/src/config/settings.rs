//! Application configuration loaded from a TOML file.
//!
//! Every section has defaults pointing at the public provider endpoints, so
//! Vantage starts without a config file. API keys default to empty and are
//! usually supplied through the environment.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::fetch::debounce::SuggestPolicy;

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub weather: WeatherConfig,
    #[serde(default)]
    pub news: NewsConfig,
    #[serde(default)]
    pub finance: FinanceConfig,
    #[serde(default)]
    pub github: GithubConfig,
    #[serde(default)]
    pub film: FilmConfig,
    #[serde(default)]
    pub music: MusicConfig,
}

impl Config {
    /// Loads configuration from a TOML file at `path`.
    ///
    /// # Errors
    ///
    /// - [`CoreError::NotFound`] if the file does not exist.
    /// - [`CoreError::PermissionDenied`] if the file is not readable.
    /// - [`CoreError::ConfigParse`] if the TOML is malformed.
    pub fn load(path: &Path) -> CoreResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => CoreError::NotFound(path.to_path_buf()),
            std::io::ErrorKind::PermissionDenied => CoreError::PermissionDenied(path.to_path_buf()),
            _ => CoreError::Io(e),
        })?;
        toml::from_str(&content).map_err(|e| CoreError::ConfigParse(e.to_string()))
    }

    /// Overlays secrets and the state path from process environment
    /// variables.
    pub fn apply_env(&mut self) {
        self.apply_env_from(|key| std::env::var(key).ok());
    }

    /// Like [`apply_env`](Self::apply_env) with an injectable lookup.
    /// Empty values are ignored.
    pub fn apply_env_from(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let get = |key: &str| lookup(key).filter(|v| !v.is_empty());
        if let Some(v) = get("VANTAGE_NEWS_API_KEY") {
            self.news.api_key = v;
        }
        if let Some(v) = get("VANTAGE_FINANCE_API_KEY") {
            self.finance.api_key = v;
        }
        if let Some(v) = get("VANTAGE_FILM_API_KEY") {
            self.film.api_key = v;
        }
        if let Some(v) = get("VANTAGE_GITHUB_TOKEN") {
            self.github.token = Some(v);
        }
        if let Some(v) = get("VANTAGE_MUSIC_CLIENT_ID") {
            self.music.client_id = v;
        }
        if let Some(v) = get("VANTAGE_STATE_PATH") {
            self.storage.path = Some(PathBuf::from(v));
        }
    }
}

/// Where persisted client state lives.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub path: Option<PathBuf>,
}

impl StorageConfig {
    /// The configured path, else `$HOME/.local/state/vantage/state.json`,
    /// else `state.json` in the working directory.
    pub fn resolved_path(&self) -> PathBuf {
        if let Some(path) = &self.path {
            return path.clone();
        }
        match std::env::var_os("HOME") {
            Some(home) => PathBuf::from(home)
                .join(".local")
                .join("state")
                .join("vantage")
                .join("state.json"),
            None => PathBuf::from("state.json"),
        }
    }
}

/// Search-as-you-type tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    #[serde(default = "default_quiet_period_ms")]
    pub quiet_period_ms: u64,
    #[serde(default = "default_place_min_chars")]
    pub place_min_chars: usize,
    #[serde(default = "default_title_min_chars")]
    pub title_min_chars: usize,
    #[serde(default = "default_ticker_min_chars")]
    pub ticker_min_chars: usize,
    #[serde(default = "default_ticker_spacing_secs")]
    pub ticker_spacing_secs: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            quiet_period_ms: default_quiet_period_ms(),
            place_min_chars: default_place_min_chars(),
            title_min_chars: default_title_min_chars(),
            ticker_min_chars: default_ticker_min_chars(),
            ticker_spacing_secs: default_ticker_spacing_secs(),
        }
    }
}

impl SearchConfig {
    pub fn quiet_period(&self) -> Duration {
        Duration::from_millis(self.quiet_period_ms)
    }

    pub fn place_policy(&self) -> SuggestPolicy {
        SuggestPolicy::new(self.place_min_chars, self.quiet_period())
    }

    pub fn title_policy(&self) -> SuggestPolicy {
        SuggestPolicy::new(self.title_min_chars, self.quiet_period())
    }

    pub fn ticker_policy(&self) -> SuggestPolicy {
        SuggestPolicy::new(self.ticker_min_chars, self.quiet_period())
    }

    pub fn ticker_spacing(&self) -> Duration {
        Duration::from_secs(self.ticker_spacing_secs)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
        }
    }
}

/// Geocoder and forecast endpoints. Neither needs a key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherConfig {
    #[serde(default = "default_geocode_url")]
    pub geocode_url: String,
    #[serde(default = "default_forecast_url")]
    pub forecast_url: String,
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            geocode_url: default_geocode_url(),
            forecast_url: default_forecast_url(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsConfig {
    #[serde(default = "default_news_url")]
    pub base_url: String,
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_country")]
    pub country: String,
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    #[serde(default = "default_items_per_page")]
    pub items_per_page: usize,
}

impl Default for NewsConfig {
    fn default() -> Self {
        Self {
            base_url: default_news_url(),
            api_key: String::new(),
            country: default_country(),
            page_size: default_page_size(),
            items_per_page: default_items_per_page(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinanceConfig {
    #[serde(default = "default_finance_url")]
    pub base_url: String,
    #[serde(default)]
    pub api_key: String,
    /// First day of the daily history, `YYYY-MM-DD`.
    #[serde(default = "default_history_start")]
    pub history_start: String,
}

impl Default for FinanceConfig {
    fn default() -> Self {
        Self {
            base_url: default_finance_url(),
            api_key: String::new(),
            history_start: default_history_start(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GithubConfig {
    #[serde(default = "default_github_url")]
    pub base_url: String,
    /// Optional token; anonymous requests are rate limited harder.
    #[serde(default)]
    pub token: Option<String>,
}

impl Default for GithubConfig {
    fn default() -> Self {
        Self {
            base_url: default_github_url(),
            token: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilmConfig {
    #[serde(default = "default_film_url")]
    pub base_url: String,
    #[serde(default = "default_film_image_url")]
    pub image_base_url: String,
    #[serde(default)]
    pub api_key: String,
}

impl Default for FilmConfig {
    fn default() -> Self {
        Self {
            base_url: default_film_url(),
            image_base_url: default_film_image_url(),
            api_key: String::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MusicConfig {
    #[serde(default = "default_music_api_url")]
    pub api_base_url: String,
    #[serde(default = "default_authorize_url")]
    pub authorize_url: String,
    #[serde(default)]
    pub client_id: String,
    #[serde(default = "default_redirect_uri")]
    pub redirect_uri: String,
    #[serde(default = "default_scopes")]
    pub scopes: Vec<String>,
    /// Token lifetime assumed when the callback omits `expires_in`.
    #[serde(default = "default_ttl_secs")]
    pub default_ttl_secs: u64,
}

impl Default for MusicConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_music_api_url(),
            authorize_url: default_authorize_url(),
            client_id: String::new(),
            redirect_uri: default_redirect_uri(),
            scopes: default_scopes(),
            default_ttl_secs: default_ttl_secs(),
        }
    }
}

fn default_quiet_period_ms() -> u64 {
    300
}

fn default_place_min_chars() -> usize {
    3
}

fn default_title_min_chars() -> usize {
    2
}

fn default_ticker_min_chars() -> usize {
    2
}

fn default_ticker_spacing_secs() -> u64 {
    12
}

fn default_user_agent() -> String {
    concat!("vantage/", env!("CARGO_PKG_VERSION")).to_string()
}

fn default_geocode_url() -> String {
    "https://nominatim.openstreetmap.org/search".to_string()
}

fn default_forecast_url() -> String {
    "https://api.open-meteo.com/v1/forecast".to_string()
}

fn default_news_url() -> String {
    "https://newsapi.org/v2".to_string()
}

fn default_country() -> String {
    "us".to_string()
}

fn default_page_size() -> u32 {
    100
}

fn default_items_per_page() -> usize {
    5
}

fn default_finance_url() -> String {
    "https://api.polygon.io".to_string()
}

fn default_history_start() -> String {
    "2022-01-01".to_string()
}

fn default_github_url() -> String {
    "https://api.github.com".to_string()
}

fn default_film_url() -> String {
    "https://api.themoviedb.org/3".to_string()
}

fn default_film_image_url() -> String {
    "https://image.tmdb.org/t/p/w500".to_string()
}

fn default_music_api_url() -> String {
    "https://api.spotify.com/v1".to_string()
}

fn default_authorize_url() -> String {
    "https://accounts.spotify.com/authorize".to_string()
}

fn default_redirect_uri() -> String {
    "http://localhost:3000/callback".to_string()
}

fn default_scopes() -> Vec<String> {
    vec![
        "user-top-read".to_string(),
        "playlist-read-private".to_string(),
        "user-read-recently-played".to_string(),
    ]
}

fn default_ttl_secs() -> u64 {
    3600
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn default_config_search() {
        let config = Config::default();

        assert_eq!(config.search.quiet_period(), Duration::from_millis(300));
        assert_eq!(config.search.place_policy().min_chars, 3);
        assert_eq!(config.search.title_policy().min_chars, 2);
        assert_eq!(config.search.ticker_policy().min_chars, 2);
        assert_eq!(config.search.ticker_spacing(), Duration::from_secs(12));
    }

    #[test]
    fn default_config_providers() {
        let config = Config::default();

        assert_eq!(config.news.country, "us");
        assert_eq!(config.news.page_size, 100);
        assert_eq!(config.news.items_per_page, 5);
        assert_eq!(config.finance.history_start, "2022-01-01");
        assert!(config.github.token.is_none());
        assert_eq!(config.music.default_ttl_secs, 3600);
        assert_eq!(config.music.scopes.len(), 3);
        assert!(config.news.api_key.is_empty());
    }

    #[test]
    fn default_user_agent_names_crate() {
        assert!(Config::default().http.user_agent.starts_with("vantage/"));
    }

    #[test]
    fn load_full_toml() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("vantage.toml");
        fs::write(
            &path,
            r#"
[storage]
path = "/var/lib/vantage/state.json"

[search]
quiet_period_ms = 500
place_min_chars = 4
ticker_spacing_secs = 20

[news]
api_key = "n-key"
country = "gb"
items_per_page = 10

[finance]
api_key = "f-key"
history_start = "2020-06-01"

[github]
token = "ghp_x"

[music]
client_id = "abc"
scopes = ["user-top-read"]
"#,
        )
        .unwrap();

        let config = Config::load(&path).unwrap();

        assert_eq!(
            config.storage.resolved_path(),
            PathBuf::from("/var/lib/vantage/state.json")
        );
        assert_eq!(config.search.quiet_period_ms, 500);
        assert_eq!(config.search.place_min_chars, 4);
        assert_eq!(config.search.title_min_chars, 2);
        assert_eq!(config.search.ticker_spacing_secs, 20);
        assert_eq!(config.news.api_key, "n-key");
        assert_eq!(config.news.country, "gb");
        assert_eq!(config.news.page_size, 100);
        assert_eq!(config.news.items_per_page, 10);
        assert_eq!(config.finance.history_start, "2020-06-01");
        assert_eq!(config.github.token.as_deref(), Some("ghp_x"));
        assert_eq!(config.music.client_id, "abc");
        assert_eq!(config.music.scopes, vec!["user-top-read".to_string()]);
        assert_eq!(config.music.default_ttl_secs, 3600);
    }

    #[test]
    fn load_empty_toml_uses_all_defaults() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("vantage.toml");
        fs::write(&path, "").unwrap();

        let config = Config::load(&path).unwrap();
        let default = Config::default();

        assert_eq!(config.weather.geocode_url, default.weather.geocode_url);
        assert_eq!(config.film.image_base_url, default.film.image_base_url);
        assert_eq!(config.search.quiet_period_ms, default.search.quiet_period_ms);
    }

    #[test]
    fn load_nonexistent_returns_not_found() {
        let tmp = TempDir::new().unwrap();
        let result = Config::load(&tmp.path().join("nonexistent.toml"));
        assert!(matches!(result, Err(CoreError::NotFound(_))));
    }

    #[test]
    fn load_invalid_toml_returns_parse_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("bad.toml");
        fs::write(&path, "[search\nquiet_period_ms = ").unwrap();

        let result = Config::load(&path);
        assert!(matches!(result, Err(CoreError::ConfigParse(_))));
    }

    #[test]
    fn load_wrong_type_returns_parse_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("bad.toml");
        fs::write(&path, "[search]\nquiet_period_ms = \"soon\"\n").unwrap();

        assert!(matches!(Config::load(&path), Err(CoreError::ConfigParse(_))));
    }

    // --- environment overlay ---

    #[test]
    fn env_overrides_secrets() {
        let vars: HashMap<&str, &str> = [
            ("VANTAGE_NEWS_API_KEY", "news"),
            ("VANTAGE_FINANCE_API_KEY", "fin"),
            ("VANTAGE_FILM_API_KEY", "film"),
            ("VANTAGE_GITHUB_TOKEN", "gh"),
            ("VANTAGE_MUSIC_CLIENT_ID", "cid"),
            ("VANTAGE_STATE_PATH", "/tmp/s.json"),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        config.apply_env_from(|k| vars.get(k).map(|v| v.to_string()));

        assert_eq!(config.news.api_key, "news");
        assert_eq!(config.finance.api_key, "fin");
        assert_eq!(config.film.api_key, "film");
        assert_eq!(config.github.token.as_deref(), Some("gh"));
        assert_eq!(config.music.client_id, "cid");
        assert_eq!(config.storage.resolved_path(), PathBuf::from("/tmp/s.json"));
    }

    #[test]
    fn env_empty_values_are_ignored() {
        let mut config = Config::default();
        config.news.api_key = "from-file".to_string();
        config.apply_env_from(|_| Some(String::new()));
        assert_eq!(config.news.api_key, "from-file");
        assert!(config.github.token.is_none());
    }
}
