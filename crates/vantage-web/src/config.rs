use std::net::SocketAddr;
use std::path::PathBuf;

use serde::Deserialize;
use vantage_core::Config;

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind_addr")]
    pub bind_addr: SocketAddr,
    /// Dashboard config file (API keys, endpoints, state path).
    #[serde(default)]
    pub core_config: Option<PathBuf>,
    #[serde(default)]
    pub rate_limit: RateLimitConfig,
    #[serde(default)]
    pub tls: TlsConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RateLimitConfig {
    #[serde(default = "default_search_rpm")]
    pub search_requests_per_minute: u32,
}

fn default_search_rpm() -> u32 {
    30
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            search_requests_per_minute: default_search_rpm(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TlsConfig {
    pub cert_path: Option<String>,
    pub key_path: Option<String>,
}

/// The music provider redirects back to port 3000 by default.
fn default_bind_addr() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 3000))
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            core_config: None,
            rate_limit: RateLimitConfig::default(),
            tls: TlsConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Reads `VANTAGE_WEB_CONFIG` if set, then applies environment
    /// overrides.
    pub fn load() -> anyhow::Result<Self> {
        let config_path = std::env::var("VANTAGE_WEB_CONFIG").map(PathBuf::from).ok();

        let mut config = if let Some(path) = config_path {
            let contents = std::fs::read_to_string(&path)?;
            toml::from_str(&contents)?
        } else {
            ServerConfig::default()
        };

        config.apply_env_from(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    pub fn apply_env_from(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> anyhow::Result<()> {
        if let Some(addr) = lookup("VANTAGE_BIND_ADDR") {
            self.bind_addr = addr.parse()?;
        }
        if let Some(cert) = lookup("VANTAGE_TLS_CERT") {
            self.tls.cert_path = Some(cert);
        }
        if let Some(key) = lookup("VANTAGE_TLS_KEY") {
            self.tls.key_path = Some(key);
        }
        Ok(())
    }

    pub fn tls_enabled(&self) -> bool {
        self.tls.cert_path.is_some() && self.tls.key_path.is_some()
    }

    /// The dashboard config, with secrets from the environment layered on.
    pub fn load_core(&self) -> anyhow::Result<Config> {
        let mut core = match &self.core_config {
            Some(path) => Config::load(path)?,
            None => Config::default(),
        };
        core.apply_env();
        Ok(core)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_bind_to_localhost_3000() {
        let config = ServerConfig::default();
        assert_eq!(config.bind_addr.to_string(), "127.0.0.1:3000");
        assert_eq!(config.rate_limit.search_requests_per_minute, 30);
        assert!(!config.tls_enabled());
    }

    #[test]
    fn parses_toml() {
        let config: ServerConfig = toml::from_str(
            r#"
bind_addr = "0.0.0.0:8080"
core_config = "/etc/vantage.toml"

[rate_limit]
search_requests_per_minute = 10
"#,
        )
        .unwrap();
        assert_eq!(config.bind_addr.port(), 8080);
        assert_eq!(config.core_config, Some(PathBuf::from("/etc/vantage.toml")));
        assert_eq!(config.rate_limit.search_requests_per_minute, 10);
    }

    #[test]
    fn env_overrides_bind_and_tls() {
        let mut config = ServerConfig::default();
        config
            .apply_env_from(env(&[
                ("VANTAGE_BIND_ADDR", "0.0.0.0:9000"),
                ("VANTAGE_TLS_CERT", "cert.pem"),
                ("VANTAGE_TLS_KEY", "key.pem"),
            ]))
            .unwrap();
        assert_eq!(config.bind_addr.port(), 9000);
        assert!(config.tls_enabled());
    }

    #[test]
    fn bad_bind_addr_is_an_error() {
        let mut config = ServerConfig::default();
        assert!(config
            .apply_env_from(env(&[("VANTAGE_BIND_ADDR", "nowhere")]))
            .is_err());
    }

    #[test]
    fn load_core_reads_configured_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vantage.toml");
        std::fs::write(&path, "[finance]\nhistory_start = \"2023-06-01\"\n").unwrap();
        let config = ServerConfig {
            core_config: Some(path),
            ..ServerConfig::default()
        };
        assert_eq!(config.load_core().unwrap().finance.history_start, "2023-06-01");
    }
}
