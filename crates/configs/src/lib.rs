use std::path::{Path, PathBuf};

use anyhow::anyhow;
use anyhow::Result;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub client: ClientConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub worker_threads: Option<usize>,
    /// Verbose diagnostics (debug-level default log filter).
    #[serde(default = "default_debug")]
    pub debug: bool,
    /// JSON log lines instead of the compact human format.
    #[serde(default)]
    pub log_json: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: default_host(), port: default_port(), worker_threads: Some(4), debug: default_debug(), log_json: false }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// JSON document holding the product collection.
    #[serde(default = "default_data_file")]
    pub data_file: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self { data_file: default_data_file() }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ClientConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self { base_url: default_base_url(), timeout_secs: default_timeout() }
    }
}

fn default_host() -> String { "0.0.0.0".into() }
fn default_port() -> u16 { 5000 }
fn default_debug() -> bool { true }
fn default_data_file() -> PathBuf { PathBuf::from("data.json") }
fn default_base_url() -> String { "http://localhost:5000".into() }
fn default_timeout() -> u64 { 10 }

/// Path of the config file: `CONFIG_PATH` or `config.toml`.
pub fn config_path() -> PathBuf {
    std::env::var("CONFIG_PATH").map(PathBuf::from).unwrap_or_else(|_| PathBuf::from("config.toml"))
}

pub fn load_from_file(path: impl AsRef<Path>) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    from_toml_str(&content)
}

pub fn from_toml_str(content: &str) -> Result<AppConfig> {
    let cfg: AppConfig = toml::from_str(content)?;
    Ok(cfg)
}

impl AppConfig {
    /// File (if present) → env overrides → normalization.
    ///
    /// A missing config file is not an error; a present but unparsable one is.
    pub fn load_and_validate() -> Result<Self> {
        let path = config_path();
        let mut cfg = if path.exists() { load_from_file(&path)? } else { AppConfig::default() };
        cfg.apply_env_overrides(|key| std::env::var(key).ok())?;
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    /// Override fields from environment variables, looked up through `lookup`.
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("SERVER_HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("SERVER_PORT") {
            self.server.port = port.trim().parse().map_err(|_| anyhow!("SERVER_PORT is not a valid port: {port}"))?;
        }
        if let Some(threads) = lookup("TOKIO_WORKER_THREADS") {
            self.server.worker_threads = threads.trim().parse().ok();
        }
        if let Some(debug) = lookup("SERVER_DEBUG") {
            self.server.debug = matches!(debug.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on");
        }
        if let Some(format) = lookup("LOG_FORMAT") {
            self.server.log_json = format.trim().eq_ignore_ascii_case("json");
        }
        if let Some(path) = lookup("DATA_FILE") {
            self.storage.data_file = PathBuf::from(path);
        }
        if let Some(url) = lookup("PRODUCTS_BASE_URL") {
            self.client.base_url = url;
        }
        Ok(())
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        self.server.normalize()?;
        self.storage.normalize();
        self.client.normalize()?;
        Ok(())
    }
}

impl ServerConfig {
    fn normalize(&mut self) -> Result<()> {
        if self.host.trim().is_empty() {
            self.host = default_host();
        }
        if self.port == 0 {
            return Err(anyhow!("server.port must be in 1..=65535"));
        }
        match self.worker_threads {
            Some(w) if w > 0 => {}
            _ => self.worker_threads = Some(4),
        }
        Ok(())
    }

    /// `host:port` as handed to the listener; host names are resolved at bind time.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl StorageConfig {
    fn normalize(&mut self) {
        if self.data_file.as_os_str().is_empty() {
            self.data_file = default_data_file();
        }
    }
}

impl ClientConfig {
    fn normalize(&mut self) -> Result<()> {
        let url = self.base_url.trim().trim_end_matches('/').to_string();
        let lower = url.to_lowercase();
        if !(lower.starts_with("http://") || lower.starts_with("https://")) {
            return Err(anyhow!("client.base_url must start with http:// or https://"));
        }
        if self.timeout_secs == 0 {
            return Err(anyhow!("client.timeout_secs must be a positive number of seconds"));
        }
        self.base_url = url;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> =
            pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |k: &str| map.get(k).cloned()
    }

    #[test]
    fn defaults_match_service_contract() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.server.host, "0.0.0.0");
        assert_eq!(cfg.server.port, 5000);
        assert!(cfg.server.debug);
        assert!(!cfg.server.log_json);
        assert_eq!(cfg.storage.data_file, PathBuf::from("data.json"));
        assert_eq!(cfg.client.base_url, "http://localhost:5000");
    }

    #[test]
    fn parses_partial_toml() -> Result<()> {
        let cfg = from_toml_str(
            r#"
            [server]
            port = 8080
            debug = false

            [storage]
            data_file = "var/products.json"
            "#,
        )?;
        assert_eq!(cfg.server.port, 8080);
        assert_eq!(cfg.server.host, "0.0.0.0");
        assert!(!cfg.server.debug);
        assert_eq!(cfg.storage.data_file, PathBuf::from("var/products.json"));
        assert_eq!(cfg.client.timeout_secs, 10);
        Ok(())
    }

    #[test]
    fn env_overrides_win_over_file() -> Result<()> {
        let mut cfg = from_toml_str("[server]\nport = 8080\n")?;
        cfg.apply_env_overrides(env(&[
            ("SERVER_PORT", "9000"),
            ("SERVER_DEBUG", "false"),
            ("LOG_FORMAT", "JSON"),
            ("DATA_FILE", "/tmp/x.json"),
            ("PRODUCTS_BASE_URL", "http://example.com:9000/"),
        ]))?;
        cfg.normalize_and_validate()?;
        assert_eq!(cfg.server.port, 9000);
        assert!(!cfg.server.debug);
        assert!(cfg.server.log_json);
        assert_eq!(cfg.storage.data_file, PathBuf::from("/tmp/x.json"));
        assert_eq!(cfg.client.base_url, "http://example.com:9000");
        Ok(())
    }

    #[test]
    fn bad_port_env_is_rejected() {
        let mut cfg = AppConfig::default();
        assert!(cfg.apply_env_overrides(env(&[("SERVER_PORT", "nope")])).is_err());
    }

    #[test]
    fn normalize_fills_blanks_and_rejects_zero_port() {
        let mut cfg = AppConfig::default();
        cfg.server.host = "  ".into();
        cfg.server.worker_threads = Some(0);
        cfg.storage.data_file = PathBuf::new();
        cfg.normalize_and_validate().unwrap();
        assert_eq!(cfg.server.host, "0.0.0.0");
        assert_eq!(cfg.server.worker_threads, Some(4));
        assert_eq!(cfg.storage.data_file, PathBuf::from("data.json"));

        cfg.server.port = 0;
        assert!(cfg.normalize_and_validate().is_err());
    }

    #[test]
    fn base_url_must_be_http() {
        let mut cfg = AppConfig::default();
        cfg.client.base_url = "ftp://localhost".into();
        assert!(cfg.normalize_and_validate().is_err());
    }
}
