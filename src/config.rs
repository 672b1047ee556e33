//! Configuration management with TOML, environment variables, and CLI overrides.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// Application configuration with layered loading.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Wiki root URL; a non-http value is read as a local directory of
    /// previously saved pages
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Path of the unit listing page
    #[serde(default = "default_units_path")]
    pub units_path: String,

    /// Directory fetched pages are written to when `save_source` is on
    #[serde(default = "default_save_path")]
    pub save_path: String,

    /// Lower bound of the random inter-request delay, in seconds
    #[serde(default = "default_delay_min_secs")]
    pub delay_min_secs: f64,

    /// Upper bound of the random inter-request delay, in seconds
    #[serde(default = "default_delay_max_secs")]
    pub delay_max_secs: f64,

    /// Proxy URL (e.g., socks5://host:port)
    #[serde(default)]
    pub proxy: Option<String>,

    /// Save fetched HTML under `save_path`
    #[serde(default)]
    pub save_source: bool,
}

fn default_base_url() -> String {
    "https://prismata.gamepedia.com".to_string()
}

fn default_units_path() -> String {
    "/Unit".to_string()
}

fn default_save_path() -> String {
    "files/wiki".to_string()
}

fn default_delay_min_secs() -> f64 {
    1.0
}

fn default_delay_max_secs() -> f64 {
    3.0
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            units_path: default_units_path(),
            save_path: default_save_path(),
            delay_min_secs: default_delay_min_secs(),
            delay_max_secs: default_delay_max_secs(),
            proxy: None,
            save_source: false,
        }
    }
}

impl Config {
    /// Creates a new default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!("Loading config from: {}", path.display());

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Loads configuration with fallback to default locations.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        // 1. Explicit path takes precedence
        if let Some(path) = explicit_path {
            return Self::from_file(path);
        }

        // 2. Try current directory
        let local_config = Path::new("config.toml");
        if local_config.exists() {
            debug!("Found config.toml in current directory");
            return Self::from_file(local_config);
        }

        // 3. Try XDG config directory
        if let Some(config_dir) = dirs::config_dir() {
            let xdg_config = config_dir.join("prismata-crawler").join("config.toml");
            if xdg_config.exists() {
                debug!("Found config in XDG config directory");
                return Self::from_file(xdg_config);
            }
        }

        // 4. Return default config
        debug!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Applies environment variable overrides.
    pub fn with_env(mut self) -> Self {
        if let Ok(base_url) = std::env::var("PRISMATA_BASE_URL") {
            self.base_url = base_url;
        }

        if let Ok(proxy) = std::env::var("PRISMATA_PROXY") {
            self.proxy = Some(proxy);
        }

        if let Ok(min) = std::env::var("PRISMATA_DELAY_MIN") {
            if let Ok(value) = min.parse() {
                self.delay_min_secs = value;
            }
        }

        if let Ok(max) = std::env::var("PRISMATA_DELAY_MAX") {
            if let Ok(value) = max.parse() {
                self.delay_max_secs = value;
            }
        }

        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.base_url, "https://prismata.gamepedia.com");
        assert_eq!(config.units_path, "/Unit");
        assert_eq!(config.save_path, "files/wiki");
        assert_eq!(config.delay_min_secs, 1.0);
        assert_eq!(config.delay_max_secs, 3.0);
        assert!(config.proxy.is_none());
        assert!(!config.save_source);
    }

    #[test]
    fn test_config_new() {
        let config = Config::new();
        assert_eq!(config.base_url, "https://prismata.gamepedia.com");
        assert_eq!(config.units_path, "/Unit");
    }

    #[test]
    fn test_config_from_toml() {
        let toml = r#"
            base_url = "https://wiki.example.org"
            delay_min_secs = 0.5
            save_source = true
        "#;

        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.base_url, "https://wiki.example.org");
        assert_eq!(config.delay_min_secs, 0.5);
        assert!(config.save_source);
        // Unset fields keep their defaults
        assert_eq!(config.units_path, "/Unit");
        assert_eq!(config.delay_max_secs, 3.0);
    }

    #[test]
    fn test_config_from_toml_all_fields() {
        let toml = r#"
            base_url = "saved/pages"
            units_path = "/UnitList"
            save_path = "saved/pages"
            delay_min_secs = 0.1
            delay_max_secs = 0.4
            proxy = "socks5://localhost:1080"
            save_source = true
        "#;

        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.base_url, "saved/pages");
        assert_eq!(config.units_path, "/UnitList");
        assert_eq!(config.save_path, "saved/pages");
        assert_eq!(config.delay_min_secs, 0.1);
        assert_eq!(config.delay_max_secs, 0.4);
        assert_eq!(config.proxy, Some("socks5://localhost:1080".to_string()));
        assert!(config.save_source);
    }

    #[test]
    fn test_config_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
            base_url = "https://wiki.example.org"
            delay_max_secs = 5.0
            "#
        )
        .unwrap();

        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(config.base_url, "https://wiki.example.org");
        assert_eq!(config.delay_max_secs, 5.0);
    }

    #[test]
    fn test_config_from_file_not_found() {
        let result = Config::from_file("/nonexistent/path/config.toml");
        assert!(result.is_err());
        let err = result.unwrap_err().to_string();
        assert!(err.contains("Failed to read config file"));
    }

    #[test]
    fn test_config_from_file_invalid_toml() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "not valid toml {{{{").unwrap();

        let result = Config::from_file(file.path());
        assert!(result.is_err());
        let err = result.unwrap_err().to_string();
        assert!(err.contains("Failed to parse config file"));
    }

    #[test]
    fn test_config_load_no_file() {
        // When no file exists, should return default config
        let config = Config::load(None).unwrap();
        assert_eq!(config.units_path, "/Unit");
    }

    #[test]
    fn test_config_load_explicit_path() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
            units_path = "/UnitList"
            "#
        )
        .unwrap();

        let config = Config::load(Some(file.path())).unwrap();
        assert_eq!(config.units_path, "/UnitList");
    }

    #[test]
    fn test_config_with_env() {
        // Save original env vars
        let orig_base = std::env::var("PRISMATA_BASE_URL").ok();
        let orig_proxy = std::env::var("PRISMATA_PROXY").ok();
        let orig_min = std::env::var("PRISMATA_DELAY_MIN").ok();
        let orig_max = std::env::var("PRISMATA_DELAY_MAX").ok();

        // Set test env vars
        std::env::set_var("PRISMATA_BASE_URL", "https://env.example.org");
        std::env::set_var("PRISMATA_PROXY", "http://proxy:8080");
        std::env::set_var("PRISMATA_DELAY_MIN", "0.2");
        std::env::set_var("PRISMATA_DELAY_MAX", "0.9");

        let config = Config::new().with_env();
        assert_eq!(config.base_url, "https://env.example.org");
        assert_eq!(config.proxy, Some("http://proxy:8080".to_string()));
        assert_eq!(config.delay_min_secs, 0.2);
        assert_eq!(config.delay_max_secs, 0.9);

        // Restore original env vars
        match orig_base {
            Some(v) => std::env::set_var("PRISMATA_BASE_URL", v),
            None => std::env::remove_var("PRISMATA_BASE_URL"),
        }
        match orig_proxy {
            Some(v) => std::env::set_var("PRISMATA_PROXY", v),
            None => std::env::remove_var("PRISMATA_PROXY"),
        }
        match orig_min {
            Some(v) => std::env::set_var("PRISMATA_DELAY_MIN", v),
            None => std::env::remove_var("PRISMATA_DELAY_MIN"),
        }
        match orig_max {
            Some(v) => std::env::set_var("PRISMATA_DELAY_MAX", v),
            None => std::env::remove_var("PRISMATA_DELAY_MAX"),
        }
    }

    #[test]
    fn test_config_with_env_invalid_values() {
        let orig_min = std::env::var("PRISMATA_DELAY_MIN").ok();

        std::env::set_var("PRISMATA_DELAY_MIN", "not_a_number");

        let config = Config::new().with_env();
        // Invalid values should be ignored, keeping defaults
        assert_eq!(config.delay_min_secs, 1.0);

        match orig_min {
            Some(v) => std::env::set_var("PRISMATA_DELAY_MIN", v),
            None => std::env::remove_var("PRISMATA_DELAY_MIN"),
        }
    }

    #[test]
    fn test_config_serde_roundtrip() {
        let config = Config {
            base_url: "https://wiki.example.org".to_string(),
            units_path: "/UnitList".to_string(),
            save_path: "saved".to_string(),
            delay_min_secs: 0.5,
            delay_max_secs: 1.5,
            proxy: Some("socks5://localhost:1080".to_string()),
            save_source: true,
        };

        let json = serde_json::to_string(&config).unwrap();
        let parsed: Config = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed.base_url, config.base_url);
        assert_eq!(parsed.units_path, config.units_path);
        assert_eq!(parsed.save_path, config.save_path);
        assert_eq!(parsed.delay_min_secs, config.delay_min_secs);
        assert_eq!(parsed.delay_max_secs, config.delay_max_secs);
        assert_eq!(parsed.proxy, config.proxy);
        assert_eq!(parsed.save_source, config.save_source);
    }
}
