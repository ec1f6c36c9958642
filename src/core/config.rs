use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use std::{fs, path::PathBuf};
use tracing::debug;

pub const DEFAULT_PROVIDER_URL: &str = "https://economia.awesomeapi.com.br/json/last/USD-BRL";
pub const DEFAULT_SERVICE_URL: &str = "http://localhost:8080/cotacao";
pub const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:8080";

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct AppConfig {
    pub listen_addr: String,
    pub provider_url: String,
    pub service_url: String,
    pub fetch_timeout_ms: u64,
    pub store_timeout_ms: u64,
    pub persist: bool,
    pub data_path: Option<String>,
    pub report_path: String,
    pub report_pair: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            listen_addr: DEFAULT_LISTEN_ADDR.to_string(),
            provider_url: DEFAULT_PROVIDER_URL.to_string(),
            service_url: DEFAULT_SERVICE_URL.to_string(),
            fetch_timeout_ms: 200,
            store_timeout_ms: 10,
            persist: true,
            data_path: None,
            report_path: "cotacao.txt".to_string(),
            report_pair: "USDBRL".to_string(),
        }
    }
}

impl AppConfig {
    /// Loads the default config file, falling back to built-in defaults when
    /// it does not exist.
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        if !config_path.exists() {
            debug!("No config at {}, using defaults", config_path.display());
            return Ok(Self::default());
        }
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("br", "cotacao", "cotacao")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn default_data_path(&self) -> Result<PathBuf> {
        if let Some(custom_path) = &self.data_path {
            return Ok(PathBuf::from(custom_path));
        }
        let proj_dirs = ProjectDirs::from("br", "cotacao", "cotacao")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.data_dir().to_path_buf())
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config)
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_millis(self.fetch_timeout_ms)
    }

    pub fn store_timeout(&self) -> Duration {
        Duration::from_millis(self.store_timeout_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_fixed_constants() {
        let config = AppConfig::default();
        assert_eq!(config.fetch_timeout(), Duration::from_millis(200));
        assert_eq!(config.store_timeout(), Duration::from_millis(10));
        assert_eq!(config.provider_url, DEFAULT_PROVIDER_URL);
        assert_eq!(config.service_url, "http://localhost:8080/cotacao");
        assert_eq!(config.report_path, "cotacao.txt");
        assert_eq!(config.report_pair, "USDBRL");
        assert!(config.persist);
    }

    #[test]
    fn test_partial_config_keeps_defaults() {
        let yaml_str = r#"
provider_url: "http://localhost:9999/json/last/USD-BRL"
persist: false
data_path: "/tmp/cotacao"
"#;
        let config: AppConfig = serde_yaml::from_str(yaml_str).expect("Failed to deserialize");

        assert_eq!(config.provider_url, "http://localhost:9999/json/last/USD-BRL");
        assert!(!config.persist);
        assert_eq!(
            config.default_data_path().unwrap(),
            PathBuf::from("/tmp/cotacao")
        );
        assert_eq!(config.listen_addr, DEFAULT_LISTEN_ADDR);
        assert_eq!(config.fetch_timeout_ms, 200);
    }

    #[test]
    fn test_load_from_path_reports_parse_errors() {
        let file = tempfile::NamedTempFile::new().unwrap();
        fs::write(file.path(), "fetch_timeout_ms: [not, a, number]").unwrap();

        let err = AppConfig::load_from_path(file.path()).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }
}
