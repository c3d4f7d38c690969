use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::Path;
use crate::blockchain::RequestId;
use crate::error::ConfigError;

/// Address watched when nothing else is configured
pub const DEFAULT_WATCH_ADDRESS: &str = "0x1234567890abcdef";

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub rpc: RpcConfig,
    pub watch: WatchConfig,
    pub logging: LoggingConfig,
}

/// JSON-RPC endpoint configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RpcConfig {
    /// Ethereum JSON-RPC endpoint URL
    pub endpoint: String,
    /// Correlation id sent with every request
    pub request_id: RequestId,
}

/// Addresses subscribed at startup
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WatchConfig {
    pub addresses: Vec<String>,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    pub level: String,
    /// Log format (json, pretty)
    pub format: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            rpc: RpcConfig::default(),
            watch: WatchConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for RpcConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://cloudflare-eth.com".to_string(),
            request_id: RequestId::Text("1".to_string()),
        }
    }
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            addresses: vec![DEFAULT_WATCH_ADDRESS.to_string()],
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration from file and environment variables
    /// Environment variables take precedence over file values
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = env::var("CONFIG_FILE").unwrap_or_else(|_| "config.toml".to_string());
        Self::load_with_path(&config_path)
    }

    /// Same as [`AppConfig::load`] with an explicit file path
    pub fn load_with_path(path: &str) -> Result<Self, ConfigError> {
        let mut config = Self::load_from_file(path)?;
        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults when it does not exist
    pub fn load_from_file(path: &str) -> Result<Self, ConfigError> {
        if !Path::new(path).exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .map_err(|_| ConfigError::FileNotFound(path.to_string()))?;
        let config: AppConfig = toml::from_str(&content)
            .map_err(|e| ConfigError::Parsing(e.to_string()))?;
        Ok(config)
    }

    /// Apply environment variable overrides
    pub fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Ok(endpoint) = env::var("ETH_RPC_URL") {
            self.rpc.endpoint = endpoint;
        }
        if let Ok(request_id) = env::var("RPC_REQUEST_ID") {
            self.rpc.request_id = match request_id.parse::<u64>() {
                Ok(n) => RequestId::Number(n),
                Err(_) => RequestId::Text(request_id),
            };
        }
        if let Ok(addresses) = env::var("WATCH_ADDRESSES") {
            let parsed: Vec<String> = addresses
                .split(',')
                .map(str::trim)
                .filter(|a| !a.is_empty())
                .map(str::to_string)
                .collect();
            if parsed.is_empty() {
                return Err(ConfigError::InvalidValue {
                    key: "WATCH_ADDRESSES".to_string(),
                    value: addresses,
                });
            }
            self.watch.addresses = parsed;
        }

        if let Ok(level) = env::var("LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(format) = env::var("LOG_FORMAT") {
            self.logging.format = format;
        }

        Ok(())
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.rpc.endpoint.starts_with("http://") && !self.rpc.endpoint.starts_with("https://") {
            return Err(ConfigError::InvalidUrl(self.rpc.endpoint.clone()));
        }

        if let RequestId::Text(id) = &self.rpc.request_id {
            if id.trim().is_empty() {
                return Err(ConfigError::InvalidValue {
                    key: "rpc.request_id".to_string(),
                    value: id.clone(),
                });
            }
        }

        if let Some(blank) = self.watch.addresses.iter().find(|a| a.trim().is_empty()) {
            return Err(ConfigError::InvalidValue {
                key: "watch.addresses".to_string(),
                value: blank.clone(),
            });
        }

        let valid_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_levels.contains(&self.logging.level.as_str()) {
            return Err(ConfigError::InvalidValue {
                key: "logging.level".to_string(),
                value: self.logging.level.clone(),
            });
        }

        let valid_formats = ["json", "pretty"];
        if !valid_formats.contains(&self.logging.format.as_str()) {
            return Err(ConfigError::InvalidValue {
                key: "logging.format".to_string(),
                value: self.logging.format.clone(),
            });
        }

        Ok(())
    }

    /// Generate a sample configuration file
    pub fn generate_sample_config() -> Result<String, ConfigError> {
        toml::to_string_pretty(&Self::default())
            .map_err(|e| ConfigError::Parsing(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::env;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.rpc.endpoint, "https://cloudflare-eth.com");
        assert_eq!(config.rpc.request_id, RequestId::Text("1".to_string()));
        assert_eq!(config.watch.addresses, vec![DEFAULT_WATCH_ADDRESS.to_string()]);
        assert_eq!(config.logging.level, "info");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let mut config = AppConfig::default();
        config.rpc.endpoint = "invalid-url".to_string();
        assert!(matches!(config.validate(), Err(ConfigError::InvalidUrl(_))));

        config = AppConfig::default();
        config.rpc.request_id = RequestId::Text("  ".to_string());
        assert!(config.validate().is_err());

        config = AppConfig::default();
        config.watch.addresses.push(String::new());
        assert!(config.validate().is_err());

        config = AppConfig::default();
        config.logging.level = "verbose".to_string();
        assert!(config.validate().is_err());

        config = AppConfig::default();
        config.logging.format = "xml".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    #[serial]
    fn test_env_overrides() {
        env::set_var("ETH_RPC_URL", "http://localhost:8545");
        env::set_var("RPC_REQUEST_ID", "7");
        env::set_var("WATCH_ADDRESSES", "0xaaa, 0xbbb,");
        env::set_var("LOG_LEVEL", "debug");

        let mut config = AppConfig::default();
        config.apply_env_overrides().unwrap();

        assert_eq!(config.rpc.endpoint, "http://localhost:8545");
        assert_eq!(config.rpc.request_id, RequestId::Number(7));
        assert_eq!(config.watch.addresses, vec!["0xaaa".to_string(), "0xbbb".to_string()]);
        assert_eq!(config.logging.level, "debug");

        env::remove_var("ETH_RPC_URL");
        env::remove_var("RPC_REQUEST_ID");
        env::remove_var("WATCH_ADDRESSES");
        env::remove_var("LOG_LEVEL");
    }

    #[test]
    #[serial]
    fn test_invalid_env_values() {
        env::set_var("WATCH_ADDRESSES", " , ");

        let mut config = AppConfig::default();
        let result = config.apply_env_overrides();
        assert!(matches!(result.unwrap_err(), ConfigError::InvalidValue { .. }));

        env::remove_var("WATCH_ADDRESSES");
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let config = AppConfig::load_from_file("/nonexistent/watcher.toml").unwrap();
        assert_eq!(config.rpc.endpoint, "https://cloudflare-eth.com");
    }

    #[test]
    #[serial]
    fn test_config_file_loading() {
        let config_content = r#"
[rpc]
endpoint = "http://127.0.0.1:8545"
request_id = 42

[watch]
addresses = ["0xabc", "0xdef"]

[logging]
level = "warn"
format = "json"
"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        std::io::Write::write_all(&mut temp_file, config_content.as_bytes()).unwrap();

        let config = AppConfig::load_with_path(temp_file.path().to_str().unwrap()).unwrap();

        assert_eq!(config.rpc.endpoint, "http://127.0.0.1:8545");
        assert_eq!(config.rpc.request_id, RequestId::Number(42));
        assert_eq!(config.watch.addresses, vec!["0xabc".to_string(), "0xdef".to_string()]);
        assert_eq!(config.logging.level, "warn");
        assert_eq!(config.logging.format, "json");
    }

    #[test]
    #[serial]
    fn test_partial_config_file_keeps_defaults() {
        let mut temp_file = NamedTempFile::new().unwrap();
        std::io::Write::write_all(
            &mut temp_file,
            b"[rpc]\nendpoint = \"http://127.0.0.1:8545\"\n",
        )
        .unwrap();

        let config = AppConfig::load_with_path(temp_file.path().to_str().unwrap()).unwrap();

        assert_eq!(config.rpc.endpoint, "http://127.0.0.1:8545");
        assert_eq!(config.rpc.request_id, RequestId::Text("1".to_string()));
        assert_eq!(config.watch.addresses, vec![DEFAULT_WATCH_ADDRESS.to_string()]);
        assert_eq!(config.logging.format, "pretty");
    }

    #[test]
    fn test_malformed_config_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        std::io::Write::write_all(&mut temp_file, b"[rpc\nendpoint = ").unwrap();

        let result = AppConfig::load_from_file(temp_file.path().to_str().unwrap());
        assert!(matches!(result, Err(ConfigError::Parsing(_))));
    }

    #[test]
    fn test_generate_sample_config() {
        let sample = AppConfig::generate_sample_config().unwrap();
        assert!(sample.contains("[rpc]"));
        assert!(sample.contains("[watch]"));
        assert!(sample.contains("[logging]"));

        let parsed: AppConfig = toml::from_str(&sample).unwrap();
        assert_eq!(parsed.rpc.request_id, RequestId::Text("1".to_string()));
    }
}
