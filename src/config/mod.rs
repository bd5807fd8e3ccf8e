use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::api::client::{ClientConfig, DEFAULT_ENDPOINT};
use crate::error::{KoshaError, Result};

const CONFIG_DIR_NAME: &str = ".kosha";
const CONFIG_FILE_NAME: &str = "config.yaml";

/// Environment variable holding the service key
pub const API_KEY_ENV: &str = "KOSHA_API_KEY";

/// Application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub kosha: KoshaConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct KoshaConfig {
    /// Service key issued by the public data portal
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,

    /// Search endpoint override
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,

    /// Starting `numOfRows`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u32>,

    /// Request timeout in seconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u64>,
}

impl Config {
    /// Get the configuration directory path
    pub fn config_path() -> Result<PathBuf> {
        let home_dir = dirs::home_dir()
            .ok_or_else(|| KoshaError::Config("Could not determine home directory".to_string()))?;

        Ok(home_dir.join(CONFIG_DIR_NAME))
    }

    /// Get the configuration file full path
    pub fn config_file_path() -> Result<PathBuf> {
        Ok(Self::config_path()?.join(CONFIG_FILE_NAME))
    }

    /// Initialize configuration directory and file
    pub fn initialize() -> Result<()> {
        let config_file = Self::config_file_path()?;
        Self::initialize_at(&config_file)
    }

    /// Create `path` (and its directory) with a default configuration if missing
    pub fn initialize_at(path: &Path) -> Result<()> {
        if let Some(config_dir) = path.parent() {
            if !config_dir.exists() {
                fs::create_dir_all(config_dir).map_err(|e| {
                    KoshaError::Config(format!("Failed to create config directory: {}", e))
                })?;

                #[cfg(unix)]
                {
                    use std::os::unix::fs::PermissionsExt;
                    let permissions = fs::Permissions::from_mode(0o700);
                    fs::set_permissions(config_dir, permissions).map_err(|e| {
                        KoshaError::Config(format!("Failed to set directory permissions: {}", e))
                    })?;
                }
            }
        }

        if !path.exists() {
            Self::default().save_to(path)?;
        }

        Ok(())
    }

    /// Load configuration from the default file
    pub fn load() -> Result<Self> {
        let config_file = Self::config_file_path()?;
        Self::load_from(&config_file)
    }

    /// Load configuration from `path`, creating it when missing
    pub fn load_from(path: &Path) -> Result<Self> {
        Self::initialize_at(path)?;

        let contents = fs::read_to_string(path)
            .map_err(|e| KoshaError::Config(format!("Failed to read config file: {}", e)))?;

        if contents.trim().is_empty() {
            return Ok(Self::default());
        }

        serde_yaml::from_str(&contents)
            .map_err(|e| KoshaError::Config(format!("Failed to parse config file: {}", e)))
    }

    /// Save configuration to the default file
    pub fn save(&self) -> Result<()> {
        let config_file = Self::config_file_path()?;
        self.save_to(&config_file)
    }

    /// Save configuration to `path` with owner-only permissions
    pub fn save_to(&self, path: &Path) -> Result<()> {
        let yaml = serde_yaml::to_string(self)
            .map_err(|e| KoshaError::Config(format!("Failed to serialize config: {}", e)))?;

        fs::write(path, yaml)
            .map_err(|e| KoshaError::Config(format!("Failed to write config file: {}", e)))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let permissions = fs::Permissions::from_mode(0o600);
            fs::set_permissions(path, permissions)
                .map_err(|e| KoshaError::Config(format!("Failed to set file permissions: {}", e)))?;
        }

        Ok(())
    }

    /// Resolve the service key; a non-empty environment value wins over the file
    pub fn resolve_api_key(&self, env_value: Option<String>) -> Option<String> {
        env_value
            .filter(|key| !key.trim().is_empty())
            .or_else(|| self.kosha.key.clone())
            .filter(|key| !key.trim().is_empty())
    }

    /// Build the fetch engine configuration from this file and the given key
    pub fn client_config(&self, api_key: Option<String>) -> ClientConfig {
        let defaults = ClientConfig::default();
        let endpoint = self
            .kosha
            .endpoint
            .clone()
            .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());
        // Proxy-only parameters make no sense against a different service
        let proxy = if endpoint == DEFAULT_ENDPOINT {
            defaults.proxy.clone()
        } else {
            None
        };

        ClientConfig {
            api_key,
            endpoint,
            timeout: self.kosha.timeout.unwrap_or(defaults.timeout),
            page_size: self.kosha.page_size.unwrap_or(defaults.page_size),
            proxy,
            ..defaults
        }
    }

    /// Set a configuration value by key path (in memory only)
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "kosha.key" => {
                self.kosha.key = Some(value.to_string());
            }
            "kosha.endpoint" => {
                validate_endpoint(value)?;
                self.kosha.endpoint = Some(value.to_string());
            }
            "kosha.page_size" => {
                let size = parse_positive(key, value)?;
                self.kosha.page_size = Some(size as u32);
            }
            "kosha.timeout" => {
                self.kosha.timeout = Some(parse_positive(key, value)?);
            }
            _ => {
                return Err(KoshaError::Config(format!("Unknown configuration key: {}", key)));
            }
        }

        Ok(())
    }

    /// Get a configuration value by key path
    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "kosha.key" => self.kosha.key.clone(),
            "kosha.endpoint" => self.kosha.endpoint.clone(),
            "kosha.page_size" => self.kosha.page_size.map(|v| v.to_string()),
            "kosha.timeout" => self.kosha.timeout.map(|v| v.to_string()),
            _ => None,
        }
    }
}

fn validate_endpoint(value: &str) -> Result<()> {
    let url = url::Url::parse(value)
        .map_err(|e| KoshaError::Config(format!("Invalid endpoint URL '{}': {}", value, e)))?;
    match url.scheme() {
        "http" | "https" => Ok(()),
        scheme => Err(KoshaError::Config(format!(
            "Unsupported URL scheme '{}' for endpoint",
            scheme
        ))),
    }
}

fn parse_positive(key: &str, value: &str) -> Result<u64> {
    match value.trim().parse::<u64>() {
        Ok(n) if n >= 1 && n <= u32::MAX as u64 => Ok(n),
        _ => Err(KoshaError::Config(format!(
            "{} must be a positive integer, got '{}'",
            key, value
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn test_config_path() {
        let path = Config::config_path().unwrap();
        assert!(path.to_string_lossy().contains(".kosha"));
    }

    #[test]
    fn test_load_creates_default_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join(CONFIG_FILE_NAME);

        let config = Config::load_from(&path).unwrap();

        assert!(path.exists());
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_save_and_reload() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);

        let mut config = Config::default();
        config.set("kosha.key", "secret-key").unwrap();
        config.set("kosha.page_size", "5").unwrap();
        config.save_to(&path).unwrap();

        let reloaded = Config::load_from(&path).unwrap();
        assert_eq!(reloaded.get("kosha.key").as_deref(), Some("secret-key"));
        assert_eq!(reloaded.get("kosha.page_size").as_deref(), Some("5"));
        assert_eq!(reloaded.get("kosha.timeout"), None);
    }

    #[cfg(unix)]
    #[test]
    fn test_saved_file_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        Config::default().save_to(&path).unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[test]
    fn test_set_rejects_bad_values() {
        let mut config = Config::default();
        assert!(config.set("kosha.page_size", "0").is_err());
        assert!(config.set("kosha.page_size", "many").is_err());
        assert!(config.set("kosha.endpoint", "ftp://example.com").is_err());
        assert!(config.set("kosha.endpoint", "not a url").is_err());
        assert!(config.set("law.key", "x").is_err());
    }

    #[test]
    fn test_env_key_overrides_file() {
        let mut config = Config::default();
        config.kosha.key = Some("file-key".to_string());

        assert_eq!(config.resolve_api_key(Some("env-key".to_string())).as_deref(), Some("env-key"));
        assert_eq!(config.resolve_api_key(Some("  ".to_string())).as_deref(), Some("file-key"));
        assert_eq!(config.resolve_api_key(None).as_deref(), Some("file-key"));
        assert_eq!(Config::default().resolve_api_key(None), None);
    }

    #[test]
    fn test_client_config_from_file() {
        let mut config = Config::default();
        config.set("kosha.page_size", "3").unwrap();
        config.set("kosha.timeout", "15").unwrap();

        let client = config.client_config(Some("k".to_string()));
        assert_eq!(client.page_size, 3);
        assert_eq!(client.timeout, 15);
        assert_eq!(client.endpoint, DEFAULT_ENDPOINT);
        assert!(client.proxy.is_some());

        config.set("kosha.endpoint", "https://apis.example.org/search").unwrap();
        let client = config.client_config(None);
        assert!(client.proxy.is_none());
        assert!(client.api_key.is_none());
    }
}
