use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Environment override for the API base URL; takes precedence over the
/// config file when set.
const API_BASE_ENV: &str = "TABLEFIND_API_BASE";

#[derive(Debug, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ApiConfig {
    pub base_url: Option<String>,
    pub timeout_seconds: Option<u64>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self { base_url: None, timeout_seconds: Some(30) }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self { api: ApiConfig::default() }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = get_config_path()?;

        // If config doesn't exist, create default
        if !config_path.exists() {
            let default_config = Config::default();
            default_config.save()?;
            return Ok(default_config);
        }

        let content = fs::read_to_string(&config_path).context("Failed to read config file")?;
        toml::from_str(&content).context("Failed to parse config file")
    }

    pub fn save(&self) -> Result<()> {
        let config_path = get_config_path()?;

        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        fs::write(&config_path, content).context("Failed to write config file")?;

        Ok(())
    }

    /// The API base URL to use, environment override first.
    pub fn api_base(&self) -> Option<String> {
        std::env::var(API_BASE_ENV).ok().or_else(|| self.api.base_url.clone())
    }
}

fn get_config_path() -> Result<PathBuf> {
    let proj_dirs = ProjectDirs::from("com", "tablefind", "tablefind")
        .context("Failed to determine config directory")?;

    Ok(proj_dirs.config_dir().join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use tempfile::tempdir;

    #[test]
    fn test_config_roundtrip_and_env_override() -> Result<()> {
        let temp_dir = tempdir()?;
        env::set_var("HOME", temp_dir.path());
        env::set_var("XDG_CONFIG_HOME", temp_dir.path().join("config"));

        // First load creates the default file.
        let config = Config::load()?;
        assert_eq!(config.api.base_url, None);
        assert_eq!(config.api.timeout_seconds, Some(30));

        let config = Config {
            api: ApiConfig {
                base_url: Some("https://api.example.com/prod".to_string()),
                timeout_seconds: Some(10),
            },
        };
        config.save()?;
        let loaded = Config::load()?;
        assert_eq!(loaded.api.base_url.as_deref(), Some("https://api.example.com/prod"));

        env::set_var(API_BASE_ENV, "https://staging.example.com");
        assert_eq!(loaded.api_base().as_deref(), Some("https://staging.example.com"));
        env::remove_var(API_BASE_ENV);
        assert_eq!(loaded.api_base().as_deref(), Some("https://api.example.com/prod"));

        Ok(())
    }
}
