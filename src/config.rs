use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const DEFAULT_CONFIG_FILE: &str = ".pr-dashboard.toml";
pub const DEFAULT_API_URL: &str = "https://api.github.com";
pub const DEFAULT_USER_AGENT: &str = "pr-dashboard";
pub const DEFAULT_STORE_FILE: &str = ".pr-dashboard.json";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Top-level configuration loaded from .pr-dashboard.toml.
///
/// All fields are optional. The tool works with zero config; the GitHub
/// token is not part of it and lives in the store instead.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub github: GitHubConfig,

    #[serde(default)]
    pub store: StoreConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GitHubConfig {
    /// REST API root. If None, falls back to GITHUB_API_URL, then api.github.com.
    pub api_url: Option<String>,
    /// User-Agent header sent with every request.
    pub user_agent: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StoreConfig {
    /// Path of the JSON store holding the token and the tracked PR list.
    pub path: Option<PathBuf>,
}

impl Config {
    /// Load configuration from `path`, or from .pr-dashboard.toml in the
    /// current directory. A missing default file yields the default config;
    /// an explicitly requested file must exist.
    pub fn load(path: Option<&Path>) -> Result<Config, ConfigError> {
        let mut config = match path {
            Some(path) => Self::load_from(path)?,
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    Self::load_from(default_path)?
                } else {
                    Config::default()
                }
            }
        };

        if config.github.api_url.is_none() {
            if let Ok(api_url) = std::env::var("GITHUB_API_URL") {
                config.github.api_url = Some(api_url);
            }
        }

        Ok(config)
    }

    /// Load from a specific path (useful for testing).
    pub fn load_from(path: &Path) -> Result<Config, ConfigError> {
        let contents = fs::read_to_string(path)?;
        let config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// API root without a trailing slash.
    pub fn api_url(&self) -> String {
        self.github
            .api_url
            .as_deref()
            .unwrap_or(DEFAULT_API_URL)
            .trim_end_matches('/')
            .to_string()
    }

    pub fn user_agent(&self) -> &str {
        self.github.user_agent.as_deref().unwrap_or(DEFAULT_USER_AGENT)
    }

    /// Resolve the store path: the command-line override wins over the config file.
    pub fn store_path(&self, cli_override: Option<&Path>) -> PathBuf {
        cli_override
            .map(Path::to_path_buf)
            .or_else(|| self.store.path.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_STORE_FILE))
    }
}
