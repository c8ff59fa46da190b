use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub general: GeneralConfig,

    pub catalog: CatalogConfig,

    pub search: SearchConfig,

    pub trending: TrendingConfig,

    pub server: ServerConfig,

    pub observability: ObservabilityConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    pub log_level: String,

    /// "pretty" or "json"
    pub log_format: String,

    /// Number of tokio worker threads (default: 2)
    /// Set to 0 to use the number of CPU cores
    pub worker_threads: usize,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: "pretty".to_string(),
            worker_threads: 2,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    pub base_url: String,

    /// TMDB v4 read access token, sent as a bearer token.
    pub api_token: String,

    /// Prefix joined with a movie's `poster_path` to build a poster URL.
    pub image_base_url: String,

    /// Request timeout in seconds (default: 15)
    pub request_timeout_seconds: u64,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.themoviedb.org/3".to_string(),
            api_token: String::new(),
            image_base_url: "https://image.tmdb.org/t/p/w500".to_string(),
            request_timeout_seconds: 15,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Quiet period after the last keystroke before a query settles.
    pub debounce_ms: u64,

    /// Drop completions that do not belong to the most recently issued fetch.
    /// Off by default: whichever response resolves last wins.
    pub discard_stale_responses: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            debounce_ms: 500,
            discard_stale_responses: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendingBackend {
    #[default]
    Appwrite,
    Sqlite,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TrendingConfig {
    pub backend: TrendingBackend,

    /// How many entries the trending section shows.
    pub top_limit: u64,

    /// Used by the sqlite backend only.
    pub database_path: String,

    pub appwrite: AppwriteConfig,
}

impl Default for TrendingConfig {
    fn default() -> Self {
        Self {
            backend: TrendingBackend::Appwrite,
            top_limit: 5,
            database_path: "sqlite:data/reelscout.db".to_string(),
            appwrite: AppwriteConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppwriteConfig {
    pub endpoint: String,

    pub project_id: String,

    pub api_key: String,

    pub database_id: String,

    pub collection_id: String,

    pub request_timeout_seconds: u64,
}

impl Default for AppwriteConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://cloud.appwrite.io/v1".to_string(),
            project_id: String::new(),
            api_key: String::new(),
            database_id: String::new(),
            collection_id: String::new(),
            request_timeout_seconds: 10,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub enabled: bool,

    pub port: u16,

    pub cors_allowed_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            port: 7878,
            cors_allowed_origins: vec![
                "http://localhost:5173".to_string(),
                "http://127.0.0.1:5173".to_string(),
            ],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    pub metrics_enabled: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            metrics_enabled: true,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let paths = Self::config_paths();

        for path in &paths {
            if path.exists() {
                info!("Loading config from: {}", path.display());
                return Self::load_from_path(path);
            }
        }

        info!("No config file found, using defaults");
        Ok(Self::default())
    }

    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        info!("Config saved to: {}", path.display());
        Ok(())
    }

    fn config_paths() -> Vec<PathBuf> {
        let mut paths = vec![];

        paths.push(PathBuf::from("config.toml"));

        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("reelscout").join("config.toml"));
        }

        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".reelscout").join("config.toml"));
        }

        paths
    }

    fn default_config_path() -> PathBuf {
        PathBuf::from("config.toml")
    }

    pub fn create_default_if_missing() -> Result<bool> {
        let path = Self::default_config_path();
        if path.exists() {
            Ok(false)
        } else {
            let config = Self::default();
            config.save_to_path(&path)?;
            info!("Created default config file: {}", path.display());
            Ok(true)
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.catalog.base_url.is_empty() {
            anyhow::bail!("Catalog base URL cannot be empty");
        }

        if self.search.debounce_ms == 0 {
            anyhow::bail!("search.debounce_ms must be > 0");
        }

        if self.trending.top_limit == 0 {
            anyhow::bail!("trending.top_limit must be > 0");
        }

        if self.trending.backend == TrendingBackend::Appwrite {
            let aw = &self.trending.appwrite;
            if aw.endpoint.is_empty()
                || aw.project_id.is_empty()
                || aw.database_id.is_empty()
                || aw.collection_id.is_empty()
            {
                anyhow::bail!(
                    "Appwrite endpoint, project_id, database_id and collection_id must be set when trending.backend = \"appwrite\""
                );
            }
        }

        Ok(())
    }
}
