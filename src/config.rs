use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;

use crate::constants;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub general: GeneralConfig,

    pub bangumi: BangumiConfig,

    pub history: HistoryConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    pub log_level: String,

    /// Root directory for season files and the manifest.
    pub output_dir: String,

    /// Number of tokio worker threads (default: 2)
    /// Set to 0 to use the number of CPU cores
    pub worker_threads: usize,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            output_dir: constants::files::DEFAULT_OUTPUT_DIR.to_string(),
            worker_threads: 2,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BangumiConfig {
    /// Website root, used for listing pages and record links.
    pub site_url: String,

    pub api_url: String,

    /// Region tag the listing pages are filtered by.
    pub region_tag: String,

    /// User agent sent to the website. The listing pages reject obvious bots.
    pub browser_user_agent: String,

    /// User agent sent to the API, which asks clients to identify themselves.
    pub api_user_agent: String,

    /// Request timeout in seconds (default: 30)
    pub request_timeout_seconds: u64,

    /// Pause after each listing page.
    pub page_delay_ms: u64,

    /// Pause after each detail fetch.
    pub item_delay_ms: u64,
}

impl Default for BangumiConfig {
    fn default() -> Self {
        Self {
            site_url: "https://bgm.tv".to_string(),
            api_url: "https://api.bgm.tv".to_string(),
            region_tag: "日本".to_string(),
            browser_user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                                 (KHTML, like Gecko) Chrome/124.0 Safari/537.36"
                .to_string(),
            api_user_agent: concat!("seasonarr/", env!("CARGO_PKG_VERSION")).to_string(),
            request_timeout_seconds: 30,
            page_delay_ms: constants::intervals::PAGE_DELAY_MS,
            item_delay_ms: constants::intervals::ITEM_DELAY_MS,
        }
    }
}

impl BangumiConfig {
    #[must_use]
    pub const fn page_delay(&self) -> Duration {
        Duration::from_millis(self.page_delay_ms)
    }

    #[must_use]
    pub const fn item_delay(&self) -> Duration {
        Duration::from_millis(self.item_delay_ms)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    /// First year fetched by a full history run.
    pub start_year: i32,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            start_year: constants::history::DEFAULT_START_YEAR,
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
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
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
            paths.push(config_dir.join("seasonarr").join("config.toml"));
        }

        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".seasonarr").join("config.toml"));
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
        if self.bangumi.site_url.is_empty() {
            anyhow::bail!("bangumi.site_url cannot be empty");
        }

        if self.bangumi.api_url.is_empty() {
            anyhow::bail!("bangumi.api_url cannot be empty");
        }

        if self.general.output_dir.is_empty() {
            anyhow::bail!("general.output_dir cannot be empty");
        }

        if self.history.start_year <= 0 {
            anyhow::bail!("history.start_year must be a positive year");
        }

        Ok(())
    }

    #[must_use]
    pub fn output_dir(&self) -> PathBuf {
        PathBuf::from(&self.general.output_dir)
    }
}
