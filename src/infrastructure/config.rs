//! Configuration infrastructure
//!
//! File-based JSON configuration with compiled-in defaults. A missing
//! config file is not an error: defaults are used and written back so the
//! operator has something to edit. The chat token never lives in the file,
//! only in the environment.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tokio::fs;
use tracing::info;

use crate::domain::constants;
use crate::infrastructure::http_client::HttpClientConfig;
use crate::infrastructure::parsing::ShopSelectors;

/// Environment variable naming the config file path.
pub const CONFIG_PATH_ENV: &str = "SHOPSHOT_CONFIG";

/// Default config file name, resolved against the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "shopshot.json";

/// Complete application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Upstream shop site settings
    pub shop: ShopConfig,
    /// Tile and collage geometry
    pub render: RenderConfig,
    /// Cycle scheduling
    pub schedule: ScheduleConfig,
    /// Chat platform settings
    pub chat: ChatConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            shop: ShopConfig::default(),
            render: RenderConfig::default(),
            schedule: ScheduleConfig::default(),
            chat: ChatConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

/// Upstream site settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ShopConfig {
    /// Listing page scraped every cycle
    pub listing_url: String,
    /// Base URL used to absolutize relative image sources
    pub base_url: String,
    /// Currency icon fetched once per cycle
    pub icon_url: String,
    /// HTTP client settings shared by all fetches
    pub http: HttpClientConfig,
    /// CSS selectors for the listing markup
    pub selectors: ShopSelectors,
}

impl Default for ShopConfig {
    fn default() -> Self {
        Self {
            listing_url: constants::SHOP_URL.to_string(),
            base_url: constants::BASE_URL.to_string(),
            icon_url: constants::VBUCKS_ICON_URL.to_string(),
            http: HttpClientConfig::default(),
            selectors: ShopSelectors::default(),
        }
    }
}

/// Tile and collage geometry settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Edge length of one square tile in pixels
    pub tile_edge: u32,
    /// Tiles per collage row
    pub columns: u32,
    /// Edge the currency icon is resized to
    pub icon_edge: u32,
    /// Pixel height of the overlay font
    pub font_scale: f32,
    /// Directory holding the rarity background assets
    pub asset_dir: PathBuf,
    /// Primary overlay font
    pub font_path: PathBuf,
    /// Output path of the collage, atomically replaced each cycle
    pub output_path: PathBuf,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            tile_edge: constants::TILE_EDGE,
            columns: constants::COLUMNS,
            icon_edge: constants::ICON_EDGE,
            font_scale: constants::FONT_SCALE,
            asset_dir: PathBuf::from("assets/backgrounds"),
            font_path: PathBuf::from("assets/fonts/Jersey10-Regular.ttf"),
            output_path: PathBuf::from(constants::OUTPUT_PATH),
        }
    }
}

/// Cycle scheduling settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScheduleConfig {
    /// Seconds between cycles
    pub interval_seconds: u64,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            interval_seconds: constants::CYCLE_INTERVAL_SECS,
        }
    }
}

/// Chat platform settings. The token itself comes from the environment.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    /// Channel the collage is posted to
    pub channel_id: u64,
    /// Environment variable holding the bot token
    pub token_env: String,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            channel_id: 0,
            token_env: "DISCORD_TOKEN".to_string(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter directive when RUST_LOG is unset, e.g. "info"
    pub level: String,
    /// Also write logs to a rolling file under `logs/`
    pub file_output: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file_output: false,
        }
    }
}

impl AppConfig {
    /// Resolve the config file path from the environment or the default.
    pub fn default_path() -> PathBuf {
        std::env::var(CONFIG_PATH_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_FILE))
    }

    /// Load configuration from the given path.
    ///
    /// A missing file yields defaults and writes them back so the operator
    /// has a file to edit. A present but malformed file is an error; silent
    /// fallback there would hide typos.
    pub async fn load(path: &Path) -> Result<Self> {
        if !fs::try_exists(path).await.unwrap_or(false) {
            info!("No config file at {}, writing defaults", path.display());
            let config = Self::default();
            config.save(path).await?;
            return Ok(config);
        }

        let content = fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        config
            .validate()
            .with_context(|| format!("Invalid config file: {}", path.display()))?;

        info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Reject values the pipeline cannot run with.
    ///
    /// The grid math and the interval timer both require these to be
    /// non-zero; a bad file should fail here with a clear message, not
    /// panic mid-cycle.
    pub fn validate(&self) -> Result<()> {
        anyhow::ensure!(self.render.columns > 0, "render.columns must be at least 1");
        anyhow::ensure!(self.render.tile_edge > 0, "render.tile_edge must be at least 1");
        anyhow::ensure!(
            self.schedule.interval_seconds > 0,
            "schedule.interval_seconds must be at least 1"
        );
        Ok(())
    }

    /// Persist the configuration as pretty-printed JSON.
    pub async fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .await
                    .with_context(|| format!("Failed to create config dir: {}", parent.display()))?;
            }
        }

        let content =
            serde_json::to_string_pretty(self).context("Failed to serialize configuration")?;
        fs::write(path, content)
            .await
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_domain_constants() {
        let config = AppConfig::default();
        assert_eq!(config.shop.listing_url, constants::SHOP_URL);
        assert_eq!(config.render.tile_edge, constants::TILE_EDGE);
        assert_eq!(config.render.columns, constants::COLUMNS);
        assert_eq!(config.schedule.interval_seconds, constants::CYCLE_INTERVAL_SECS);
    }

    #[test]
    fn config_round_trips_through_json() {
        let config = AppConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let parsed: AppConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.render.columns, config.render.columns);
        assert_eq!(parsed.shop.base_url, config.shop.base_url);
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let parsed: AppConfig =
            serde_json::from_str(r#"{"render": {"columns": 5}}"#).unwrap();
        assert_eq!(parsed.render.columns, 5);
        assert_eq!(parsed.render.tile_edge, constants::TILE_EDGE);
        assert_eq!(parsed.schedule.interval_seconds, constants::CYCLE_INTERVAL_SECS);
    }

    #[tokio::test]
    async fn zero_columns_are_rejected_at_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("shopshot.json");
        std::fs::write(&path, r#"{"render": {"columns": 0}}"#).unwrap();

        let err = AppConfig::load(&path).await.unwrap_err();
        assert!(format!("{err:#}").contains("render.columns"));
    }

    #[tokio::test]
    async fn zero_interval_is_rejected_at_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("shopshot.json");
        std::fs::write(&path, r#"{"schedule": {"interval_seconds": 0}}"#).unwrap();

        let err = AppConfig::load(&path).await.unwrap_err();
        assert!(format!("{err:#}").contains("schedule.interval_seconds"));
    }

    #[test]
    fn defaults_pass_validation() {
        assert!(AppConfig::default().validate().is_ok());
    }

    #[tokio::test]
    async fn missing_file_writes_defaults_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("shopshot.json");

        let config = AppConfig::load(&path).await.unwrap();
        assert!(path.exists());
        assert_eq!(config.render.columns, constants::COLUMNS);

        // Second load reads the file it just wrote.
        let reloaded = AppConfig::load(&path).await.unwrap();
        assert_eq!(reloaded.render.tile_edge, config.render.tile_edge);
    }
}
