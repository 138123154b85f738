use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::constants::{
    API_BASE_URL_ENV, CONTROLS_HIDE_SECS, MIN_START_BUFFER_SECS, PAUSE_OVERLAY_SECS,
};
use crate::player::engine::EngineConfig;
use crate::player::retry::{AutoplayPolicy, BackoffPolicy};
use crate::player::stall::StallThresholds;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub playback: PlaybackConfig,

    #[serde(default)]
    pub ui: UiConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_timeout")]
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaybackConfig {
    #[serde(default = "default_max_buffer")]
    pub max_buffer_length_secs: f64,

    #[serde(default = "default_max_max_buffer")]
    pub max_max_buffer_length_secs: f64,

    #[serde(default = "default_back_buffer")]
    pub back_buffer_length_secs: f64,

    #[serde(default = "default_min_start_buffer")]
    pub min_start_buffer_secs: f64,

    #[serde(default = "BackoffPolicy::fragment")]
    pub fragment_loading: BackoffPolicy,

    #[serde(default = "BackoffPolicy::manifest")]
    pub manifest_loading: BackoffPolicy,

    #[serde(default)]
    pub stall: StallThresholds,

    #[serde(default)]
    pub autoplay: AutoplayPolicy,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    #[serde(default = "default_controls_hide")]
    pub controls_hide_secs: u64,

    #[serde(default = "default_pause_overlay")]
    pub pause_overlay_secs: u64,
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;
        Self::load_from(&config_path)
    }

    pub fn load_from(config_path: &Path) -> Result<Self> {
        if config_path.exists() {
            debug!("Loading config from {:?}", config_path);
            let contents =
                fs::read_to_string(config_path).context("Failed to read config file")?;
            let config: Config =
                toml::from_str(&contents).context("Failed to parse config file")?;
            info!("Config loaded successfully");
            Ok(config)
        } else {
            info!("No config file found, using defaults");
            Ok(Config::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;
        self.save_to(&config_path)
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(config_path, contents).context("Failed to write config file")?;

        debug!("Config saved to {:?}", config_path);
        Ok(())
    }

    /// API base URL with the environment override applied and no trailing slash.
    pub fn api_base_url(&self) -> String {
        let raw = std::env::var(API_BASE_URL_ENV)
            .ok()
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| self.api.base_url.clone());
        raw.trim().trim_end_matches('/').to_string()
    }

    pub fn engine_config(&self) -> EngineConfig {
        let playback = &self.playback;
        EngineConfig {
            max_buffer_length: buffer_duration(
                "max_buffer_length_secs",
                playback.max_buffer_length_secs,
                default_max_buffer(),
            ),
            max_max_buffer_length: buffer_duration(
                "max_max_buffer_length_secs",
                playback.max_max_buffer_length_secs,
                default_max_max_buffer(),
            ),
            back_buffer_length: buffer_duration(
                "back_buffer_length_secs",
                playback.back_buffer_length_secs,
                default_back_buffer(),
            ),
            fragment_loading: playback.fragment_loading.clone(),
            manifest_loading: playback.manifest_loading.clone(),
        }
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir().context("Failed to get config directory")?;
        Ok(config_dir.join("cinestream").join("config.toml"))
    }
}

/// Seconds from the config file as a duration; negative or non-finite values fall back.
fn buffer_duration(name: &str, secs: f64, fallback: f64) -> Duration {
    Duration::try_from_secs_f64(secs).unwrap_or_else(|e| {
        warn!("Invalid playback.{} = {} ({}), using {}s", name, secs, e, fallback);
        Duration::from_secs_f64(fallback)
    })
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout_secs: default_timeout(),
        }
    }
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            max_buffer_length_secs: default_max_buffer(),
            max_max_buffer_length_secs: default_max_max_buffer(),
            back_buffer_length_secs: default_back_buffer(),
            min_start_buffer_secs: default_min_start_buffer(),
            fragment_loading: BackoffPolicy::fragment(),
            manifest_loading: BackoffPolicy::manifest(),
            stall: StallThresholds::default(),
            autoplay: AutoplayPolicy::default(),
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            controls_hide_secs: default_controls_hide(),
            pause_overlay_secs: default_pause_overlay(),
        }
    }
}

// Default value functions
fn default_base_url() -> String { "http://localhost:5000/api".to_string() }
fn default_timeout() -> u64 { 30 }
fn default_max_buffer() -> f64 { 60.0 }
fn default_max_max_buffer() -> f64 { 120.0 }
fn default_back_buffer() -> f64 { 30.0 }
fn default_min_start_buffer() -> f64 { MIN_START_BUFFER_SECS }
fn default_controls_hide() -> u64 { CONTROLS_HIDE_SECS }
fn default_pause_overlay() -> u64 { PAUSE_OVERLAY_SECS }
