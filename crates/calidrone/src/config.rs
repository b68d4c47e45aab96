//! Configuration management for calidrone.
//!
//! This module provides configuration loading and validation using figment,
//! supporting TOML config files, environment variables, and defaults.

use std::path::PathBuf;
use std::time::Duration;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::path::DEFAULT_PATH_NAME;
use crate::recording::{FeedSource, Quality, RecordingSettings, VideoFormat};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Default data directory name.
const DATA_DIR_NAME: &str = "calidrone";

/// Directory under the data dir that receives exported recordings.
const RECORDINGS_DIR_NAME: &str = "recordings";

/// Application configuration.
///
/// Configuration is loaded from (in order of precedence, highest first):
/// 1. Environment variables (prefixed with `CALIDRONE_`)
/// 2. TOML config file at `~/.config/calidrone/config.toml`
/// 3. Default values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Path planner configuration.
    pub planner: PlannerConfig,
    /// Camera and recorder configuration.
    pub camera: CameraConfig,
    /// Export configuration.
    pub export: ExportConfig,
}

/// Path planner configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    /// Render-space cell size that ground picks snap to.
    pub snap_size: f64,
    /// Average speed used for flight time estimates (units per second).
    pub cruise_speed: f64,
    /// Name given to saved paths that were left unnamed.
    pub default_path_name: String,
}

/// Camera and recorder configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Feed source a new session starts with.
    pub feed_source: FeedSource,
    /// Container format for recordings.
    pub format: VideoFormat,
    /// Quality tier, which fixes the encoder bitrate.
    pub quality: Quality,
    /// Frames per second requested from the device.
    pub framerate: u32,
    /// Ideal capture width in pixels.
    pub width: u32,
    /// Ideal capture height in pixels.
    pub height: u32,
    /// Demo recordings stop on their own after this many seconds.
    pub demo_auto_stop_secs: u64,
    /// Interval of the duration tick while recording, in milliseconds.
    pub tick_interval_ms: u64,
}

/// Export configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Directory that receives exported recordings.
    /// Defaults to `~/.local/share/calidrone/recordings`
    pub recordings_dir: Option<PathBuf>,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            snap_size: 0.5,
            cruise_speed: 5.0,
            default_path_name: DEFAULT_PATH_NAME.to_string(),
        }
    }
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            feed_source: FeedSource::Live,
            format: VideoFormat::Mp4,
            quality: Quality::High,
            framerate: 30,
            width: 1920,
            height: 1080,
            demo_auto_stop_secs: 10,
            tick_interval_ms: 1000,
        }
    }
}

impl CameraConfig {
    /// The recording settings a new session starts with.
    #[must_use]
    pub fn recording_settings(&self) -> RecordingSettings {
        RecordingSettings {
            format: self.format,
            quality: self.quality,
            framerate: self.framerate,
        }
    }

    /// Get the demo auto-stop limit as a Duration.
    #[must_use]
    pub fn demo_auto_stop(&self) -> Duration {
        Duration::from_secs(self.demo_auto_stop_secs)
    }

    /// Get the duration tick interval as a Duration.
    #[must_use]
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }
}

impl Config {
    /// Load configuration from all sources.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration with an optional custom config path.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);

        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(&config_file))
            .merge(Env::prefixed("CALIDRONE_").split("__"));

        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default configuration file path.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(DATA_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// Get the default data directory path.
    #[must_use]
    pub fn default_data_dir() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from(".local/share"))
            .join(DATA_DIR_NAME)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> Result<()> {
        let planner = &self.planner;
        if !(planner.snap_size.is_finite() && planner.snap_size > 0.0) {
            return Err(Error::ConfigValidation {
                message: format!(
                    "planner.snap_size must be a positive number (got {})",
                    planner.snap_size
                ),
            });
        }

        if !(planner.cruise_speed.is_finite() && planner.cruise_speed > 0.0) {
            return Err(Error::ConfigValidation {
                message: format!(
                    "planner.cruise_speed must be a positive number (got {})",
                    planner.cruise_speed
                ),
            });
        }

        let camera = &self.camera;
        if camera.framerate == 0 {
            return Err(Error::ConfigValidation {
                message: "camera.framerate must be greater than 0".to_string(),
            });
        }

        if camera.width == 0 || camera.height == 0 {
            return Err(Error::ConfigValidation {
                message: format!(
                    "camera resolution must be non-zero (got {}x{})",
                    camera.width, camera.height
                ),
            });
        }

        if camera.demo_auto_stop_secs == 0 {
            return Err(Error::ConfigValidation {
                message: "camera.demo_auto_stop_secs must be greater than 0".to_string(),
            });
        }

        if camera.tick_interval_ms == 0 {
            return Err(Error::ConfigValidation {
                message: "camera.tick_interval_ms must be greater than 0".to_string(),
            });
        }

        Ok(())
    }

    /// Get the recordings export directory, resolving defaults if not set.
    #[must_use]
    pub fn recordings_dir(&self) -> PathBuf {
        self.export
            .recordings_dir
            .clone()
            .unwrap_or_else(|| Self::default_data_dir().join(RECORDINGS_DIR_NAME))
    }
}
