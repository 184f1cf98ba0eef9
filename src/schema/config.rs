//! Configuration types for the show viewer.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

fn default_data_dir() -> PathBuf {
    PathBuf::from("sample_data")
}

fn default_manifest() -> String {
    "fileList.json".to_string()
}

fn default_time_scale() -> f64 {
    1.0
}

fn default_frame_rate() -> f64 {
    60.0
}

/// Top-level viewer configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewerConfig {
    /// Directory holding the show files and the manifest.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// Manifest file name inside `data_dir`.
    #[serde(default = "default_manifest")]
    pub manifest: String,
    /// Playback behavior.
    #[serde(default)]
    pub playback: PlaybackConfig,
    /// Tick rate of headless playback in frames per second.
    #[serde(default = "default_frame_rate")]
    pub frame_rate: f64,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            manifest: default_manifest(),
            playback: PlaybackConfig::default(),
            frame_rate: default_frame_rate(),
        }
    }
}

/// Playback clock parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaybackConfig {
    /// Wrap to the start at the end of the show instead of holding the last frame.
    #[serde(default)]
    pub looping: bool,
    /// Show seconds per wall-clock second.
    #[serde(default = "default_time_scale")]
    pub time_scale: f64,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            looping: false,
            time_scale: default_time_scale(),
        }
    }
}

impl PlaybackConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.time_scale.is_finite() && self.time_scale > 0.0) {
            return Err(ConfigError::InvalidTimeScale(self.time_scale));
        }
        Ok(())
    }
}

impl ViewerConfig {
    /// Path of the manifest file.
    pub fn manifest_path(&self) -> PathBuf {
        self.data_dir.join(&self.manifest)
    }

    /// Wall-clock seconds between headless frames.
    #[inline]
    pub fn frame_interval(&self) -> f64 {
        1.0 / self.frame_rate
    }

    /// Validate configuration parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.manifest.trim().is_empty() {
            return Err(ConfigError::EmptyManifestName);
        }
        if !(self.frame_rate.is_finite() && self.frame_rate > 0.0) {
            return Err(ConfigError::InvalidFrameRate(self.frame_rate));
        }
        self.playback.validate()
    }
}

/// Configuration validation errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Manifest file name must not be empty")]
    EmptyManifestName,
    #[error("Frame rate must be positive and finite, got {0}")]
    InvalidFrameRate(f64),
    #[error("Time scale must be positive and finite, got {0}")]
    InvalidTimeScale(f64),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_empty_json() {
        let config: ViewerConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.data_dir, PathBuf::from("sample_data"));
        assert_eq!(config.manifest, "fileList.json");
        assert!(!config.playback.looping);
        assert_eq!(config.playback.time_scale, 1.0);
        assert_eq!(config.frame_rate, 60.0);
        assert!(config.validate().is_ok());
        assert_eq!(
            config.manifest_path(),
            PathBuf::from("sample_data").join("fileList.json")
        );
    }

    #[test]
    fn test_partial_playback_section() {
        let config: ViewerConfig =
            serde_json::from_str(r#"{"playback": {"looping": true}, "frame_rate": 30}"#).unwrap();
        assert!(config.playback.looping);
        assert_eq!(config.playback.time_scale, 1.0);
        assert!((config.frame_interval() - 1.0 / 30.0).abs() < 1e-12);
    }

    #[test]
    fn test_validation_errors() {
        let mut config = ViewerConfig::default();
        config.frame_rate = 0.0;
        assert!(matches!(config.validate(), Err(ConfigError::InvalidFrameRate(_))));

        let mut config = ViewerConfig::default();
        config.playback.time_scale = f64::NAN;
        assert!(matches!(config.validate(), Err(ConfigError::InvalidTimeScale(_))));

        let mut config = ViewerConfig::default();
        config.manifest = "  ".to_string();
        assert!(matches!(config.validate(), Err(ConfigError::EmptyManifestName)));
    }
}
