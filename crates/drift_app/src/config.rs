//! Page configuration
//!
//! Loaded from a TOML file such as:
//!
//! ```toml
//! viewport_height = 900.0
//! target_fps = 120
//! motion = "reduced"
//! log_filter = "drift_animation=debug"
//! ```
//!
//! Every field is optional.

use std::fs;
use std::path::Path;

use drift_core::Viewport;
use serde::{Deserialize, Serialize};

use crate::error::{DriftError, Result};

/// How much motion the page may use
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MotionPreference {
    /// Every entrance, loop and parallax effect
    #[default]
    Full,
    /// Entrances snap to their end state; loops and parallax are skipped
    Reduced,
}

impl MotionPreference {
    pub fn is_reduced(self) -> bool {
        self == MotionPreference::Reduced
    }
}

/// Configuration for a landing page host
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DriftConfig {
    #[serde(default = "default_viewport_width")]
    pub viewport_width: f32,
    #[serde(default = "default_viewport_height")]
    pub viewport_height: f32,
    /// Frame rate the host loop ticks the scheduler at
    #[serde(default = "default_target_fps")]
    pub target_fps: u32,
    #[serde(default)]
    pub motion: MotionPreference,
    /// `EnvFilter` directives used when `RUST_LOG` is unset
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
}

fn default_viewport_width() -> f32 {
    1280.0
}

fn default_viewport_height() -> f32 {
    800.0
}

fn default_target_fps() -> u32 {
    60
}

fn default_log_filter() -> String {
    "info".to_string()
}

impl Default for DriftConfig {
    fn default() -> Self {
        Self::standard()
    }
}

impl DriftConfig {
    /// Desktop viewport, full motion
    pub fn standard() -> Self {
        Self {
            viewport_width: default_viewport_width(),
            viewport_height: default_viewport_height(),
            target_fps: default_target_fps(),
            motion: MotionPreference::Full,
            log_filter: default_log_filter(),
        }
    }

    /// Standard settings with reduced motion
    pub fn reduced_motion() -> Self {
        Self {
            motion: MotionPreference::Reduced,
            ..Self::standard()
        }
    }

    /// Verbose logging for debugging trigger behavior
    pub fn debug() -> Self {
        Self {
            log_filter: "drift_animation=trace,drift_app=debug".to_string(),
            ..Self::standard()
        }
    }

    pub fn with_viewport(mut self, width: f32, height: f32) -> Self {
        self.viewport_width = width;
        self.viewport_height = height;
        self
    }

    pub fn with_motion(mut self, motion: MotionPreference) -> Self {
        self.motion = motion;
        self
    }

    pub fn with_target_fps(mut self, fps: u32) -> Self {
        self.target_fps = fps;
        self
    }

    pub fn with_log_filter(mut self, filter: impl Into<String>) -> Self {
        self.log_filter = filter.into();
        self
    }

    pub fn viewport(&self) -> Viewport {
        Viewport::new(self.viewport_width, self.viewport_height)
    }

    /// Milliseconds per frame at the target frame rate
    pub fn frame_ms(&self) -> f32 {
        1000.0 / self.target_fps.max(1) as f32
    }

    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| DriftError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Serialize to TOML string
    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = DriftConfig::from_toml_str("").unwrap();
        assert_eq!(config, DriftConfig::standard());
        assert_eq!(config.viewport(), Viewport::new(1280.0, 800.0));
    }

    #[test]
    fn test_partial_config() {
        let config = DriftConfig::from_toml_str(
            r#"
            viewport_height = 900.0
            motion = "reduced"
            "#,
        )
        .unwrap();
        assert_eq!(config.viewport_height, 900.0);
        assert_eq!(config.viewport_width, 1280.0);
        assert!(config.motion.is_reduced());
        assert_eq!(config.target_fps, 60);
    }

    #[test]
    fn test_invalid_config() {
        let err = DriftConfig::from_toml_str("motion = \"sideways\"").unwrap_err();
        assert!(matches!(err, DriftError::ConfigParse(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = DriftConfig::load("/nonexistent/drift.toml").unwrap_err();
        assert!(matches!(err, DriftError::Io { .. }));
    }

    #[test]
    fn test_toml_round_trip() {
        let config = DriftConfig::debug().with_target_fps(120);
        let text = config.to_toml().unwrap();
        assert_eq!(DriftConfig::from_toml_str(&text).unwrap(), config);
    }

    #[test]
    fn test_frame_ms() {
        assert!((DriftConfig::standard().frame_ms() - 16.667).abs() < 0.01);
        assert_eq!(DriftConfig::standard().with_target_fps(0).frame_ms(), 1000.0);
    }
}
