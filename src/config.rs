//! Configuration parsing and management for mouthpose

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{ConfigError, MouthposeError};

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub geometry: GeometryConfig,
    pub smoothing: SmoothingConfig,
    pub basis: BasisConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            geometry: GeometryConfig::default(),
            smoothing: SmoothingConfig::default(),
            basis: BasisConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, MouthposeError> {
        let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            ConfigError::ReadFile(format!("{}: {}", path.as_ref().display(), e))
        })?;

        Self::from_str(&contents)
    }

    /// Parse configuration from a TOML string
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Result<Self, MouthposeError> {
        let config: Self = toml::from_str(s).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from default paths
    pub fn load() -> Result<Self, MouthposeError> {
        let paths = [
            PathBuf::from("mouthpose.toml"),
            PathBuf::from("config/mouthpose.toml"),
        ];

        for path in &paths {
            if path.exists() {
                tracing::info!("Loading config from: {}", path.display());
                return Self::from_file(path);
            }
        }

        tracing::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), MouthposeError> {
        if self.geometry.epsilon <= 0.0 {
            return Err(ConfigError::InvalidValue {
                field: "geometry.epsilon".to_string(),
                message: "Tolerance must be greater than 0".to_string(),
            }
            .into());
        }

        if !(0.0..1.0).contains(&self.smoothing.score_alpha) {
            return Err(ConfigError::InvalidValue {
                field: "smoothing.score_alpha".to_string(),
                message: "Alpha must be in [0, 1)".to_string(),
            }
            .into());
        }

        if self.smoothing.history_depth == 0 {
            return Err(ConfigError::InvalidValue {
                field: "smoothing.history_depth".to_string(),
                message: "History depth must be at least 1".to_string(),
            }
            .into());
        }

        if self.basis.transition_time <= 0.0 {
            return Err(ConfigError::InvalidValue {
                field: "basis.transition_time".to_string(),
                message: "Transition time must be greater than 0".to_string(),
            }
            .into());
        }

        Ok(())
    }
}

/// Geometry tolerances
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeometryConfig {
    /// Length tolerance below which a vector is considered degenerate
    #[serde(default = "default_epsilon")]
    pub epsilon: f32,
}

impl Default for GeometryConfig {
    fn default() -> Self {
        Self {
            epsilon: default_epsilon(),
        }
    }
}

/// Score stream smoothing parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SmoothingConfig {
    /// EMA weight on the previous sample
    #[serde(default = "default_score_alpha")]
    pub score_alpha: f32,

    /// Diagnostic rolling-history depth
    #[serde(default = "default_history_depth")]
    pub history_depth: usize,
}

impl Default for SmoothingConfig {
    fn default() -> Self {
        Self {
            score_alpha: default_score_alpha(),
            history_depth: default_history_depth(),
        }
    }
}

/// Vowel basis derivation parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BasisConfig {
    /// Assumed transition time for the basis rate magnitudes
    #[serde(default = "default_transition_time")]
    pub transition_time: f32,
}

impl Default for BasisConfig {
    fn default() -> Self {
        Self {
            transition_time: default_transition_time(),
        }
    }
}

fn default_epsilon() -> f32 {
    1e-6
}

fn default_score_alpha() -> f32 {
    0.6
}

fn default_history_depth() -> usize {
    5
}

fn default_transition_time() -> f32 {
    0.2
}
