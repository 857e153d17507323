//! Error types for mouthpose

use thiserror::Error;

/// Main error type for mouthpose
#[derive(Error, Debug)]
pub enum MouthposeError {
    #[error("Frame error: {0}")]
    Frame(#[from] FrameError),

    #[error("Calibration error: {0}")]
    Calibration(#[from] CalibrationError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Per-frame failures.
///
/// Non-fatal by contract: the driving caller decides whether to skip the
/// frame and hold the last valid overlay. No persistent state is touched
/// when one of these is returned.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FrameError {
    #[error("Required landmark {0} absent from frame")]
    MissingLandmark(u32),

    #[error("Degenerate geometry: {0}")]
    DegenerateGeometry(&'static str),

    #[error("Inter-eye distance below tolerance")]
    DegenerateNormalization,

    #[error("Unknown vowel symbol: {0}")]
    UnknownVowel(String),
}

/// Calibration-load-time failures.
///
/// Surfaced once, before any frame processing begins, and kept distinct
/// from the per-frame taxonomy.
#[derive(Error, Debug)]
pub enum CalibrationError {
    #[error("Calibration frame '{pose}' is missing landmark {index}")]
    MissingLandmark { pose: &'static str, index: u32 },

    #[error("Calibration frame '{pose}' is degenerate: {source}")]
    Degenerate {
        pose: &'static str,
        source: FrameError,
    },

    #[error("Failed to parse calibration payload: {0}")]
    Parse(String),
}

/// Configuration-related errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadFile(String),

    #[error("Failed to parse config: {0}")]
    Parse(String),

    #[error("Invalid configuration value: {field} - {message}")]
    InvalidValue { field: String, message: String },
}

/// Result type alias for mouthpose operations
pub type Result<T> = std::result::Result<T, MouthposeError>;
