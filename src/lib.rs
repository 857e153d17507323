//! Mouthpose - vowel mouth-shape overlay core
//!
//! A frame-synchronous geometry engine that:
//! - Builds a per-frame head-pose coordinate frame from three facial anchors
//! - Derives a low-dimensional articulatory feature model from calibration data
//! - Synthesizes a target mouth shape for an arbitrary vowel symbol
//! - Re-projects the calibrated shape into the live head-pose frame so the
//!   overlay follows head rotation, tilt, translation, and scale
//!
//! Landmark detection, video capture, and rendering live outside this crate;
//! the caller hands in already-materialized landmark arrays every frame and
//! receives live-space target positions back.

pub mod calibration;
pub mod config;
pub mod error;
pub mod features;
pub mod head_pose;
pub mod landmarks;
pub mod overlay;
pub mod session;
pub mod smoothing;
pub mod vowel;

pub use config::Config;
pub use error::{MouthposeError, Result};
pub use session::{FrameOutput, OverlaySession};

use glam::Vec3;
use std::collections::HashMap;

/// Index-addressable 3D landmarks for one frame.
///
/// x/y are normalized image coordinates (0.0–1.0, y grows downward);
/// z is relative depth as reported by the detector.
pub type LandmarkMap = HashMap<u32, Vec3>;

/// Named blendshape scores (0.0–1.0) for one frame.
pub type ScoreMap = HashMap<String, f32>;

/// Synthesized mouth-landmark positions, keyed by tracked mouth index.
pub type TargetShape = HashMap<u32, Vec3>;

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
