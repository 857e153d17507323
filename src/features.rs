//! Articulatory feature extraction.
//!
//! Reduces a landmark map to three normalized scalars describing the mouth
//! shape: aperture (vertical opening), width (corner-to-corner span), and
//! pucker (reciprocal width). All three are normalized by the inter-eye
//! distance so they are invariant to head distance from the camera.

use glam::Vec3;

use crate::error::FrameError;
use crate::landmarks;
use crate::LandmarkMap;

/// Normalized articulatory descriptor of one mouth shape.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureVector {
    /// Vertical lip opening over inter-eye distance.
    pub aperture: f32,
    /// Mouth corner span over inter-eye distance.
    pub width: f32,
    /// Reciprocal width: 1 / max(width, epsilon).
    pub pucker: f32,
}

impl FeatureVector {
    /// Component-wise difference, used for calibration deltas.
    pub fn delta(self, other: Self) -> Self {
        Self {
            aperture: self.aperture - other.aperture,
            width: self.width - other.width,
            pucker: self.pucker - other.pucker,
        }
    }

    /// Euclidean magnitude over the three components.
    pub fn magnitude(self) -> f32 {
        (self.aperture * self.aperture + self.width * self.width + self.pucker * self.pucker)
            .sqrt()
    }
}

/// Extract the feature vector from a landmark map.
///
/// Pure and deterministic. Fails with `MissingLandmark` if any required
/// index is absent (never substitutes a default) and with
/// `DegenerateNormalization` if the inter-eye distance is below `epsilon`.
pub fn extract(map: &LandmarkMap, epsilon: f32) -> Result<FeatureVector, FrameError> {
    let left_eye = point(map, landmarks::LEFT_EYE_INNER)?;
    let right_eye = point(map, landmarks::RIGHT_EYE_INNER)?;
    let corner_l = point(map, landmarks::MOUTH_CORNER_LEFT)?;
    let corner_r = point(map, landmarks::MOUTH_CORNER_RIGHT)?;
    let upper = mean_y(map, &landmarks::UPPER_LIP_SAMPLES)?;
    let lower = mean_y(map, &landmarks::LOWER_LIP_SAMPLES)?;

    let eye_distance = left_eye.distance(right_eye);
    if eye_distance < epsilon {
        return Err(FrameError::DegenerateNormalization);
    }

    let width = corner_l.distance(corner_r) / eye_distance;
    // y grows downward, so the lower lip has the larger y
    let aperture = (lower - upper) / eye_distance;
    let pucker = 1.0 / width.max(epsilon);

    Ok(FeatureVector {
        aperture,
        width,
        pucker,
    })
}

fn point(map: &LandmarkMap, index: u32) -> Result<Vec3, FrameError> {
    map.get(&index)
        .copied()
        .ok_or(FrameError::MissingLandmark(index))
}

fn mean_y(map: &LandmarkMap, indices: &[u32]) -> Result<f32, FrameError> {
    let mut sum = 0.0;
    for &idx in indices {
        sum += point(map, idx)?.y;
    }
    Ok(sum / indices.len() as f32)
}
