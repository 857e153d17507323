//! Calibration frames and ingestion-boundary payload normalization.
//!
//! A calibration session captures four mouth poses: neutral plus the three
//! basis vowels (a, u, i). Each capture stores the full landmark map and
//! the detector's blendshape scores. The set is validated once at load
//! time; after that every component may assume anchor and mouth coverage.
//!
//! Detector payloads come in two shapes (index-keyed maps vs. dense
//! arrays for landmarks, name-keyed maps vs. category records for
//! blendshapes). Both are normalized into the typed representation here,
//! exactly once, so nothing downstream re-inspects payload shape.

use glam::Vec3;
use serde::Deserialize;
use std::collections::HashMap;

use crate::error::CalibrationError;
use crate::landmarks;
use crate::{LandmarkMap, ScoreMap};

/// Which captured pose a calibration frame belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CalibrationPose {
    Neutral,
    A,
    U,
    I,
}

impl CalibrationPose {
    pub const ALL: [CalibrationPose; 4] = [Self::Neutral, Self::A, Self::U, Self::I];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Neutral => "neutral",
            Self::A => "a",
            Self::U => "u",
            Self::I => "i",
        }
    }
}

/// One captured landmark + blendshape snapshot.
#[derive(Debug, Clone, Default)]
pub struct CalibrationFrame {
    landmarks: LandmarkMap,
    blendshapes: ScoreMap,
}

impl CalibrationFrame {
    pub fn new(landmarks: LandmarkMap, blendshapes: ScoreMap) -> Self {
        Self {
            landmarks,
            blendshapes,
        }
    }

    pub fn landmarks(&self) -> &LandmarkMap {
        &self.landmarks
    }

    pub fn blendshapes(&self) -> &ScoreMap {
        &self.blendshapes
    }

    pub fn point(&self, index: u32) -> Option<Vec3> {
        self.landmarks.get(&index).copied()
    }
}

/// The four calibration frames, validated and immutable for the session.
#[derive(Debug, Clone)]
pub struct CalibrationSet {
    neutral: CalibrationFrame,
    a: CalibrationFrame,
    u: CalibrationFrame,
    i: CalibrationFrame,
}

impl CalibrationSet {
    /// Assemble and validate a calibration set.
    ///
    /// Every frame must cover all anchor and mouth indices; a gap is a
    /// configuration error surfaced here, before any frame processing.
    pub fn new(
        neutral: CalibrationFrame,
        a: CalibrationFrame,
        u: CalibrationFrame,
        i: CalibrationFrame,
    ) -> Result<Self, CalibrationError> {
        let set = Self { neutral, a, u, i };
        for pose in CalibrationPose::ALL {
            set.validate_frame(pose)?;
        }
        tracing::info!("calibration set loaded and validated");
        Ok(set)
    }

    pub fn frame(&self, pose: CalibrationPose) -> &CalibrationFrame {
        match pose {
            CalibrationPose::Neutral => &self.neutral,
            CalibrationPose::A => &self.a,
            CalibrationPose::U => &self.u,
            CalibrationPose::I => &self.i,
        }
    }

    pub fn neutral(&self) -> &CalibrationFrame {
        &self.neutral
    }

    fn validate_frame(&self, pose: CalibrationPose) -> Result<(), CalibrationError> {
        let frame = self.frame(pose);
        for index in landmarks::ANCHORS.iter().chain(landmarks::MOUTH_LANDMARKS.iter()) {
            if !frame.landmarks.contains_key(index) {
                return Err(CalibrationError::MissingLandmark {
                    pose: pose.name(),
                    index: *index,
                });
            }
        }
        Ok(())
    }
}

/// Parse a calibration JSON payload into a validated set.
pub fn from_json(payload: &str) -> Result<CalibrationSet, CalibrationError> {
    let raw: RawCalibrationSet =
        serde_json::from_str(payload).map_err(|e| CalibrationError::Parse(e.to_string()))?;
    raw.into_calibration()
}

/// Raw calibration payload as produced by the external loader.
#[derive(Debug, Deserialize)]
pub struct RawCalibrationSet {
    neutral: RawCalibrationFrame,
    a: RawCalibrationFrame,
    u: RawCalibrationFrame,
    i: RawCalibrationFrame,
}

impl RawCalibrationSet {
    /// Normalize all four frames and validate the result.
    pub fn into_calibration(self) -> Result<CalibrationSet, CalibrationError> {
        CalibrationSet::new(
            self.neutral.normalize()?,
            self.a.normalize()?,
            self.u.normalize()?,
            self.i.normalize()?,
        )
    }
}

#[derive(Debug, Deserialize)]
struct RawCalibrationFrame {
    landmarks: RawLandmarks,
    #[serde(default)]
    blendshapes: RawScores,
}

impl RawCalibrationFrame {
    fn normalize(self) -> Result<CalibrationFrame, CalibrationError> {
        // Only the anchors and mouth points are ever read; drop the rest
        // of the detector's mesh here instead of carrying it around.
        let tracked =
            |index: u32| landmarks::is_mouth_landmark(index) || landmarks::ANCHORS.contains(&index);

        let landmarks = match self.landmarks {
            RawLandmarks::Indexed(map) => {
                let mut out = LandmarkMap::with_capacity(map.len());
                for (key, [x, y, z]) in map {
                    let index = key
                        .parse::<u32>()
                        .map_err(|_| CalibrationError::Parse(format!("bad landmark index '{key}'")))?;
                    if tracked(index) {
                        out.insert(index, Vec3::new(x, y, z));
                    }
                }
                out
            }
            RawLandmarks::Dense(points) => points
                .into_iter()
                .enumerate()
                .filter(|(index, _)| tracked(*index as u32))
                .map(|(index, [x, y, z])| (index as u32, Vec3::new(x, y, z)))
                .collect(),
        };

        let blendshapes = match self.blendshapes {
            RawScores::Named(map) => map,
            RawScores::Categories(categories) => categories
                .into_iter()
                .map(|c| (c.category_name, c.score))
                .collect(),
        };

        Ok(CalibrationFrame::new(landmarks, blendshapes))
    }
}

/// Landmarks arrive either index-keyed or as the detector's dense array.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawLandmarks {
    Indexed(HashMap<String, [f32; 3]>),
    Dense(Vec<[f32; 3]>),
}

/// Blendshapes arrive either name-keyed or as category records.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawScores {
    Named(ScoreMap),
    Categories(Vec<RawCategory>),
}

impl Default for RawScores {
    fn default() -> Self {
        Self::Named(ScoreMap::new())
    }
}

#[derive(Debug, Deserialize)]
struct RawCategory {
    #[serde(rename = "categoryName")]
    category_name: String,
    score: f32,
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;
    use std::f32::consts::TAU;

    /// A synthetic face with all anchors plus the 40 mouth points laid out
    /// as two concentric lip-ring ellipses around the mouth center.
    pub(crate) fn face(mouth_rx: f32, mouth_ry: f32) -> LandmarkMap {
        let mut map = LandmarkMap::new();
        map.insert(landmarks::NOSE_TIP, Vec3::new(0.5, 0.55, 0.0));
        map.insert(landmarks::LEFT_EYE_INNER, Vec3::new(0.45, 0.4, 0.0));
        map.insert(landmarks::RIGHT_EYE_INNER, Vec3::new(0.55, 0.4, 0.0));
        let center = Vec3::new(0.5, 0.7, 0.01);
        for (i, &idx) in landmarks::MOUTH_LANDMARKS.iter().enumerate() {
            // 20 points per ring; the inner ring sits at 80% of the radius
            let ring_scale = if i < 20 { 1.0 } else { 0.8 };
            let theta = TAU * (i % 20) as f32 / 20.0;
            map.insert(
                idx,
                center
                    + Vec3::new(
                        ring_scale * mouth_rx * theta.cos(),
                        ring_scale * mouth_ry * theta.sin(),
                        0.0,
                    ),
            );
        }
        map
    }

    pub(crate) fn frame(mouth_rx: f32, mouth_ry: f32) -> CalibrationFrame {
        CalibrationFrame::new(face(mouth_rx, mouth_ry), ScoreMap::new())
    }

    /// A full calibration set with distinct basis shapes.
    pub(crate) fn set() -> CalibrationSet {
        CalibrationSet::new(
            frame(0.06, 0.02),  // neutral
            frame(0.06, 0.05),  // a: open
            frame(0.035, 0.03), // u: rounded
            frame(0.08, 0.015), // i: spread
        )
        .unwrap()
    }
}
