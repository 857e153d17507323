//! Vowel symbols, the calibration-derived basis, and target synthesis.
//!
//! Two distinct models of "the vowel target" live here. The per-landmark
//! interpolation in [`synthesize`] is authoritative for the rendered
//! overlay. The aggregate feature-space [`VowelBasis`] is diagnostic only;
//! it is never fed back into the overlay path.

use glam::Vec3;

use crate::calibration::{CalibrationPose, CalibrationSet};
use crate::error::{CalibrationError, FrameError};
use crate::features::{self, FeatureVector};
use crate::landmarks;
use crate::TargetShape;

/// The selectable vowel symbols: three captured directly during
/// calibration (a, u, i) and seven derived by interpolation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Vowel {
    A,
    I,
    U,
    E,
    O,
    /// Near-open front, as in "cat".
    Ae,
    /// Open-mid front, as in "bed".
    Eh,
    /// Open-mid back rounded, as in "thought".
    Ao,
    /// Near-close back rounded, as in "foot".
    Oo,
    /// Mid-central schwa, as in "about".
    Uh,
}

impl Vowel {
    pub const ALL: [Vowel; 10] = [
        Self::A,
        Self::I,
        Self::U,
        Self::E,
        Self::O,
        Self::Ae,
        Self::Eh,
        Self::Ao,
        Self::Oo,
        Self::Uh,
    ];

    /// The textual symbol used by UI selectors and the CLI.
    pub fn symbol(&self) -> &'static str {
        match self {
            Self::A => "a",
            Self::I => "i",
            Self::U => "u",
            Self::E => "e",
            Self::O => "o",
            Self::Ae => "ae",
            Self::Eh => "eh",
            Self::Ao => "ao",
            Self::Oo => "oo",
            Self::Uh => "uh",
        }
    }

    /// Parse a symbol. Fails with `UnknownVowel` for anything outside the
    /// fixed ten-symbol set.
    pub fn from_symbol(symbol: &str) -> Result<Self, FrameError> {
        match symbol.to_lowercase().as_str() {
            "a" => Ok(Self::A),
            "i" => Ok(Self::I),
            "u" => Ok(Self::U),
            "e" => Ok(Self::E),
            "o" => Ok(Self::O),
            "ae" => Ok(Self::Ae),
            "eh" => Ok(Self::Eh),
            "ao" => Ok(Self::Ao),
            "oo" => Ok(Self::Oo),
            "uh" => Ok(Self::Uh),
            _ => Err(FrameError::UnknownVowel(symbol.to_string())),
        }
    }

    /// Whether this vowel was captured directly during calibration.
    pub fn is_basis(&self) -> bool {
        matches!(self, Self::A | Self::I | Self::U)
    }

    /// The calibration pose holding this vowel's captured shape, for
    /// basis vowels only.
    pub fn calibration_pose(&self) -> Option<CalibrationPose> {
        match self {
            Self::A => Some(CalibrationPose::A),
            Self::U => Some(CalibrationPose::U),
            Self::I => Some(CalibrationPose::I),
            _ => None,
        }
    }

    /// Interpolation coefficients for derived vowels; `None` for basis
    /// vowels, which reproduce their captured shape verbatim.
    pub fn coefficients(&self) -> Option<Coefficients> {
        match self {
            Self::A | Self::I | Self::U => None,
            Self::E => Some(Coefficients::new(0.45, 0.0, 0.70)),
            Self::O => Some(Coefficients::new(0.55, 0.75, 0.0)),
            Self::Ae => Some(Coefficients::new(0.80, 0.0, 0.55)),
            Self::Eh => Some(Coefficients::new(0.55, 0.0, 0.45)),
            Self::Ao => Some(Coefficients::new(0.70, 0.50, 0.0)),
            Self::Oo => Some(Coefficients::new(0.25, 0.80, 0.0)),
            Self::Uh => Some(Coefficients::new(0.35, 0.15, 0.10)),
        }
    }
}

/// Weights over the three basis directions for one derived vowel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coefficients {
    pub open: f32,
    pub round: f32,
    pub spread: f32,
}

impl Coefficients {
    pub fn new(open: f32, round: f32, spread: f32) -> Self {
        Self {
            open,
            round,
            spread,
        }
    }
}

/// Feature-space deltas of the three basis vowels against neutral, with
/// rate magnitudes over an assumed transition time. Computed once per
/// calibration load; diagnostic only.
#[derive(Debug, Clone, Copy)]
pub struct VowelBasis {
    /// features(a) - features(neutral)
    pub open_delta: FeatureVector,
    /// features(u) - features(neutral)
    pub round_delta: FeatureVector,
    /// features(i) - features(neutral)
    pub spread_delta: FeatureVector,
    pub open_rate: f32,
    pub round_rate: f32,
    pub spread_rate: f32,
}

impl VowelBasis {
    /// Run the feature extractor over all four calibration frames and
    /// derive the deltas. Deltas are always relative to neutral, never to
    /// each other.
    pub fn from_calibration(
        set: &CalibrationSet,
        epsilon: f32,
        transition_time: f32,
    ) -> Result<Self, CalibrationError> {
        let neutral = pose_features(set, CalibrationPose::Neutral, epsilon)?;
        let a = pose_features(set, CalibrationPose::A, epsilon)?;
        let u = pose_features(set, CalibrationPose::U, epsilon)?;
        let i = pose_features(set, CalibrationPose::I, epsilon)?;

        let open_delta = a.delta(neutral);
        let round_delta = u.delta(neutral);
        let spread_delta = i.delta(neutral);

        Ok(Self {
            open_delta,
            round_delta,
            spread_delta,
            open_rate: open_delta.magnitude() / transition_time,
            round_rate: round_delta.magnitude() / transition_time,
            spread_rate: spread_delta.magnitude() / transition_time,
        })
    }
}

fn pose_features(
    set: &CalibrationSet,
    pose: CalibrationPose,
    epsilon: f32,
) -> Result<FeatureVector, CalibrationError> {
    features::extract(set.frame(pose).landmarks(), epsilon).map_err(|source| {
        CalibrationError::Degenerate {
            pose: pose.name(),
            source,
        }
    })
}

/// Synthesize the static target mouth shape for a vowel, in the
/// calibration's own coordinate space.
///
/// Basis vowels reproduce their captured landmarks verbatim; derived
/// vowels interpolate per point and per axis between the captured shapes.
pub fn synthesize(vowel: Vowel, calibration: &CalibrationSet) -> Result<TargetShape, FrameError> {
    if let Some(pose) = vowel.calibration_pose() {
        let frame = calibration.frame(pose);
        let mut target = TargetShape::with_capacity(landmarks::MOUTH_LANDMARKS.len());
        for &index in &landmarks::MOUTH_LANDMARKS {
            let point = frame
                .point(index)
                .ok_or(FrameError::MissingLandmark(index))?;
            target.insert(index, point);
        }
        return Ok(target);
    }

    let coefficients = vowel
        .coefficients()
        .ok_or_else(|| FrameError::UnknownVowel(vowel.symbol().to_string()))?;
    interpolate(coefficients, calibration)
}

/// Per-point, per-axis interpolation from the neutral shape along the
/// three captured basis directions.
pub fn interpolate(
    coefficients: Coefficients,
    calibration: &CalibrationSet,
) -> Result<TargetShape, FrameError> {
    let neutral = calibration.frame(CalibrationPose::Neutral);
    let a = calibration.frame(CalibrationPose::A);
    let u = calibration.frame(CalibrationPose::U);
    let i = calibration.frame(CalibrationPose::I);

    let mut target = TargetShape::with_capacity(landmarks::MOUTH_LANDMARKS.len());
    for &index in &landmarks::MOUTH_LANDMARKS {
        let n = point_of(neutral, index)?;
        let pa = point_of(a, index)?;
        let pu = point_of(u, index)?;
        let pi = point_of(i, index)?;

        let blended = n
            + coefficients.open * (pa - n)
            + coefficients.round * (pu - n)
            + coefficients.spread * (pi - n);
        target.insert(index, blended);
    }
    Ok(target)
}

fn point_of(frame: &crate::calibration::CalibrationFrame, index: u32) -> Result<Vec3, FrameError> {
    frame
        .point(index)
        .ok_or(FrameError::MissingLandmark(index))
}
