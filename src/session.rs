//! Frame-synchronous overlay session.
//!
//! One session owns the immutable calibration data, the once-derived vowel
//! basis and calibrated head frame, the cached static target for the
//! selected vowel, and the score smoother. Each incoming frame drives one
//! sequential pass; a failing frame returns early and leaves every piece
//! of persistent state untouched, so the caller may simply skip it and
//! hold the last good overlay.
//!
//! The session is deliberately single-threaded: the caller serializes
//! frame delivery, and concurrent streams use independent sessions.

use crate::calibration::CalibrationSet;
use crate::config::Config;
use crate::error::{CalibrationError, FrameError, MouthposeError};
use crate::features::{self, FeatureVector};
use crate::head_pose::HeadPoseFrame;
use crate::smoothing::ScoreSmoother;
use crate::vowel::{self, Vowel, VowelBasis};
use crate::{overlay, LandmarkMap, ScoreMap, TargetShape};

/// Everything one successfully processed frame produces.
#[derive(Debug, Clone)]
pub struct FrameOutput {
    /// Live-space target positions for the renderer.
    pub overlay: TargetShape,
    /// Articulatory features of the live mouth, for diagnostics.
    pub features: FeatureVector,
    /// Smoothed blendshape scores, empty when the frame carried none.
    pub smoothed_scores: ScoreMap,
}

/// The per-stream driver tying the components together.
#[derive(Debug)]
pub struct OverlaySession {
    config: Config,
    calibration: CalibrationSet,
    basis: VowelBasis,
    calibrated_pose: HeadPoseFrame,
    vowel: Vowel,
    target: TargetShape,
    scores: ScoreSmoother,
}

impl OverlaySession {
    /// Build a session from a validated calibration set.
    ///
    /// Derives the vowel basis and the calibrated head frame once; any
    /// failure here is a configuration-class error surfaced before frame
    /// processing begins.
    pub fn new(calibration: CalibrationSet, config: Config) -> Result<Self, MouthposeError> {
        let epsilon = config.geometry.epsilon;

        let basis =
            VowelBasis::from_calibration(&calibration, epsilon, config.basis.transition_time)?;
        let calibrated_pose = HeadPoseFrame::from_landmarks(calibration.neutral().landmarks(), epsilon)
            .map_err(|source| CalibrationError::Degenerate {
                pose: "neutral",
                source,
            })?;

        let vowel = Vowel::A;
        let target = vowel::synthesize(vowel, &calibration)?;
        let scores = ScoreSmoother::new(config.smoothing.score_alpha)
            .with_history_depth(config.smoothing.history_depth);

        tracing::info!(
            vowel = vowel.symbol(),
            scale = calibrated_pose.scale,
            "overlay session ready"
        );

        Ok(Self {
            config,
            calibration,
            basis,
            calibrated_pose,
            vowel,
            target,
            scores,
        })
    }

    /// The currently selected vowel.
    pub fn vowel(&self) -> Vowel {
        self.vowel
    }

    /// The diagnostic feature-space basis.
    pub fn basis(&self) -> &VowelBasis {
        &self.basis
    }

    /// The head frame built from the neutral calibration capture.
    pub fn calibrated_pose(&self) -> &HeadPoseFrame {
        &self.calibrated_pose
    }

    /// The calibration data owned by this session.
    pub fn calibration(&self) -> &CalibrationSet {
        &self.calibration
    }

    /// Select a vowel, re-synthesizing and caching its static target.
    pub fn set_vowel(&mut self, vowel: Vowel) -> Result<(), MouthposeError> {
        if vowel == self.vowel {
            return Ok(());
        }
        self.target = vowel::synthesize(vowel, &self.calibration)?;
        self.vowel = vowel;
        tracing::debug!(vowel = vowel.symbol(), "vowel target re-synthesized");
        Ok(())
    }

    /// Select a vowel by its textual symbol.
    pub fn set_vowel_symbol(&mut self, symbol: &str) -> Result<(), MouthposeError> {
        let vowel = Vowel::from_symbol(symbol)?;
        self.set_vowel(vowel)
    }

    /// Process one live frame.
    ///
    /// Runs the sequential pass: feature extraction, head-pose frame,
    /// overlay re-projection, then score smoothing. Any failure returns
    /// before the smoother is touched, so a skipped frame never corrupts
    /// stream state.
    pub fn process_frame(
        &mut self,
        landmarks: &LandmarkMap,
        scores: Option<&ScoreMap>,
    ) -> Result<FrameOutput, FrameError> {
        let epsilon = self.config.geometry.epsilon;

        let features = features::extract(landmarks, epsilon)?;
        let live = HeadPoseFrame::from_landmarks(landmarks, epsilon)?;
        let overlay = overlay::project(&self.target, &self.calibrated_pose, &live);
        let smoothed_scores = scores
            .map(|raw| self.scores.apply(raw))
            .unwrap_or_default();

        Ok(FrameOutput {
            overlay,
            features,
            smoothed_scores,
        })
    }

    /// Recent smoothed score maps, oldest first, for diagnostic display.
    pub fn score_history(&self) -> impl Iterator<Item = &ScoreMap> {
        self.scores.history()
    }

    /// Reset per-stream smoother state, as when the input stream restarts.
    pub fn reset_streams(&mut self) {
        self.scores.reset();
    }
}
