//! Temporal smoothing for noisy per-frame score streams.
//!
//! Exponential moving average over numeric vectors, plus a score-map
//! wrapper for named blendshape channels. Each smoother owns the state of
//! exactly one stream; concurrent streams need independent instances.

use std::collections::VecDeque;

use crate::ScoreMap;

/// Exponential moving average over a fixed-shape numeric vector stream.
///
/// The first sample passes through unmodified and seeds the state;
/// subsequent samples blend as `previous * alpha + new * (1 - alpha)`.
/// A bounded rolling history of smoothed samples is kept for diagnostics.
#[derive(Debug, Clone)]
pub struct EmaSmoother {
    alpha: f32,
    previous: Option<Vec<f32>>,
    history: VecDeque<Vec<f32>>,
    history_depth: usize,
}

impl EmaSmoother {
    /// Create a smoother. `alpha` is clamped into [0, 1).
    pub fn new(alpha: f32) -> Self {
        Self {
            alpha: alpha.clamp(0.0, 1.0 - f32::EPSILON),
            previous: None,
            history: VecDeque::new(),
            history_depth: 5,
        }
    }

    /// Override the diagnostic history depth.
    pub fn with_history_depth(mut self, depth: usize) -> Self {
        self.history_depth = depth;
        self
    }

    /// Smooth one sample and return the result.
    ///
    /// A sample whose length differs from the previous one is treated as a
    /// stream restart and passes through unmodified.
    pub fn apply(&mut self, sample: &[f32]) -> Vec<f32> {
        let smoothed = match &self.previous {
            Some(previous) if previous.len() == sample.len() => previous
                .iter()
                .zip(sample.iter())
                .map(|(&prev, &new)| prev * self.alpha + new * (1.0 - self.alpha))
                .collect(),
            _ => sample.to_vec(),
        };

        self.previous = Some(smoothed.clone());
        self.history.push_back(smoothed.clone());
        while self.history.len() > self.history_depth {
            self.history.pop_front();
        }
        smoothed
    }

    /// Forget all state, as when the stream restarts.
    pub fn reset(&mut self) {
        self.previous = None;
        self.history.clear();
    }

    /// Recent smoothed samples, oldest first.
    pub fn history(&self) -> impl Iterator<Item = &[f32]> {
        self.history.iter().map(|v| v.as_slice())
    }

    pub fn alpha(&self) -> f32 {
        self.alpha
    }
}

/// Per-name EMA channels over a blendshape score map.
///
/// Channels are populated lazily; each name follows the same
/// first-sample-passthrough rule as the vector smoother.
#[derive(Debug, Clone)]
pub struct ScoreSmoother {
    alpha: f32,
    channels: ScoreMap,
    history: VecDeque<ScoreMap>,
    history_depth: usize,
}

impl ScoreSmoother {
    pub fn new(alpha: f32) -> Self {
        Self {
            alpha: alpha.clamp(0.0, 1.0 - f32::EPSILON),
            channels: ScoreMap::new(),
            history: VecDeque::new(),
            history_depth: 5,
        }
    }

    /// Override the diagnostic history depth.
    pub fn with_history_depth(mut self, depth: usize) -> Self {
        self.history_depth = depth;
        self
    }

    /// Smooth one score map and return the result.
    pub fn apply(&mut self, raw: &ScoreMap) -> ScoreMap {
        let mut out = ScoreMap::with_capacity(raw.len());
        for (name, &value) in raw {
            let smoothed = match self.channels.get(name) {
                Some(&previous) => previous * self.alpha + value * (1.0 - self.alpha),
                None => value,
            };
            self.channels.insert(name.clone(), smoothed);
            out.insert(name.clone(), smoothed);
        }

        self.history.push_back(out.clone());
        while self.history.len() > self.history_depth {
            self.history.pop_front();
        }
        out
    }

    /// Forget all channel and history state.
    pub fn reset(&mut self) {
        self.channels.clear();
        self.history.clear();
    }

    /// Recent smoothed score maps, oldest first.
    pub fn history(&self) -> impl Iterator<Item = &ScoreMap> {
        self.history.iter()
    }
}
