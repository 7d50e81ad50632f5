use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Tunables for the voice activity detector.
///
/// No range validation is performed; callers own sane values. The defaults
/// below are the documented operating point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VadConfig {
    /// Smoothed-level cutoff above which audio is considered possibly voice.
    pub threshold: f32,

    /// Minimum continuous time above threshold before voice-start fires.
    pub min_duration_ms: u64,

    /// Maximum continuous time below threshold, while voice is active,
    /// before voice-end fires.
    pub max_silence_ms: u64,

    /// Multiplicative gain applied to the raw sample before smoothing.
    pub sensitivity: f32,

    /// Exponential moving-average coefficient in [0, 1); larger = slower.
    pub smoothing: f32,
}

impl Default for VadConfig {
    fn default() -> Self {
        Self {
            threshold: 0.01,
            min_duration_ms: 150,
            max_silence_ms: 800,
            sensitivity: 0.6,
            smoothing: 0.85,
        }
    }
}

impl VadConfig {
    pub fn min_duration(&self) -> Duration {
        Duration::from_millis(self.min_duration_ms)
    }

    pub fn max_silence(&self) -> Duration {
        Duration::from_millis(self.max_silence_ms)
    }

    /// Merge a partial update; unspecified fields retain their prior values.
    pub fn merge(&mut self, patch: VadConfigPatch) {
        if let Some(threshold) = patch.threshold {
            self.threshold = threshold;
        }
        if let Some(min_duration_ms) = patch.min_duration_ms {
            self.min_duration_ms = min_duration_ms;
        }
        if let Some(max_silence_ms) = patch.max_silence_ms {
            self.max_silence_ms = max_silence_ms;
        }
        if let Some(sensitivity) = patch.sensitivity {
            self.sensitivity = sensitivity;
        }
        if let Some(smoothing) = patch.smoothing {
            self.smoothing = smoothing;
        }
    }
}

/// Partial configuration update. Fields left as `None` keep their value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct VadConfigPatch {
    pub threshold: Option<f32>,
    pub min_duration_ms: Option<u64>,
    pub max_silence_ms: Option<u64>,
    pub sensitivity: Option<f32>,
    pub smoothing: Option<f32>,
}
