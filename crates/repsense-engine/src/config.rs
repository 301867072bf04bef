//! Engine configuration

use repsense_core::{RepError, RepResult};
use repsense_geometry::DEFAULT_SMOOTHING_WINDOW;

/// Detector tuning shared by every exercise
#[derive(Clone, Debug, PartialEq)]
pub struct EngineConfig {
    /// Frames in the angle moving average
    pub smoothing_window: usize,
    /// Consecutive frames a candidate transition must persist
    pub debounce_frames: u32,
    /// Landmarks below this visibility count as missing
    pub min_visibility: f32,
    /// Confidence below this adds a reposition hint
    pub low_confidence: f32,
    /// Degrees from the start center toward the target that begin a rep
    pub min_movement_deg: f32,
    /// Degrees of retreat from the peak that abort a rep
    pub reversal_margin_deg: f32,
    /// Per-frame angle change treated as noise
    pub velocity_noise_deg: f32,
    /// Slack past the completion line before a hold is abandoned
    pub hold_exit_margin_deg: f32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            smoothing_window: DEFAULT_SMOOTHING_WINDOW,
            debounce_frames: 3,
            min_visibility: 0.5,
            low_confidence: 0.6,
            min_movement_deg: 10.0,
            reversal_margin_deg: 8.0,
            velocity_noise_deg: 0.5,
            hold_exit_margin_deg: 5.0,
        }
    }
}

impl EngineConfig {
    /// Fast reaction for high-frame-rate, clean input
    pub fn responsive() -> Self {
        EngineConfig {
            smoothing_window: 3,
            debounce_frames: 2,
            min_movement_deg: 8.0,
            reversal_margin_deg: 6.0,
            ..Self::default()
        }
    }

    /// Heavier filtering for noisy estimators or low frame rates
    pub fn stable() -> Self {
        EngineConfig {
            smoothing_window: 7,
            debounce_frames: 4,
            min_visibility: 0.6,
            low_confidence: 0.7,
            min_movement_deg: 12.0,
            reversal_margin_deg: 12.0,
            velocity_noise_deg: 1.0,
            hold_exit_margin_deg: 8.0,
        }
    }

    pub fn validate(&self) -> RepResult<()> {
        if self.smoothing_window == 0 {
            return Err(RepError::InvalidConfig("smoothing_window must be at least 1".into()));
        }
        if self.debounce_frames == 0 {
            return Err(RepError::InvalidConfig("debounce_frames must be at least 1".into()));
        }
        for (name, value) in [
            ("min_visibility", self.min_visibility),
            ("low_confidence", self.low_confidence),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(RepError::InvalidConfig(format!("{name} must be in [0, 1], got {value}")));
            }
        }
        for (name, value) in [
            ("min_movement_deg", self.min_movement_deg),
            ("reversal_margin_deg", self.reversal_margin_deg),
            ("velocity_noise_deg", self.velocity_noise_deg),
            ("hold_exit_margin_deg", self.hold_exit_margin_deg),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(RepError::InvalidConfig(format!(
                    "{name} must be finite and non-negative, got {value}"
                )));
            }
        }
        Ok(())
    }
}
