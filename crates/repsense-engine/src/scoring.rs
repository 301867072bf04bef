//! Rep accuracy scoring

use repsense_core::ThresholdResult;

const PROGRESS_WEIGHT: f32 = 0.7;
const FORM_WEIGHT: f32 = 0.3;
/// Reps that get this far toward the target score at least `PASS_FLOOR`
const PASS_PROGRESS: f32 = 0.8;
const PASS_FLOOR: f32 = 60.0;

/// Score of one rep
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RepScore {
    /// Most target-ward smoothed angle of the rep
    pub peak_angle: f32,
    /// In [0, 1]
    pub progress: f32,
    /// In [0, 1]
    pub form_score: f32,
    /// In [0, 100]
    pub accuracy: f32,
}

impl RepScore {
    pub fn passed(&self) -> bool {
        self.progress >= PASS_PROGRESS
    }
}

/// Score a rep from its peak angle
pub fn score_rep(peak_angle: f32, thresholds: &ThresholdResult) -> RepScore {
    if !peak_angle.is_finite() {
        return RepScore {
            peak_angle,
            progress: 0.0,
            form_score: 0.0,
            accuracy: 0.0,
        };
    }

    let progress = thresholds.linear_progress(peak_angle);
    let form_score = if thresholds.total_rom > 0.0 {
        ((peak_angle - thresholds.start_angle.center).abs() / thresholds.total_rom).min(1.0)
    } else {
        0.0
    };

    let raw = (progress * PROGRESS_WEIGHT + form_score * FORM_WEIGHT) * 100.0;
    let accuracy = if progress >= PASS_PROGRESS {
        raw.max(PASS_FLOOR)
    } else {
        raw
    }
    .clamp(0.0, 100.0);

    RepScore {
        peak_angle,
        progress,
        form_score,
        accuracy,
    }
}
