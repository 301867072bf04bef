//! Exercise geometry strategy
//!
//! The hooks the state machine needs from an exercise: how to measure the
//! driving joint, the default thresholds and cooldown, and the progress and
//! position predicates. Predicates default to the direction-aware rules of
//! [`ThresholdResult`] and are only overridden where an exercise needs to.

use std::fmt;

use repsense_core::{
    CooldownConfig, ExerciseType, FrameTime, JointAngleSample, JointType, LandmarkFrame,
    ThresholdProfile, ThresholdResult,
};

/// Mapping from linear start-to-target fraction to reported progress
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProgressCurve {
    #[default]
    Linear,
    /// Rises quickly early on, for joints with a small or noisy range
    EaseOut,
}

impl ProgressCurve {
    /// Monotonic on [0, 1], fixes 0 and 1
    pub fn apply(self, linear: f32) -> f32 {
        let p = linear.clamp(0.0, 1.0);
        match self {
            ProgressCurve::Linear => p,
            ProgressCurve::EaseOut => 1.0 - (1.0 - p) * (1.0 - p),
        }
    }
}

/// Per-exercise geometry
pub trait ExerciseGeometry: fmt::Debug + Send {
    fn exercise(&self) -> ExerciseType;

    fn joint(&self) -> JointType {
        self.exercise().joint()
    }

    /// Measure the driving joint, `None` if required landmarks are unusable
    fn measure(&self, frame: &LandmarkFrame<'_>, min_visibility: f32) -> Option<JointAngleSample>;

    fn default_profile(&self) -> ThresholdProfile;

    fn default_cooldown(&self) -> CooldownConfig;

    fn default_thresholds(&self) -> ThresholdResult {
        self.default_profile().build(FrameTime::ZERO)
    }

    fn progress_curve(&self) -> ProgressCurve {
        ProgressCurve::Linear
    }

    /// Progress in [0, 1] from start toward target
    fn progress(&self, angle: f32, thresholds: &ThresholdResult) -> f32 {
        self.progress_curve().apply(thresholds.linear_progress(angle))
    }

    fn is_in_start_position(&self, angle: f32, thresholds: &ThresholdResult) -> bool {
        thresholds.in_start_band(angle)
    }

    fn has_reached_target(&self, angle: f32, thresholds: &ThresholdResult) -> bool {
        thresholds.passed_completion(angle)
    }

    fn has_returned(&self, angle: f32, thresholds: &ThresholdResult) -> bool {
        thresholds.passed_return(angle)
    }
}

impl<G: ExerciseGeometry + ?Sized> ExerciseGeometry for Box<G> {
    fn exercise(&self) -> ExerciseType {
        (**self).exercise()
    }

    fn joint(&self) -> JointType {
        (**self).joint()
    }

    fn measure(&self, frame: &LandmarkFrame<'_>, min_visibility: f32) -> Option<JointAngleSample> {
        (**self).measure(frame, min_visibility)
    }

    fn default_profile(&self) -> ThresholdProfile {
        (**self).default_profile()
    }

    fn default_cooldown(&self) -> CooldownConfig {
        (**self).default_cooldown()
    }

    fn default_thresholds(&self) -> ThresholdResult {
        (**self).default_thresholds()
    }

    fn progress_curve(&self) -> ProgressCurve {
        (**self).progress_curve()
    }

    fn progress(&self, angle: f32, thresholds: &ThresholdResult) -> f32 {
        (**self).progress(angle, thresholds)
    }

    fn is_in_start_position(&self, angle: f32, thresholds: &ThresholdResult) -> bool {
        (**self).is_in_start_position(angle, thresholds)
    }

    fn has_reached_target(&self, angle: f32, thresholds: &ThresholdResult) -> bool {
        (**self).has_reached_target(angle, thresholds)
    }

    fn has_returned(&self, angle: f32, thresholds: &ThresholdResult) -> bool {
        (**self).has_returned(angle, thresholds)
    }
}
