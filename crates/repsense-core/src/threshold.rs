//! Joint-angle thresholds and calibration payloads
//!
//! Thresholds are direction-relative. For a flexion movement such as a squat
//! the knee angle falls from the start posture toward the target, for an
//! abduction movement such as a lateral raise the shoulder angle rises.
//! Every comparison goes through [`ThresholdResult::toward_target`], the
//! signed displacement from the start center toward the target, so the same
//! predicates serve both directions.
//!
//! Along the path from start to target the lines are ordered:
//!
//! ```text
//! start.center ── return_threshold ── completion ── target
//! ```
//!
//! The start band used to enter Ready is narrower than the return line used to
//! finish a rep, which gives the state machine its hysteresis.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{FrameTime, RepError, RepResult};

/// Which way the angle travels from start to target
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MotionDirection {
    /// Angle shrinks toward the target (flexion)
    Decreasing,
    /// Angle grows toward the target (extension, abduction)
    Increasing,
}

impl MotionDirection {
    #[inline]
    pub fn sign(self) -> f32 {
        match self {
            MotionDirection::Decreasing => -1.0,
            MotionDirection::Increasing => 1.0,
        }
    }
}

/// Start posture band
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct StartAngle {
    pub center: f32,
    pub min: f32,
    pub max: f32,
}

impl StartAngle {
    #[inline]
    pub fn contains(&self, angle: f32) -> bool {
        angle >= self.min && angle <= self.max
    }
}

/// Line the joint must pass on the way to the target, and how long to stay past it
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CompletionThreshold {
    pub angle: f32,
    pub hold_time_secs: f32,
}

/// Line the joint must pass on the way back for the rep to finish
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ReturnThreshold {
    pub angle: f32,
}

/// Complete threshold set bound to a detector
///
/// Replaced wholesale on calibration, never merged.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ThresholdResult {
    pub start_angle: StartAngle,
    pub target_angle: f32,
    pub completion: CompletionThreshold,
    pub return_threshold: ReturnThreshold,
    /// Total range of motion in degrees
    pub total_rom: f32,
    pub calculated_at: FrameTime,
}

impl ThresholdResult {
    pub fn direction(&self) -> MotionDirection {
        if self.target_angle < self.start_angle.center {
            MotionDirection::Decreasing
        } else {
            MotionDirection::Increasing
        }
    }

    /// Signed displacement of `angle` from the start center toward the target
    #[inline]
    pub fn toward_target(&self, angle: f32) -> f32 {
        (angle - self.start_angle.center) * self.direction().sign()
    }

    /// Distance from start center to target
    #[inline]
    pub fn span(&self) -> f32 {
        (self.target_angle - self.start_angle.center).abs()
    }

    /// Fraction of the way from start to target, clamped to [0, 1]
    pub fn linear_progress(&self, angle: f32) -> f32 {
        let span = self.span();
        if span <= f32::EPSILON {
            return 0.0;
        }
        (self.toward_target(angle) / span).clamp(0.0, 1.0)
    }

    #[inline]
    pub fn in_start_band(&self, angle: f32) -> bool {
        self.start_angle.contains(angle)
    }

    /// Angle is at or beyond the completion line
    #[inline]
    pub fn passed_completion(&self, angle: f32) -> bool {
        self.toward_target(angle) >= self.toward_target(self.completion.angle)
    }

    /// Angle is back at or beyond the return line
    #[inline]
    pub fn passed_return(&self, angle: f32) -> bool {
        self.toward_target(angle) <= self.toward_target(self.return_threshold.angle)
    }

    pub fn hold_time(&self) -> Duration {
        Duration::try_from_secs_f32(self.completion.hold_time_secs.max(0.0)).unwrap_or(Duration::MAX)
    }

    /// Check internal consistency
    ///
    /// Detectors assume well-formed thresholds. Callers holding thresholds from
    /// an untrusted source should validate before applying them.
    pub fn validate(&self) -> RepResult<()> {
        let values = [
            self.start_angle.center,
            self.start_angle.min,
            self.start_angle.max,
            self.target_angle,
            self.completion.angle,
            self.completion.hold_time_secs,
            self.return_threshold.angle,
            self.total_rom,
        ];
        if values.iter().any(|v| !v.is_finite()) {
            return Err(invalid("non-finite value"));
        }
        if !(self.start_angle.min <= self.start_angle.center
            && self.start_angle.center <= self.start_angle.max)
        {
            return Err(invalid("start center outside start band"));
        }
        if self.span() <= f32::EPSILON {
            return Err(invalid("target equals start center"));
        }
        if self.in_start_band(self.target_angle) {
            return Err(invalid("target inside start band"));
        }
        let completion = self.toward_target(self.completion.angle);
        if completion <= 0.0 {
            return Err(invalid("completion line not between start and target"));
        }
        let ret = self.toward_target(self.return_threshold.angle);
        if ret < 0.0 || ret >= completion {
            return Err(invalid("return line not between start and completion"));
        }
        if self.completion.hold_time_secs < 0.0 {
            return Err(invalid("negative hold time"));
        }
        if self.total_rom <= 0.0 {
            return Err(invalid("total range of motion must be positive"));
        }
        Ok(())
    }
}

fn invalid(reason: &str) -> RepError {
    RepError::InvalidThresholds(reason.to_string())
}

/// Tolerance-based description of a threshold set
///
/// Default thresholds for each exercise and thresholds derived from a user's
/// measured range both go through a profile.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ThresholdProfile {
    pub start_center: f32,
    /// Half-width of the start band
    pub start_tolerance: f32,
    pub target: f32,
    /// How far short of the target still counts as reaching it
    pub completion_tolerance: f32,
    /// How far short of the start still counts as having returned
    pub return_tolerance: f32,
    pub hold_time_secs: f32,
}

impl ThresholdProfile {
    /// Same tolerances around a measured start and target
    pub fn with_range(mut self, start_center: f32, target: f32) -> Self {
        self.start_center = start_center;
        self.target = target;
        self
    }

    pub fn with_hold_time(mut self, hold_time_secs: f32) -> Self {
        self.hold_time_secs = hold_time_secs;
        self
    }

    /// Build the threshold set
    pub fn build(&self, calculated_at: FrameTime) -> ThresholdResult {
        let sign = if self.target < self.start_center {
            MotionDirection::Decreasing.sign()
        } else {
            MotionDirection::Increasing.sign()
        };

        ThresholdResult {
            start_angle: StartAngle {
                center: self.start_center,
                min: self.start_center - self.start_tolerance,
                max: self.start_center + self.start_tolerance,
            },
            target_angle: self.target,
            completion: CompletionThreshold {
                angle: self.target - sign * self.completion_tolerance,
                hold_time_secs: self.hold_time_secs,
            },
            return_threshold: ReturnThreshold {
                angle: self.start_center + sign * self.return_tolerance,
            },
            total_rom: (self.target - self.start_center).abs(),
            calculated_at,
        }
    }
}

/// Per-user settings captured alongside calibrated thresholds
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CalibrationSettings {
    pub hold_time_secs: f32,
}

/// Output of the external calibration flow
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CalibrationResult {
    pub thresholds: ThresholdResult,
    pub settings: CalibrationSettings,
}

impl CalibrationResult {
    /// Thresholds with the calibrated hold time applied
    pub fn effective_thresholds(&self) -> ThresholdResult {
        let mut thresholds = self.thresholds;
        thresholds.completion.hold_time_secs = self.settings.hold_time_secs;
        thresholds
    }

    pub fn validate(&self) -> RepResult<()> {
        self.effective_thresholds().validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn squat_profile() -> ThresholdProfile {
        ThresholdProfile {
            start_center: 160.0,
            start_tolerance: 15.0,
            target: 100.0,
            completion_tolerance: 30.0,
            return_tolerance: 25.0,
            hold_time_secs: 0.5,
        }
    }

    fn raise_profile() -> ThresholdProfile {
        ThresholdProfile {
            start_center: 20.0,
            start_tolerance: 15.0,
            target: 90.0,
            completion_tolerance: 15.0,
            return_tolerance: 25.0,
            hold_time_secs: 0.0,
        }
    }

    #[test]
    fn test_decreasing_profile_lines() {
        let t = squat_profile().build(FrameTime::ZERO);

        assert_eq!(t.direction(), MotionDirection::Decreasing);
        assert_eq!(t.start_angle.min, 145.0);
        assert_eq!(t.start_angle.max, 175.0);
        assert_eq!(t.completion.angle, 130.0);
        assert_eq!(t.return_threshold.angle, 135.0);
        assert_eq!(t.total_rom, 60.0);
        assert!(t.validate().is_ok());
    }

    #[test]
    fn test_decreasing_predicates() {
        let t = squat_profile().build(FrameTime::ZERO);

        assert!(t.passed_completion(130.0));
        assert!(t.passed_completion(95.0));
        assert!(!t.passed_completion(135.0));
        assert!(t.passed_return(140.0));
        assert!(!t.passed_return(130.0));
        assert_eq!(t.linear_progress(160.0), 0.0);
        assert_eq!(t.linear_progress(130.0), 0.5);
        assert_eq!(t.linear_progress(95.0), 1.0);
        assert_eq!(t.linear_progress(170.0), 0.0);
    }

    #[test]
    fn test_increasing_profile_lines() {
        let t = raise_profile().build(FrameTime::ZERO);

        assert_eq!(t.direction(), MotionDirection::Increasing);
        assert_eq!(t.completion.angle, 75.0);
        assert_eq!(t.return_threshold.angle, 45.0);
        assert!(t.passed_completion(80.0));
        assert!(!t.passed_completion(70.0));
        assert!(t.passed_return(40.0));
        assert!(t.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_misordered_lines() {
        let mut t = squat_profile().build(FrameTime::ZERO);
        t.return_threshold.angle = 120.0;
        assert!(matches!(t.validate(), Err(RepError::InvalidThresholds(_))));

        let mut t = squat_profile().build(FrameTime::ZERO);
        t.completion.angle = 170.0;
        assert!(t.validate().is_err());

        let mut t = squat_profile().build(FrameTime::ZERO);
        t.target_angle = f32::NAN;
        assert!(t.validate().is_err());
    }

    #[test]
    fn test_calibration_overrides_hold_time() {
        let calibration = CalibrationResult {
            thresholds: squat_profile().build(FrameTime::from_millis(5)),
            settings: CalibrationSettings {
                hold_time_secs: 1.25,
            },
        };

        let effective = calibration.effective_thresholds();
        assert_eq!(effective.completion.hold_time_secs, 1.25);
        assert_eq!(effective.hold_time(), Duration::from_millis(1250));
        assert!(calibration.validate().is_ok());
    }

    #[test]
    fn test_calibration_payload_from_json() {
        let json = r#"{
            "thresholds": {
                "start_angle": { "center": 165.0, "min": 150.0, "max": 180.0 },
                "target_angle": 90.0,
                "completion": { "angle": 115.0, "hold_time_secs": 0.0 },
                "return_threshold": { "angle": 140.0 },
                "total_rom": 75.0,
                "calculated_at": 1200
            },
            "settings": { "hold_time_secs": 0.8 }
        }"#;

        let calibration: CalibrationResult = serde_json::from_str(json).unwrap();
        assert!(calibration.validate().is_ok());
        assert_eq!(calibration.thresholds.calculated_at, FrameTime::from_millis(1200));
        assert_eq!(calibration.effective_thresholds().completion.hold_time_secs, 0.8);
    }

    mod props {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn progress_is_bounded(angle in -360.0f32..360.0, start in 10.0f32..170.0, span in 20.0f32..120.0) {
                let profile = squat_profile().with_range(start, start - span);
                let t = profile.build(FrameTime::ZERO);
                let p = t.linear_progress(angle);
                prop_assert!((0.0..=1.0).contains(&p));
            }

            #[test]
            fn completion_implies_not_returned(angle in 0.0f32..180.0) {
                let t = squat_profile().build(FrameTime::ZERO);
                prop_assert!(!(t.passed_completion(angle) && t.passed_return(angle)));
            }
        }
    }
}
