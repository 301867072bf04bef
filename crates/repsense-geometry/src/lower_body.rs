//! Lower-body exercises: squat, lunge, knee raise

use std::time::Duration;

use repsense_core::{
    pose, CooldownConfig, ExerciseType, JointAngleSample, LandmarkFrame, ThresholdProfile,
};

use crate::{
    measure_bilateral, AnglePlane, AverageBoth, ExerciseGeometry, JointAnchors, MostFlexed,
    NearestDepth, ProgressCurve, SidePolicy,
};

pub const LEFT_KNEE: JointAnchors = JointAnchors::new(pose::LEFT_HIP, pose::LEFT_KNEE, pose::LEFT_ANKLE);
pub const RIGHT_KNEE: JointAnchors =
    JointAnchors::new(pose::RIGHT_HIP, pose::RIGHT_KNEE, pose::RIGHT_ANKLE);
pub const LEFT_HIP: JointAnchors =
    JointAnchors::new(pose::LEFT_SHOULDER, pose::LEFT_HIP, pose::LEFT_KNEE);
pub const RIGHT_HIP: JointAnchors =
    JointAnchors::new(pose::RIGHT_SHOULDER, pose::RIGHT_HIP, pose::RIGHT_KNEE);

/// Knee angles foreshortened by a front-on camera are pulled toward the 3D angle
const KNEE_PLANE: AnglePlane = AnglePlane::Blended(0.3);

/// Squat, both knees averaged
#[derive(Debug, Clone)]
pub struct Squat<P = AverageBoth> {
    policy: P,
}

impl Squat {
    pub fn new() -> Self {
        Self {
            policy: AverageBoth,
        }
    }
}

impl Default for Squat {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: SidePolicy> Squat<P> {
    pub fn with_policy(policy: P) -> Self {
        Self { policy }
    }
}

impl<P: SidePolicy> ExerciseGeometry for Squat<P> {
    fn exercise(&self) -> ExerciseType {
        ExerciseType::Squat
    }

    fn measure(&self, frame: &LandmarkFrame<'_>, min_visibility: f32) -> Option<JointAngleSample> {
        measure_bilateral(frame, LEFT_KNEE, RIGHT_KNEE, KNEE_PLANE, min_visibility, &self.policy)
    }

    fn default_profile(&self) -> ThresholdProfile {
        ThresholdProfile {
            start_center: 160.0,
            start_tolerance: 15.0,
            target: 100.0,
            completion_tolerance: 30.0,
            return_tolerance: 25.0,
            hold_time_secs: 0.5,
        }
    }

    fn default_cooldown(&self) -> CooldownConfig {
        CooldownConfig {
            min_cooldown: Duration::from_millis(400),
            max_cooldown: Duration::from_millis(1500),
            adaptive_scale: 0.25,
        }
    }
}

/// Lunge, measured on the forward leg
#[derive(Debug, Clone)]
pub struct Lunge<P = NearestDepth> {
    policy: P,
}

impl Lunge {
    pub fn new() -> Self {
        Self {
            policy: NearestDepth,
        }
    }
}

impl Default for Lunge {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: SidePolicy> Lunge<P> {
    pub fn with_policy(policy: P) -> Self {
        Self { policy }
    }
}

impl<P: SidePolicy> ExerciseGeometry for Lunge<P> {
    fn exercise(&self) -> ExerciseType {
        ExerciseType::Lunge
    }

    fn measure(&self, frame: &LandmarkFrame<'_>, min_visibility: f32) -> Option<JointAngleSample> {
        measure_bilateral(frame, LEFT_KNEE, RIGHT_KNEE, KNEE_PLANE, min_visibility, &self.policy)
    }

    fn default_profile(&self) -> ThresholdProfile {
        ThresholdProfile {
            start_center: 165.0,
            start_tolerance: 15.0,
            target: 95.0,
            completion_tolerance: 25.0,
            return_tolerance: 30.0,
            hold_time_secs: 0.3,
        }
    }

    fn default_cooldown(&self) -> CooldownConfig {
        CooldownConfig {
            min_cooldown: Duration::from_millis(500),
            max_cooldown: Duration::from_millis(2000),
            adaptive_scale: 0.3,
        }
    }
}

/// Standing knee raise, measured at the hip of the raised leg
#[derive(Debug, Clone)]
pub struct KneeRaise<P = MostFlexed> {
    policy: P,
}

impl KneeRaise {
    pub fn new() -> Self {
        Self { policy: MostFlexed }
    }
}

impl Default for KneeRaise {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: SidePolicy> KneeRaise<P> {
    pub fn with_policy(policy: P) -> Self {
        Self { policy }
    }
}

impl<P: SidePolicy> ExerciseGeometry for KneeRaise<P> {
    fn exercise(&self) -> ExerciseType {
        ExerciseType::KneeRaise
    }

    fn measure(&self, frame: &LandmarkFrame<'_>, min_visibility: f32) -> Option<JointAngleSample> {
        measure_bilateral(frame, LEFT_HIP, RIGHT_HIP, KNEE_PLANE, min_visibility, &self.policy)
    }

    fn default_profile(&self) -> ThresholdProfile {
        ThresholdProfile {
            start_center: 170.0,
            start_tolerance: 12.0,
            target: 95.0,
            completion_tolerance: 25.0,
            return_tolerance: 30.0,
            hold_time_secs: 0.0,
        }
    }

    fn default_cooldown(&self) -> CooldownConfig {
        CooldownConfig {
            min_cooldown: Duration::from_millis(250),
            max_cooldown: Duration::from_millis(1000),
            adaptive_scale: 0.2,
        }
    }

    fn progress_curve(&self) -> ProgressCurve {
        ProgressCurve::EaseOut
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use repsense_core::{FrameTime, Landmark};

    /// Standing figure, right leg optionally bent at the knee
    fn figure(right_knee_forward: f32, right_depth: f32) -> Vec<Landmark> {
        let mut lms = vec![Landmark::new(0.5, 0.5, 0.0); pose::LANDMARK_COUNT];
        lms[pose::LEFT_SHOULDER] = Landmark::new(0.45, 0.2, 0.0);
        lms[pose::RIGHT_SHOULDER] = Landmark::new(0.55, 0.2, 0.0);
        lms[pose::LEFT_HIP] = Landmark::new(0.45, 0.5, 0.0);
        lms[pose::RIGHT_HIP] = Landmark::new(0.55, 0.5, 0.0);
        lms[pose::LEFT_KNEE] = Landmark::new(0.45, 0.7, 0.0);
        lms[pose::LEFT_ANKLE] = Landmark::new(0.45, 0.9, 0.0);
        lms[pose::RIGHT_KNEE] = Landmark::new(0.55 + right_knee_forward, 0.7, right_depth);
        lms[pose::RIGHT_ANKLE] = Landmark::new(0.55, 0.9, right_depth);
        lms
    }

    #[test]
    fn test_squat_straight_legs() {
        let lms = figure(0.0, 0.0);
        let sample = Squat::new().measure(&LandmarkFrame::new(&lms), 0.5).unwrap();
        assert!((sample.angle - 180.0).abs() < 0.01);
        assert!(Squat::new().default_thresholds().validate().is_ok());
    }

    #[test]
    fn test_squat_averages_knees() {
        let lms = figure(0.2, 0.0);
        let sample = Squat::new().measure(&LandmarkFrame::new(&lms), 0.5).unwrap();
        // Right knee bent to 90, left straight
        assert!((sample.angle - 135.0).abs() < 0.5);
    }

    #[test]
    fn test_lunge_picks_forward_leg() {
        let lms = figure(0.2, -0.2);
        let sample = Lunge::new().measure(&LandmarkFrame::new(&lms), 0.5).unwrap();
        assert!(sample.angle < 150.0);

        let averaged = Lunge::with_policy(AverageBoth)
            .measure(&LandmarkFrame::new(&lms), 0.5)
            .unwrap();
        assert!(averaged.angle > sample.angle);
    }

    #[test]
    fn test_missing_leg_falls_back_to_other_side() {
        let mut lms = figure(0.0, 0.0);
        lms[pose::RIGHT_ANKLE].visibility = 0.1;
        assert!(Squat::new().measure(&LandmarkFrame::new(&lms), 0.5).is_some());

        lms[pose::LEFT_ANKLE].visibility = 0.1;
        assert!(Squat::new().measure(&LandmarkFrame::new(&lms), 0.5).is_none());
    }

    #[test]
    fn test_knee_raise_progress_curve() {
        let raise = KneeRaise::new();
        let thresholds = raise.default_profile().build(FrameTime::ZERO);
        let halfway = (170.0 + 95.0) / 2.0;
        assert!(raise.progress(halfway, &thresholds) > 0.5);
        assert_eq!(raise.progress(95.0, &thresholds), 1.0);
    }

    #[test]
    fn test_default_profiles_are_valid() {
        assert!(Lunge::new().default_thresholds().validate().is_ok());
        assert!(KneeRaise::new().default_thresholds().validate().is_ok());
        assert!(Lunge::new().default_cooldown().validate().is_ok());
    }
}
