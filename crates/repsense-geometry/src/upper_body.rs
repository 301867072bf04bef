//! Upper-body exercises: push-up, bicep curl, shoulder press, lateral raise

use std::time::Duration;

use repsense_core::{
    pose, CooldownConfig, ExerciseType, JointAngleSample, LandmarkFrame, ThresholdProfile,
};

use crate::{
    measure_bilateral, AnglePlane, AverageBoth, ExerciseGeometry, JointAnchors, MostExtended,
    MostFlexed, SidePolicy,
};

pub const LEFT_ELBOW: JointAnchors =
    JointAnchors::new(pose::LEFT_SHOULDER, pose::LEFT_ELBOW, pose::LEFT_WRIST);
pub const RIGHT_ELBOW: JointAnchors =
    JointAnchors::new(pose::RIGHT_SHOULDER, pose::RIGHT_ELBOW, pose::RIGHT_WRIST);
pub const LEFT_SHOULDER: JointAnchors =
    JointAnchors::new(pose::LEFT_HIP, pose::LEFT_SHOULDER, pose::LEFT_ELBOW);
pub const RIGHT_SHOULDER: JointAnchors =
    JointAnchors::new(pose::RIGHT_HIP, pose::RIGHT_SHOULDER, pose::RIGHT_ELBOW);

/// Push-up, filmed side-on, both elbows averaged
#[derive(Debug, Clone)]
pub struct PushUp<P = AverageBoth> {
    policy: P,
}

impl PushUp {
    pub fn new() -> Self {
        Self {
            policy: AverageBoth,
        }
    }
}

impl Default for PushUp {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: SidePolicy> PushUp<P> {
    pub fn with_policy(policy: P) -> Self {
        Self { policy }
    }
}

impl<P: SidePolicy> ExerciseGeometry for PushUp<P> {
    fn exercise(&self) -> ExerciseType {
        ExerciseType::PushUp
    }

    fn measure(&self, frame: &LandmarkFrame<'_>, min_visibility: f32) -> Option<JointAngleSample> {
        measure_bilateral(
            frame,
            LEFT_ELBOW,
            RIGHT_ELBOW,
            AnglePlane::Projected,
            min_visibility,
            &self.policy,
        )
    }

    fn default_profile(&self) -> ThresholdProfile {
        ThresholdProfile {
            start_center: 160.0,
            start_tolerance: 15.0,
            target: 90.0,
            completion_tolerance: 25.0,
            return_tolerance: 25.0,
            hold_time_secs: 0.0,
        }
    }

    fn default_cooldown(&self) -> CooldownConfig {
        CooldownConfig {
            min_cooldown: Duration::from_millis(300),
            max_cooldown: Duration::from_millis(1200),
            adaptive_scale: 0.25,
        }
    }
}

/// Bicep curl, measured on the working arm
#[derive(Debug, Clone)]
pub struct BicepCurl<P = MostFlexed> {
    policy: P,
}

impl BicepCurl {
    pub fn new() -> Self {
        Self { policy: MostFlexed }
    }
}

impl Default for BicepCurl {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: SidePolicy> BicepCurl<P> {
    pub fn with_policy(policy: P) -> Self {
        Self { policy }
    }
}

impl<P: SidePolicy> ExerciseGeometry for BicepCurl<P> {
    fn exercise(&self) -> ExerciseType {
        ExerciseType::BicepCurl
    }

    fn measure(&self, frame: &LandmarkFrame<'_>, min_visibility: f32) -> Option<JointAngleSample> {
        // Forearm swings toward the camera during a curl
        measure_bilateral(
            frame,
            LEFT_ELBOW,
            RIGHT_ELBOW,
            AnglePlane::Blended(0.5),
            min_visibility,
            &self.policy,
        )
    }

    fn default_profile(&self) -> ThresholdProfile {
        ThresholdProfile {
            start_center: 160.0,
            start_tolerance: 20.0,
            target: 50.0,
            completion_tolerance: 25.0,
            return_tolerance: 35.0,
            hold_time_secs: 0.2,
        }
    }

    fn default_cooldown(&self) -> CooldownConfig {
        CooldownConfig {
            min_cooldown: Duration::from_millis(300),
            max_cooldown: Duration::from_millis(1500),
            adaptive_scale: 0.3,
        }
    }
}

/// Overhead press, elbows extend from shoulder height to lockout
#[derive(Debug, Clone)]
pub struct ShoulderPress<P = AverageBoth> {
    policy: P,
}

impl ShoulderPress {
    pub fn new() -> Self {
        Self {
            policy: AverageBoth,
        }
    }
}

impl Default for ShoulderPress {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: SidePolicy> ShoulderPress<P> {
    pub fn with_policy(policy: P) -> Self {
        Self { policy }
    }
}

impl<P: SidePolicy> ExerciseGeometry for ShoulderPress<P> {
    fn exercise(&self) -> ExerciseType {
        ExerciseType::ShoulderPress
    }

    fn measure(&self, frame: &LandmarkFrame<'_>, min_visibility: f32) -> Option<JointAngleSample> {
        measure_bilateral(
            frame,
            LEFT_ELBOW,
            RIGHT_ELBOW,
            AnglePlane::Projected,
            min_visibility,
            &self.policy,
        )
    }

    fn default_profile(&self) -> ThresholdProfile {
        ThresholdProfile {
            start_center: 90.0,
            start_tolerance: 15.0,
            target: 165.0,
            completion_tolerance: 20.0,
            return_tolerance: 25.0,
            hold_time_secs: 0.0,
        }
    }

    fn default_cooldown(&self) -> CooldownConfig {
        CooldownConfig {
            min_cooldown: Duration::from_millis(400),
            max_cooldown: Duration::from_millis(1500),
            adaptive_scale: 0.3,
        }
    }
}

/// Lateral raise, measured at the shoulder of the higher arm
#[derive(Debug, Clone)]
pub struct LateralRaise<P = MostExtended> {
    policy: P,
}

impl LateralRaise {
    pub fn new() -> Self {
        Self {
            policy: MostExtended,
        }
    }
}

impl Default for LateralRaise {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: SidePolicy> LateralRaise<P> {
    pub fn with_policy(policy: P) -> Self {
        Self { policy }
    }
}

impl<P: SidePolicy> ExerciseGeometry for LateralRaise<P> {
    fn exercise(&self) -> ExerciseType {
        ExerciseType::LateralRaise
    }

    fn measure(&self, frame: &LandmarkFrame<'_>, min_visibility: f32) -> Option<JointAngleSample> {
        measure_bilateral(
            frame,
            LEFT_SHOULDER,
            RIGHT_SHOULDER,
            AnglePlane::Projected,
            min_visibility,
            &self.policy,
        )
    }

    fn default_profile(&self) -> ThresholdProfile {
        ThresholdProfile {
            start_center: 20.0,
            start_tolerance: 15.0,
            target: 90.0,
            completion_tolerance: 15.0,
            return_tolerance: 25.0,
            hold_time_secs: 0.3,
        }
    }

    fn default_cooldown(&self) -> CooldownConfig {
        CooldownConfig {
            min_cooldown: Duration::from_millis(400),
            max_cooldown: Duration::from_millis(1800),
            adaptive_scale: 0.3,
        }
    }
}
