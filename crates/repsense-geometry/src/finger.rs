//! Finger exercises, measured on the 21-point hand topology

use std::time::Duration;

use repsense_core::{
    hand, CooldownConfig, ExerciseType, JointAngleSample, LandmarkFrame, ThresholdProfile,
};

use crate::{measure_joint, AnglePlane, ExerciseGeometry, JointAnchors, ProgressCurve};

/// Finger used for a finger curl
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Finger {
    #[default]
    Index,
    Middle,
    Ring,
    Pinky,
}

impl Finger {
    /// Knuckle, middle joint and fingertip
    pub fn anchors(self) -> JointAnchors {
        match self {
            Finger::Index => JointAnchors::new(hand::INDEX_MCP, hand::INDEX_PIP, hand::INDEX_TIP),
            Finger::Middle => {
                JointAnchors::new(hand::MIDDLE_MCP, hand::MIDDLE_PIP, hand::MIDDLE_TIP)
            }
            Finger::Ring => JointAnchors::new(hand::RING_MCP, hand::RING_PIP, hand::RING_TIP),
            Finger::Pinky => JointAnchors::new(hand::PINKY_MCP, hand::PINKY_PIP, hand::PINKY_TIP),
        }
    }
}

/// Finger curl (flexion at the middle joint)
#[derive(Debug, Clone, Default)]
pub struct FingerCurl {
    finger: Finger,
}

impl FingerCurl {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn for_finger(finger: Finger) -> Self {
        Self { finger }
    }

    pub fn finger(&self) -> Finger {
        self.finger
    }
}

impl ExerciseGeometry for FingerCurl {
    fn exercise(&self) -> ExerciseType {
        ExerciseType::FingerCurl
    }

    fn measure(&self, frame: &LandmarkFrame<'_>, min_visibility: f32) -> Option<JointAngleSample> {
        // Fingers curl toward the camera, the image plane alone hides it
        measure_joint(frame, self.finger.anchors(), AnglePlane::Spatial, min_visibility)
            .map(|reading| reading.sample)
    }

    fn default_profile(&self) -> ThresholdProfile {
        ThresholdProfile {
            start_center: 170.0,
            start_tolerance: 15.0,
            target: 80.0,
            completion_tolerance: 25.0,
            return_tolerance: 30.0,
            hold_time_secs: 0.0,
        }
    }

    fn default_cooldown(&self) -> CooldownConfig {
        CooldownConfig {
            min_cooldown: Duration::from_millis(200),
            max_cooldown: Duration::from_millis(800),
            adaptive_scale: 0.2,
        }
    }

    fn progress_curve(&self) -> ProgressCurve {
        ProgressCurve::EaseOut
    }
}
