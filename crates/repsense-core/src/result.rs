//! Per-frame measurement and detection output

use serde::{Deserialize, Serialize};

use crate::{ExercisePhase, PhaseTransition};

/// A joint angle measured from one frame
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct JointAngleSample {
    /// Degrees, in [0, 180]
    pub angle: f32,
    /// In [0, 1]
    pub confidence: f32,
}

impl JointAngleSample {
    pub fn new(angle: f32, confidence: f32) -> Self {
        Self {
            angle,
            confidence: confidence.clamp(0.0, 1.0),
        }
    }
}

/// Output of one processed frame
///
/// Not retained by the detector.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DetectionResult {
    pub phase: ExercisePhase,
    /// A rep was counted on this frame
    pub rep_completed: bool,
    pub rep_count: u32,
    /// Smoothed angle, absent when the pose could not be measured
    pub current_angle: Option<f32>,
    pub target_angle: f32,
    /// In [0, 1]
    pub progress: f32,
    /// In [0, 100]
    pub accuracy: f32,
    /// In [0, 1], zero when the pose could not be measured
    pub confidence: f32,
    pub feedback: String,
    /// Fraction of the required hold completed, only while holding
    pub hold_progress: Option<f32>,
    pub transition: Option<PhaseTransition>,
}

impl DetectionResult {
    /// Pose could be measured this frame
    pub fn has_pose(&self) -> bool {
        self.current_angle.is_some()
    }
}
