//! Exercise and joint identifiers

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::RepError;

/// Supported exercise types
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExerciseType {
    Squat,
    Lunge,
    PushUp,
    BicepCurl,
    ShoulderPress,
    LateralRaise,
    KneeRaise,
    FingerCurl,
}

impl ExerciseType {
    /// All exercise types in order
    pub fn all() -> &'static [ExerciseType] {
        &[
            ExerciseType::Squat,
            ExerciseType::Lunge,
            ExerciseType::PushUp,
            ExerciseType::BicepCurl,
            ExerciseType::ShoulderPress,
            ExerciseType::LateralRaise,
            ExerciseType::KneeRaise,
            ExerciseType::FingerCurl,
        ]
    }

    /// Stable identifier
    pub fn as_str(self) -> &'static str {
        match self {
            ExerciseType::Squat => "squat",
            ExerciseType::Lunge => "lunge",
            ExerciseType::PushUp => "push_up",
            ExerciseType::BicepCurl => "bicep_curl",
            ExerciseType::ShoulderPress => "shoulder_press",
            ExerciseType::LateralRaise => "lateral_raise",
            ExerciseType::KneeRaise => "knee_raise",
            ExerciseType::FingerCurl => "finger_curl",
        }
    }

    /// Human-readable name
    pub fn display_name(self) -> &'static str {
        match self {
            ExerciseType::Squat => "Squat",
            ExerciseType::Lunge => "Lunge",
            ExerciseType::PushUp => "Push-up",
            ExerciseType::BicepCurl => "Bicep curl",
            ExerciseType::ShoulderPress => "Shoulder press",
            ExerciseType::LateralRaise => "Lateral raise",
            ExerciseType::KneeRaise => "Knee raise",
            ExerciseType::FingerCurl => "Finger curl",
        }
    }

    /// The joint whose angle drives the rep
    pub fn joint(self) -> JointType {
        match self {
            ExerciseType::Squat | ExerciseType::Lunge => JointType::Knee,
            ExerciseType::PushUp | ExerciseType::BicepCurl | ExerciseType::ShoulderPress => {
                JointType::Elbow
            }
            ExerciseType::LateralRaise => JointType::Shoulder,
            ExerciseType::KneeRaise => JointType::Hip,
            ExerciseType::FingerCurl => JointType::Finger,
        }
    }

    /// Measured from hand landmarks rather than body landmarks
    pub fn uses_hand_landmarks(self) -> bool {
        matches!(self, ExerciseType::FingerCurl)
    }
}

impl fmt::Display for ExerciseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExerciseType {
    type Err = RepError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = normalize_id(s);
        match normalized.as_str() {
            "squat" => Ok(ExerciseType::Squat),
            "lunge" => Ok(ExerciseType::Lunge),
            "push_up" | "pushup" => Ok(ExerciseType::PushUp),
            "bicep_curl" | "biceps_curl" | "curl" => Ok(ExerciseType::BicepCurl),
            "shoulder_press" | "overhead_press" => Ok(ExerciseType::ShoulderPress),
            "lateral_raise" | "side_raise" => Ok(ExerciseType::LateralRaise),
            "knee_raise" | "high_knee" => Ok(ExerciseType::KneeRaise),
            "finger_curl" | "finger_flexion" => Ok(ExerciseType::FingerCurl),
            _ => Err(RepError::UnknownExercise(s.to_string())),
        }
    }
}

/// Joint a detector measures
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JointType {
    Knee,
    Hip,
    Elbow,
    Shoulder,
    Finger,
}

impl JointType {
    pub fn as_str(self) -> &'static str {
        match self {
            JointType::Knee => "knee",
            JointType::Hip => "hip",
            JointType::Elbow => "elbow",
            JointType::Shoulder => "shoulder",
            JointType::Finger => "finger",
        }
    }
}

impl fmt::Display for JointType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for JointType {
    type Err = RepError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_id(s).as_str() {
            "knee" => Ok(JointType::Knee),
            "hip" => Ok(JointType::Hip),
            "elbow" => Ok(JointType::Elbow),
            "shoulder" => Ok(JointType::Shoulder),
            "finger" => Ok(JointType::Finger),
            _ => Err(RepError::UnknownJoint(s.to_string())),
        }
    }
}

fn normalize_id(s: &str) -> String {
    s.trim()
        .chars()
        .map(|c| match c {
            '-' | ' ' => '_',
            c => c.to_ascii_lowercase(),
        })
        .collect()
}
