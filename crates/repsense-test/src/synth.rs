//! Synthetic landmark frames
//!
//! Builds a full pose or hand frame in which the driving joint of an exercise
//! sits at a chosen angle on every measured side. Chains are laid out in the
//! image plane with zero depth, so projected, spatial and blended
//! measurements all agree.

use repsense_core::{hand, pose, ExerciseType, Landmark};
use repsense_geometry::{
    Finger, JointAnchors, LEFT_ELBOW, LEFT_HIP, LEFT_KNEE, LEFT_SHOULDER, RIGHT_ELBOW, RIGHT_HIP,
    RIGHT_KNEE, RIGHT_SHOULDER,
};

const BONE: f32 = 0.15;
const LEFT_X: f32 = 0.35;
const RIGHT_X: f32 = 0.65;
const JOINT_Y: f32 = 0.5;

/// Landmark frame generator for one exercise
#[derive(Clone, Debug)]
pub struct PoseSynth {
    exercise: ExerciseType,
    visibility: f32,
}

impl PoseSynth {
    pub fn new(exercise: ExerciseType) -> Self {
        Self {
            exercise,
            visibility: 0.95,
        }
    }

    pub fn with_visibility(mut self, visibility: f32) -> Self {
        self.visibility = visibility;
        self
    }

    pub fn exercise(&self) -> ExerciseType {
        self.exercise
    }

    /// Landmark count of the topology this exercise uses
    pub fn landmark_count(&self) -> usize {
        if self.exercise.uses_hand_landmarks() {
            hand::LANDMARK_COUNT
        } else {
            pose::LANDMARK_COUNT
        }
    }

    /// Frame with the driving joint at `angle` degrees
    pub fn landmarks(&self, angle: f32) -> Vec<Landmark> {
        let angle = angle.clamp(0.0, 180.0);
        let mut lms = vec![
            Landmark::new(0.5, 0.5, 0.0).with_visibility(self.visibility);
            self.landmark_count()
        ];
        for (anchors, x, outward) in self.chains() {
            self.place(&mut lms, anchors, x, outward, angle);
        }
        lms
    }

    /// Measured chains: anchors, joint x position, outward swing direction
    fn chains(&self) -> Vec<(JointAnchors, f32, f32)> {
        let bilateral = |left: JointAnchors, right: JointAnchors| {
            vec![(left, LEFT_X, -1.0), (right, RIGHT_X, 1.0)]
        };
        match self.exercise {
            ExerciseType::Squat | ExerciseType::Lunge => bilateral(LEFT_KNEE, RIGHT_KNEE),
            ExerciseType::KneeRaise => bilateral(LEFT_HIP, RIGHT_HIP),
            ExerciseType::PushUp | ExerciseType::BicepCurl | ExerciseType::ShoulderPress => {
                bilateral(LEFT_ELBOW, RIGHT_ELBOW)
            }
            ExerciseType::LateralRaise => bilateral(LEFT_SHOULDER, RIGHT_SHOULDER),
            ExerciseType::FingerCurl => vec![(Finger::Index.anchors(), 0.5, 1.0)],
        }
    }

    fn place(&self, lms: &mut [Landmark], anchors: JointAnchors, x: f32, outward: f32, angle: f32) {
        let (s, c) = angle.to_radians().sin_cos();
        let v = self.visibility;
        lms[anchors.joint] = Landmark::new(x, JOINT_Y, 0.0).with_visibility(v);
        lms[anchors.proximal] = Landmark::new(x, JOINT_Y - BONE, 0.0).with_visibility(v);
        lms[anchors.distal] =
            Landmark::new(x + outward * BONE * s, JOINT_Y - BONE * c, 0.0).with_visibility(v);
    }
}
