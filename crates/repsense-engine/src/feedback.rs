//! Coaching feedback text

use repsense_core::{ExercisePhase, ExerciseType, PhaseTransition, TransitionReason};

pub const NO_POSE: &str = "Cannot detect pose";
pub const REPOSITION_HINT: &str = "Move so your whole body is in view";
const HAND_REPOSITION_HINT: &str = "Hold your hand up to the camera";
const KEEP_GOING: &str = "Keep going";
const ALMOST_THERE: &str = "Almost there";

/// Per-exercise coaching cues
#[derive(Debug)]
pub struct CueTable {
    /// Idle: get into the start posture
    pub setup: &'static str,
    /// Ready: start the rep
    pub begin: &'static str,
    /// Moving, once the target is reached
    pub at_target: &'static str,
    pub hold: &'static str,
    pub return_to_start: &'static str,
    pub rep_done: &'static str,
    /// Rep abandoned before the target
    pub short_rep: &'static str,
}

static SQUAT: CueTable = CueTable {
    setup: "Stand tall, feet shoulder-width apart",
    begin: "Squat down",
    at_target: "Good depth",
    hold: "Hold at the bottom",
    return_to_start: "Drive back up",
    rep_done: "Rep complete",
    short_rep: "Squat deeper next time",
};

static LUNGE: CueTable = CueTable {
    setup: "Stand tall with feet together",
    begin: "Step forward and lower",
    at_target: "Good lunge depth",
    hold: "Hold, front knee over ankle",
    return_to_start: "Push back to standing",
    rep_done: "Rep complete",
    short_rep: "Lower the back knee further",
};

static PUSH_UP: CueTable = CueTable {
    setup: "Get into a high plank, arms straight",
    begin: "Lower your chest",
    at_target: "Good depth",
    hold: "Hold at the bottom",
    return_to_start: "Push back up",
    rep_done: "Rep complete",
    short_rep: "Lower your chest further",
};

static BICEP_CURL: CueTable = CueTable {
    setup: "Arms down, elbows at your sides",
    begin: "Curl up",
    at_target: "Full curl",
    hold: "Squeeze at the top",
    return_to_start: "Lower slowly",
    rep_done: "Rep complete",
    short_rep: "Curl all the way up",
};

static SHOULDER_PRESS: CueTable = CueTable {
    setup: "Hands at shoulder height",
    begin: "Press overhead",
    at_target: "Arms locked out",
    hold: "Hold overhead",
    return_to_start: "Lower to shoulders",
    rep_done: "Rep complete",
    short_rep: "Press all the way up",
};

static LATERAL_RAISE: CueTable = CueTable {
    setup: "Arms relaxed at your sides",
    begin: "Raise your arms out",
    at_target: "Shoulder height",
    hold: "Hold at shoulder height",
    return_to_start: "Lower with control",
    rep_done: "Rep complete",
    short_rep: "Raise to shoulder height",
};

static KNEE_RAISE: CueTable = CueTable {
    setup: "Stand tall",
    begin: "Lift your knee",
    at_target: "Knee at hip height",
    hold: "Hold the knee up",
    return_to_start: "Lower your leg",
    rep_done: "Rep complete",
    short_rep: "Lift the knee higher",
};

static FINGER_CURL: CueTable = CueTable {
    setup: "Open your hand, fingers straight",
    begin: "Curl your finger",
    at_target: "Full curl",
    hold: "Hold the curl",
    return_to_start: "Straighten your finger",
    rep_done: "Rep complete",
    short_rep: "Curl the finger further",
};

pub fn cues(exercise: ExerciseType) -> &'static CueTable {
    match exercise {
        ExerciseType::Squat => &SQUAT,
        ExerciseType::Lunge => &LUNGE,
        ExerciseType::PushUp => &PUSH_UP,
        ExerciseType::BicepCurl => &BICEP_CURL,
        ExerciseType::ShoulderPress => &SHOULDER_PRESS,
        ExerciseType::LateralRaise => &LATERAL_RAISE,
        ExerciseType::KneeRaise => &KNEE_RAISE,
        ExerciseType::FingerCurl => &FINGER_CURL,
    }
}

pub fn reposition_hint(exercise: ExerciseType) -> &'static str {
    if exercise.uses_hand_landmarks() {
        HAND_REPOSITION_HINT
    } else {
        REPOSITION_HINT
    }
}

/// Feedback for a measured frame
pub fn phase_feedback(
    exercise: ExerciseType,
    phase: ExercisePhase,
    progress: f32,
    transition: Option<&PhaseTransition>,
) -> &'static str {
    let cues = cues(exercise);
    if let Some(t) = transition {
        match t.reason {
            TransitionReason::RepCompleted => return cues.rep_done,
            TransitionReason::ReturnedWithoutCompletion | TransitionReason::MovementReversed => {
                return cues.short_rep
            }
            _ => {}
        }
    }

    match phase {
        ExercisePhase::Idle => cues.setup,
        ExercisePhase::Ready => cues.begin,
        ExercisePhase::Moving if progress >= 1.0 => cues.at_target,
        ExercisePhase::Moving if progress >= 0.5 => ALMOST_THERE,
        ExercisePhase::Moving => KEEP_GOING,
        ExercisePhase::Holding => cues.hold,
        ExercisePhase::Returning => cues.return_to_start,
        ExercisePhase::Cooldown => cues.rep_done,
    }
}

/// Full feedback line, with a reposition hint when confidence is low
pub fn compose_feedback(
    exercise: ExerciseType,
    phase: ExercisePhase,
    progress: f32,
    transition: Option<&PhaseTransition>,
    low_confidence: bool,
) -> String {
    let base = phase_feedback(exercise, phase, progress, transition);
    if low_confidence {
        format!("{base}. {}", reposition_hint(exercise))
    } else {
        base.to_string()
    }
}

/// Feedback when the pose could not be measured
pub fn no_pose_feedback(exercise: ExerciseType) -> String {
    format!("{NO_POSE}. {}", reposition_hint(exercise))
}
