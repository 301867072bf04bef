//! Exercise phases and phase transitions
//!
//! A detector is always in exactly one phase. A rep is one full cycle:
//! Idle/Ready → Moving → Holding → Returning → Cooldown.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::FrameTime;

/// Phase of the rep cycle
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExercisePhase {
    /// No start posture detected
    #[default]
    Idle,
    /// Holding the start posture
    Ready,
    /// Travelling from start toward target
    Moving,
    /// At target, hold timer running
    Holding,
    /// Travelling back toward start
    Returning,
    /// Rep counted, waiting out the adaptive cooldown
    Cooldown,
}

impl ExercisePhase {
    pub fn as_str(self) -> &'static str {
        match self {
            ExercisePhase::Idle => "IDLE",
            ExercisePhase::Ready => "READY",
            ExercisePhase::Moving => "MOVING",
            ExercisePhase::Holding => "HOLDING",
            ExercisePhase::Returning => "RETURNING",
            ExercisePhase::Cooldown => "COOLDOWN",
        }
    }

    /// Inside an active rep
    pub fn is_in_rep(self) -> bool {
        matches!(
            self,
            ExercisePhase::Moving | ExercisePhase::Holding | ExercisePhase::Returning
        )
    }
}

impl fmt::Display for ExercisePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a transition fired
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionReason {
    EnteredStartPosition,
    MovementStarted,
    LeftStartPosition,
    TargetReached,
    /// Direction reversed before the target was reached
    MovementReversed,
    HoldCompleted,
    HoldAbandoned,
    RepCompleted,
    /// An aborted rep made it back to the start posture
    ReturnedWithoutCompletion,
    CooldownElapsed,
}

impl TransitionReason {
    pub fn description(self) -> &'static str {
        match self {
            TransitionReason::EnteredStartPosition => "entered start position",
            TransitionReason::MovementStarted => "movement started toward target",
            TransitionReason::LeftStartPosition => "left start position without moving",
            TransitionReason::TargetReached => "completion threshold crossed",
            TransitionReason::MovementReversed => "movement reversed before target",
            TransitionReason::HoldCompleted => "hold duration reached",
            TransitionReason::HoldAbandoned => "left target before hold completed",
            TransitionReason::RepCompleted => "returned to start, rep counted",
            TransitionReason::ReturnedWithoutCompletion => "returned to start, rep not counted",
            TransitionReason::CooldownElapsed => "cooldown elapsed",
        }
    }
}

impl fmt::Display for TransitionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

/// A committed phase change
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PhaseTransition {
    pub from: ExercisePhase,
    pub to: ExercisePhase,
    pub reason: TransitionReason,
    pub timestamp: FrameTime,
}

impl PhaseTransition {
    pub fn new(
        from: ExercisePhase,
        to: ExercisePhase,
        reason: TransitionReason,
        timestamp: FrameTime,
    ) -> Self {
        Self {
            from,
            to,
            reason,
            timestamp,
        }
    }

    /// The transition that counts a rep
    pub fn completes_rep(&self) -> bool {
        self.to == ExercisePhase::Cooldown
    }
}
