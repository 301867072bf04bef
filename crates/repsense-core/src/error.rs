//! Error types for RepSense
//!
//! Errors only arise at construction and configuration boundaries. The
//! per-frame path reports missing or degraded input as data, never as errors.

use thiserror::Error;

use crate::ExerciseType;

/// Core RepSense errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RepError {
    #[error("Unknown exercise type: {0}")]
    UnknownExercise(String),

    #[error("Unknown joint type: {0}")]
    UnknownJoint(String),

    #[error("Invalid thresholds: {0}")]
    InvalidThresholds(String),

    #[error("Invalid cooldown config: {0}")]
    InvalidCooldown(String),

    #[error("Invalid engine config: {0}")]
    InvalidConfig(String),

    #[error("No detector registered for {0}")]
    DetectorNotRegistered(ExerciseType),
}

/// Result type for RepSense operations
pub type RepResult<T> = Result<T, RepError>;
