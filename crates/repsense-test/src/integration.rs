//! End-to-end scenarios
//!
//! Reference scripts that drive a detector from synthesized landmarks:
//! - A full squat with a held bottom position
//! - A squat abandoned before the completion line
//! - Smooth reps for any exercise at its default thresholds

use std::time::Duration;

use repsense_core::ExerciseType;
use repsense_geometry::{geometry_for, ExerciseGeometry};

use crate::scenario::ScenarioBuilder;

/// Frames per keyframe in the reference squat scripts (about 330 ms at 30 fps)
pub const KEYFRAME: Duration = Duration::from_millis(330);

/// Squat down to 95 degrees, hold half a second, stand back up
pub fn squat_reference_rep() -> ScenarioBuilder {
    ScenarioBuilder::new(ExerciseType::Squat)
        .sequence(&[160.0, 150.0, 130.0, 110.0, 95.0], KEYFRAME)
        .hold(95.0, Duration::from_millis(500))
        .sequence(&[140.0, 150.0, 160.0], KEYFRAME)
}

/// Squat that turns back at 135 degrees, short of the 130 degree completion line
pub fn squat_aborted_rep() -> ScenarioBuilder {
    ScenarioBuilder::new(ExerciseType::Squat).sequence(&[160.0, 150.0, 135.0, 150.0, 160.0], KEYFRAME)
}

/// `count` smooth reps from the start center to the target, using the
/// exercise's default thresholds
pub fn smooth_reps(exercise: ExerciseType, count: usize) -> ScenarioBuilder {
    let thresholds = geometry_for(exercise).default_thresholds();
    let start = thresholds.start_angle.center;
    let peak = thresholds.target_angle;
    let pause = Duration::from_secs_f32(thresholds.completion.hold_time_secs.max(0.0))
        + Duration::from_millis(700);

    (0..count).fold(
        ScenarioBuilder::new(exercise).hold(start, Duration::from_millis(500)),
        |builder, _| builder.rep(start, peak, Duration::from_millis(900), pause),
    )
}
