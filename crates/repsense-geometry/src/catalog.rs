//! Default geometry per exercise type

use repsense_core::ExerciseType;

use crate::{
    BicepCurl, ExerciseGeometry, FingerCurl, KneeRaise, LateralRaise, Lunge, PushUp, ShoulderPress,
    Squat,
};

/// Boxed geometry with the default side policy for `exercise`
pub fn geometry_for(exercise: ExerciseType) -> Box<dyn ExerciseGeometry> {
    match exercise {
        ExerciseType::Squat => Box::new(Squat::new()),
        ExerciseType::Lunge => Box::new(Lunge::new()),
        ExerciseType::PushUp => Box::new(PushUp::new()),
        ExerciseType::BicepCurl => Box::new(BicepCurl::new()),
        ExerciseType::ShoulderPress => Box::new(ShoulderPress::new()),
        ExerciseType::LateralRaise => Box::new(LateralRaise::new()),
        ExerciseType::KneeRaise => Box::new(KneeRaise::new()),
        ExerciseType::FingerCurl => Box::new(FingerCurl::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_exercise_has_geometry() {
        for exercise in ExerciseType::all() {
            let geometry = geometry_for(*exercise);
            assert_eq!(geometry.exercise(), *exercise);
            assert_eq!(geometry.joint(), exercise.joint());
            assert!(geometry.default_thresholds().validate().is_ok());
            assert!(geometry.default_cooldown().validate().is_ok());
        }
    }
}
