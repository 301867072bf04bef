//! Per-exercise rep detector

use std::time::Duration;

use tracing::{debug, info, trace};

use repsense_core::{
    CalibrationResult, CooldownConfig, DetectionResult, ExercisePhase, ExerciseType, FrameTime,
    JointAngleSample, LandmarkFrame, RepResult, ThresholdResult,
};
use repsense_geometry::{AngleSmoother, ExerciseGeometry};

use crate::{
    adaptive_cooldown, compose_feedback, no_pose_feedback, score_rep, EngineConfig, PhaseMachine,
    RepScore, StepContext,
};

/// Rep detector driven by an exercise geometry
///
/// Single-owner: one `process_frame` call per tick, time supplied by the
/// caller. Thresholds and cooldown survive [`reset`](Self::reset); only
/// [`apply_calibration`](Self::apply_calibration) replaces thresholds.
#[derive(Debug)]
pub struct RepDetector<G> {
    geometry: G,
    config: EngineConfig,
    thresholds: ThresholdResult,
    cooldown: CooldownConfig,
    smoother: AngleSmoother,
    machine: PhaseMachine,
    rep_accuracies: Vec<f32>,
    last_score: Option<RepScore>,
    calibrated: bool,
}

/// Detector over a boxed geometry, as produced by the registry
pub type DynDetector = RepDetector<Box<dyn ExerciseGeometry>>;

impl<G: ExerciseGeometry> RepDetector<G> {
    /// Detector with the geometry's default thresholds and cooldown
    pub fn new(geometry: G) -> Self {
        let config = EngineConfig::default();
        let thresholds = geometry.default_thresholds();
        let cooldown = geometry.default_cooldown();
        Self::from_parts(geometry, config, thresholds, cooldown)
    }

    /// Detector with explicit tuning and cooldown
    pub fn with_config(geometry: G, config: EngineConfig, cooldown: CooldownConfig) -> RepResult<Self> {
        config.validate()?;
        cooldown.validate()?;
        let thresholds = geometry.default_thresholds();
        Ok(Self::from_parts(geometry, config, thresholds, cooldown))
    }

    fn from_parts(
        geometry: G,
        config: EngineConfig,
        thresholds: ThresholdResult,
        cooldown: CooldownConfig,
    ) -> Self {
        Self {
            smoother: AngleSmoother::new(config.smoothing_window),
            machine: PhaseMachine::new(config.debounce_frames),
            geometry,
            config,
            thresholds,
            cooldown,
            rep_accuracies: Vec::new(),
            last_score: None,
            calibrated: false,
        }
    }

    pub fn exercise(&self) -> ExerciseType {
        self.geometry.exercise()
    }

    pub fn geometry(&self) -> &G {
        &self.geometry
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn thresholds(&self) -> &ThresholdResult {
        &self.thresholds
    }

    pub fn cooldown_config(&self) -> &CooldownConfig {
        &self.cooldown
    }

    pub fn current_phase(&self) -> ExercisePhase {
        self.machine.phase()
    }

    pub fn rep_count(&self) -> u32 {
        self.machine.rep_count()
    }

    /// Accuracy of each counted rep, in order
    pub fn rep_accuracies(&self) -> &[f32] {
        &self.rep_accuracies
    }

    /// Mean accuracy of counted reps, 0 when there are none
    pub fn average_accuracy(&self) -> f32 {
        if self.rep_accuracies.is_empty() {
            return 0.0;
        }
        let sum: f64 = self.rep_accuracies.iter().map(|a| *a as f64).sum();
        (sum / self.rep_accuracies.len() as f64) as f32
    }

    /// Most recently scored rep, counted or not
    pub fn last_score(&self) -> Option<&RepScore> {
        self.last_score.as_ref()
    }

    pub fn has_calibration_applied(&self) -> bool {
        self.calibrated
    }

    /// Cooldown that follows the last counted rep
    pub fn calculate_adaptive_cooldown(&self) -> Duration {
        adaptive_cooldown(&self.cooldown, self.machine.last_rep_duration())
    }

    /// Process one frame of landmarks
    pub fn process_frame(&mut self, frame: &LandmarkFrame<'_>, now: FrameTime) -> DetectionResult {
        match self.geometry.measure(frame, self.config.min_visibility) {
            Some(sample) => self.process_sample(sample, now),
            None => {
                trace!(exercise = %self.exercise(), landmarks = frame.len(), "pose not measurable, frame skipped");
                self.missing_pose(now)
            }
        }
    }

    /// Process one raw joint-angle measurement
    pub fn process_sample(&mut self, sample: JointAngleSample, now: FrameTime) -> DetectionResult {
        if !sample.angle.is_finite() {
            return self.missing_pose(now);
        }

        let smoothed = self.smoother.push(sample);
        let angle = smoothed.angle;

        let ctx = StepContext {
            geometry: &self.geometry,
            thresholds: &self.thresholds,
            cooldown: &self.cooldown,
            config: &self.config,
        };
        let step = self.machine.step(angle, now, &ctx);

        if let Some(t) = &step.transition {
            debug!(
                exercise = %self.exercise(),
                from = %t.from,
                to = %t.to,
                reason = %t.reason,
                angle,
                at = ?now,
                "phase transition"
            );
        }

        let mut rep_completed = false;
        if let Some(outcome) = step.outcome {
            let score = score_rep(outcome.peak_angle, &self.thresholds);
            self.last_score = Some(score);
            if outcome.counted {
                rep_completed = true;
                self.rep_accuracies.push(score.accuracy);
                info!(
                    exercise = %self.exercise(),
                    rep = self.rep_count(),
                    accuracy = score.accuracy,
                    peak = outcome.peak_angle,
                    duration_ms = outcome.duration.as_millis() as u64,
                    "rep completed"
                );
            } else {
                debug!(
                    exercise = %self.exercise(),
                    accuracy = score.accuracy,
                    peak = outcome.peak_angle,
                    "rep abandoned before target"
                );
            }
        }

        let phase = self.machine.phase();
        let progress = self.geometry.progress(angle, &self.thresholds);
        let low_confidence = smoothed.confidence < self.config.low_confidence;

        DetectionResult {
            phase,
            rep_completed,
            rep_count: self.rep_count(),
            current_angle: Some(angle),
            target_angle: self.thresholds.target_angle,
            progress,
            accuracy: self.last_accuracy(),
            confidence: smoothed.confidence,
            feedback: compose_feedback(
                self.exercise(),
                phase,
                progress,
                step.transition.as_ref(),
                low_confidence,
            ),
            hold_progress: self.machine.hold_progress(now, &self.thresholds),
            transition: step.transition,
        }
    }

    /// Return to Idle with no reps, keeping thresholds, cooldown and calibration
    pub fn reset(&mut self) {
        debug!(exercise = %self.exercise(), reps = self.rep_count(), "detector reset");
        self.smoother.reset();
        self.machine = PhaseMachine::new(self.config.debounce_frames);
        self.rep_accuracies.clear();
        self.last_score = None;
    }

    /// Replace thresholds with calibrated ones
    ///
    /// The calibrated hold time wins over the one in the thresholds. Phase,
    /// count and accuracies are untouched. Callers validate beforehand with
    /// [`CalibrationResult::validate`].
    pub fn apply_calibration(&mut self, calibration: &CalibrationResult) {
        self.thresholds = calibration.effective_thresholds();
        self.calibrated = true;
        debug!(
            exercise = %self.exercise(),
            start = self.thresholds.start_angle.center,
            target = self.thresholds.target_angle,
            hold_secs = self.thresholds.completion.hold_time_secs,
            "calibration applied"
        );
    }

    fn last_accuracy(&self) -> f32 {
        self.last_score.map_or(0.0, |score| score.accuracy)
    }

    fn missing_pose(&self, now: FrameTime) -> DetectionResult {
        DetectionResult {
            phase: self.machine.phase(),
            rep_completed: false,
            rep_count: self.rep_count(),
            current_angle: None,
            target_angle: self.thresholds.target_angle,
            progress: 0.0,
            accuracy: self.last_accuracy(),
            confidence: 0.0,
            feedback: no_pose_feedback(self.exercise()),
            hold_progress: self.machine.hold_progress(now, &self.thresholds),
            transition: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use repsense_core::{CalibrationSettings, Landmark, ThresholdProfile};
    use repsense_geometry::{geometry_for, Squat};

    const FRAME: Duration = Duration::from_millis(33);

    struct Run<G> {
        detector: RepDetector<G>,
        now: FrameTime,
        results: Vec<DetectionResult>,
    }

    impl<G: ExerciseGeometry> Run<G> {
        fn new(detector: RepDetector<G>) -> Self {
            Self {
                detector,
                now: FrameTime::ZERO,
                results: Vec::new(),
            }
        }

        fn hold(&mut self, angle: f32, frames: usize) -> &mut Self {
            for _ in 0..frames {
                self.now = self.now + FRAME;
                let result = self
                    .detector
                    .process_sample(JointAngleSample::new(angle, 0.9), self.now);
                self.results.push(result);
            }
            self
        }

        fn hold_for(&mut self, angle: f32, duration: Duration) -> &mut Self {
            let frames = (duration.as_millis() / FRAME.as_millis()) as usize + 1;
            self.hold(angle, frames)
        }

        fn phases(&self) -> Vec<ExercisePhase> {
            let mut seen: Vec<ExercisePhase> = Vec::new();
            for r in &self.results {
                if seen.last() != Some(&r.phase) {
                    seen.push(r.phase);
                }
            }
            seen
        }
    }

    /// start 160, target 100, completion tolerance 30, return tolerance 25, hold 0.5 s
    fn squat() -> RepDetector<Squat> {
        RepDetector::new(Squat::new())
    }

    #[test]
    fn test_full_squat_rep() {
        let mut run = Run::new(squat());
        for angle in [160.0, 150.0, 130.0, 110.0] {
            run.hold(angle, 10);
        }
        run.hold(95.0, 10).hold_for(95.0, Duration::from_millis(500));
        for angle in [140.0, 150.0, 160.0] {
            run.hold(angle, 10);
        }

        assert_eq!(run.detector.rep_count(), 1);
        let completed: Vec<_> = run.results.iter().filter(|r| r.rep_completed).collect();
        assert_eq!(completed.len(), 1);
        assert!(completed[0].accuracy >= 60.0);
        assert!(completed[0].transition.unwrap().completes_rep());
        assert!(run
            .results
            .iter()
            .any(|r| r.current_angle == Some(95.0) && r.progress == 1.0));
        assert_eq!(
            run.phases(),
            vec![
                ExercisePhase::Idle,
                ExercisePhase::Ready,
                ExercisePhase::Moving,
                ExercisePhase::Holding,
                ExercisePhase::Returning,
                ExercisePhase::Cooldown,
                ExercisePhase::Ready,
            ]
        );
        assert_eq!(run.detector.average_accuracy(), completed[0].accuracy);
    }

    #[test]
    fn test_reversal_before_target_is_not_counted() {
        let mut run = Run::new(squat());
        for angle in [160.0, 150.0, 135.0, 150.0, 160.0] {
            run.hold(angle, 10);
        }

        assert_eq!(run.detector.rep_count(), 0);
        assert!(run.detector.rep_accuracies().is_empty());
        let phases = run.phases();
        assert!(phases.contains(&ExercisePhase::Returning));
        assert!(!phases.contains(&ExercisePhase::Holding));
        assert!(!phases.contains(&ExercisePhase::Cooldown));
        assert_eq!(run.detector.current_phase(), ExercisePhase::Ready);
        // Abandoned rep is still scored
        assert!(run.detector.last_score().is_some());
        assert!(run.results.iter().all(|r| !r.rep_completed));
    }

    #[test]
    fn test_missing_landmarks_freeze_phase() {
        let mut run = Run::new(squat());
        run.hold(160.0, 5).hold(150.0, 8);
        let phase = run.detector.current_phase();
        assert_eq!(phase, ExercisePhase::Moving);

        let short = vec![Landmark::new(0.5, 0.5, 0.0); 10];
        for i in 0..20 {
            let now = run.now + FRAME * (i + 1);
            let result = run.detector.process_frame(&LandmarkFrame::new(&short), now);
            assert_eq!(result.confidence, 0.0);
            assert_eq!(result.current_angle, None);
            assert_eq!(result.phase, phase);
            assert!(result.feedback.starts_with(crate::NO_POSE));
        }
        assert_eq!(run.detector.current_phase(), phase);
    }

    #[test]
    fn test_low_confidence_does_not_block() {
        let mut detector = squat();
        let mut now = FrameTime::ZERO;
        let mut last = None;
        for _ in 0..5 {
            now = now + FRAME;
            last = Some(detector.process_sample(JointAngleSample::new(160.0, 0.3), now));
        }
        let last = last.unwrap();
        assert_eq!(last.phase, ExercisePhase::Ready);
        assert!(last.feedback.ends_with(crate::REPOSITION_HINT));
    }

    #[test]
    fn test_hold_progress_only_while_holding() {
        let mut run = Run::new(squat());
        run.hold(160.0, 10).hold(150.0, 10).hold(120.0, 10);
        for r in &run.results {
            assert_eq!(r.hold_progress.is_some(), r.phase == ExercisePhase::Holding);
            if let Some(p) = r.hold_progress {
                assert!((0.0..=1.0).contains(&p));
            }
        }
        assert_eq!(run.detector.current_phase(), ExercisePhase::Holding);
    }

    #[test]
    fn test_reset_is_idempotent() {
        let mut run = Run::new(squat());
        for angle in [160.0, 150.0, 110.0, 95.0, 95.0, 95.0, 160.0] {
            run.hold(angle, 10);
        }
        assert_eq!(run.detector.rep_count(), 1);
        let thresholds = *run.detector.thresholds();

        run.detector.reset();
        run.detector.reset();
        assert_eq!(run.detector.current_phase(), ExercisePhase::Idle);
        assert_eq!(run.detector.rep_count(), 0);
        assert!(run.detector.rep_accuracies().is_empty());
        assert_eq!(run.detector.average_accuracy(), 0.0);
        assert_eq!(*run.detector.thresholds(), thresholds);
        assert_eq!(
            run.detector.calculate_adaptive_cooldown(),
            run.detector.cooldown_config().min_cooldown
        );
    }

    #[test]
    fn test_calibration_keeps_counters() {
        let mut run = Run::new(squat());
        run.hold(160.0, 10).hold(150.0, 10);
        let phase = run.detector.current_phase();

        let calibration = CalibrationResult {
            thresholds: ThresholdProfile {
                start_center: 170.0,
                start_tolerance: 10.0,
                target: 80.0,
                completion_tolerance: 20.0,
                return_tolerance: 30.0,
                hold_time_secs: 0.5,
            }
            .build(run.now),
            settings: CalibrationSettings { hold_time_secs: 1.25 },
        };
        assert!(calibration.validate().is_ok());
        assert!(!run.detector.has_calibration_applied());

        run.detector.apply_calibration(&calibration);
        run.detector.apply_calibration(&calibration);
        assert!(run.detector.has_calibration_applied());
        assert_eq!(run.detector.current_phase(), phase);
        assert_eq!(run.detector.rep_count(), 0);
        assert_eq!(run.detector.thresholds().completion.hold_time_secs, 1.25);
        assert_eq!(run.detector.thresholds().target_angle, 80.0);

        run.detector.reset();
        assert!(run.detector.has_calibration_applied());
        assert_eq!(run.detector.thresholds().target_angle, 80.0);
    }

    #[test]
    fn test_calibration_from_json() {
        let payload = r#"{
            "thresholds": {
                "start_angle": {"center": 165.0, "min": 150.0, "max": 180.0},
                "target_angle": 90.0,
                "completion": {"angle": 115.0, "hold_time_secs": 0.2},
                "return_threshold": {"angle": 140.0},
                "total_rom": 75.0,
                "calculated_at": 1200
            },
            "settings": {"hold_time_secs": 0.8}
        }"#;
        let calibration: CalibrationResult = serde_json::from_str(payload).unwrap();
        calibration.validate().unwrap();

        let mut detector = RepDetector::new(geometry_for(ExerciseType::Lunge));
        detector.apply_calibration(&calibration);
        assert_eq!(detector.thresholds().completion.hold_time_secs, 0.8);
        assert_eq!(detector.thresholds().calculated_at, FrameTime::from_millis(1200));
    }

    #[test]
    fn test_rejects_invalid_config() {
        let config = EngineConfig {
            smoothing_window: 0,
            ..EngineConfig::default()
        };
        let cooldown = Squat::new().default_cooldown();
        assert!(RepDetector::with_config(Squat::new(), config, cooldown).is_err());
    }

    proptest! {
        #[test]
        fn rep_count_never_decreases(
            angles in prop::collection::vec(60.0f32..180.0, 1..400),
            gaps in prop::collection::vec(1u64..200, 1..400),
        ) {
            let mut detector = squat();
            let mut now = FrameTime::ZERO;
            let mut last = 0;
            for (i, angle) in angles.iter().enumerate() {
                now = now + Duration::from_millis(gaps[i % gaps.len()]);
                let result = detector.process_sample(JointAngleSample::new(*angle, 0.9), now);
                prop_assert!(result.rep_count >= last);
                prop_assert!((0.0..=100.0).contains(&result.accuracy));
                prop_assert!((0.0..=1.0).contains(&result.progress));
                last = result.rep_count;
            }
            prop_assert_eq!(detector.rep_accuracies().len() as u32, detector.rep_count());
        }
    }
}
