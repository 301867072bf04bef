//! Scripted angle scenarios
//!
//! A scenario is a keyframed joint-angle script sampled at a fixed frame
//! rate. It can be replayed as raw angle samples or end to end, through
//! synthesized landmarks and optional estimator chaos.

use std::time::Duration;

use repsense_core::{
    DetectionResult, ExercisePhase, ExerciseType, FrameTime, JointAngleSample, LandmarkFrame,
    PhaseTransition, RepResult,
};
use repsense_engine::{create_detector, DynDetector, EngineConfig};

use crate::chaos::{ChaosStats, FrameFate, PoseChaos, PoseChaosConfig};
use crate::synth::PoseSynth;

/// One sampled frame of a script
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScriptedFrame {
    pub at: FrameTime,
    pub angle: f32,
}

#[derive(Clone, Copy, Debug)]
enum Segment {
    Hold { angle: f32, duration: Duration },
    Ramp { angle: f32, duration: Duration },
}

/// Scenario builder
#[derive(Clone, Debug)]
pub struct ScenarioBuilder {
    exercise: ExerciseType,
    fps: u32,
    start: FrameTime,
    confidence: f32,
    segments: Vec<Segment>,
    engine: EngineConfig,
    chaos: Option<(PoseChaosConfig, u64)>,
}

impl ScenarioBuilder {
    pub fn new(exercise: ExerciseType) -> Self {
        ScenarioBuilder {
            exercise,
            fps: 30,
            start: FrameTime::ZERO,
            confidence: 0.95,
            segments: Vec::new(),
            engine: EngineConfig::default(),
            chaos: None,
        }
    }

    /// Frame rate, at least 1
    pub fn with_fps(mut self, fps: u32) -> Self {
        self.fps = fps.max(1);
        self
    }

    pub fn starting_at(mut self, start: FrameTime) -> Self {
        self.start = start;
        self
    }

    /// Confidence reported for every frame (landmark visibility end to end)
    pub fn with_confidence(mut self, confidence: f32) -> Self {
        self.confidence = confidence;
        self
    }

    pub fn with_engine_config(mut self, config: EngineConfig) -> Self {
        self.engine = config;
        self
    }

    pub fn with_chaos(mut self, config: PoseChaosConfig, seed: u64) -> Self {
        self.chaos = Some((config, seed));
        self
    }

    /// Jump to `angle` and stay there
    pub fn hold(mut self, angle: f32, duration: Duration) -> Self {
        self.segments.push(Segment::Hold { angle, duration });
        self
    }

    /// Move linearly from the previous angle to `angle`
    pub fn ramp_to(mut self, angle: f32, duration: Duration) -> Self {
        self.segments.push(Segment::Ramp { angle, duration });
        self
    }

    /// Hold each angle of `angles` for `each`
    pub fn sequence(self, angles: &[f32], each: Duration) -> Self {
        angles.iter().fold(self, |b, angle| b.hold(*angle, each))
    }

    /// One smooth rep from `start` to `peak` and back
    pub fn rep(self, start: f32, peak: f32, tempo: Duration, pause: Duration) -> Self {
        self.ramp_to(peak, tempo)
            .hold(peak, pause)
            .ramp_to(start, tempo)
            .hold(start, pause)
    }

    pub fn frame_interval(&self) -> Duration {
        Duration::from_micros(1_000_000 / self.fps as u64)
    }

    /// Sample the script
    pub fn frames(&self) -> Vec<ScriptedFrame> {
        let interval = self.frame_interval();
        let mut angles = Vec::new();
        let mut current: Option<f32> = None;

        for segment in &self.segments {
            match *segment {
                Segment::Hold { angle, duration } => {
                    let n = frames_in(duration, interval);
                    angles.extend(std::iter::repeat(angle).take(n));
                    current = Some(angle);
                }
                Segment::Ramp { angle, duration } => {
                    let from = current.unwrap_or(angle);
                    let n = frames_in(duration, interval);
                    angles.extend(
                        (1..=n).map(|k| from + (angle - from) * k as f32 / n as f32),
                    );
                    current = Some(angle);
                }
            }
        }

        angles
            .into_iter()
            .enumerate()
            .map(|(i, angle)| ScriptedFrame {
                at: self.start + interval * i as u32,
                angle,
            })
            .collect()
    }

    pub fn build(self) -> Scenario {
        Scenario {
            frames: self.frames(),
            exercise: self.exercise,
            confidence: self.confidence,
            engine: self.engine,
            chaos: self.chaos,
        }
    }
}

fn frames_in(duration: Duration, interval: Duration) -> usize {
    let interval = interval.as_micros().max(1);
    (duration.as_micros().div_ceil(interval) as usize).max(1)
}

/// A sampled script ready to run
#[derive(Clone, Debug)]
pub struct Scenario {
    exercise: ExerciseType,
    frames: Vec<ScriptedFrame>,
    confidence: f32,
    engine: EngineConfig,
    chaos: Option<(PoseChaosConfig, u64)>,
}

impl Scenario {
    pub fn exercise(&self) -> ExerciseType {
        self.exercise
    }

    pub fn frames(&self) -> &[ScriptedFrame] {
        &self.frames
    }

    pub fn detector(&self) -> RepResult<DynDetector> {
        create_detector(self.exercise, self.engine.clone())
    }

    /// Replay as raw angle samples, bypassing landmarks
    pub fn run_samples(&self) -> RepResult<ScenarioReport> {
        let mut detector = self.detector()?;
        let mut report = ScenarioReport::default();
        for frame in &self.frames {
            let sample = JointAngleSample::new(frame.angle, self.confidence);
            report
                .results
                .push(detector.process_sample(sample, frame.at));
        }
        report.finish(&detector);
        Ok(report)
    }

    /// Replay through synthesized landmarks and chaos
    pub fn run(&self) -> RepResult<ScenarioReport> {
        let mut detector = self.detector()?;
        let synth = PoseSynth::new(self.exercise).with_visibility(self.confidence);
        let mut chaos = self
            .chaos
            .as_ref()
            .map(|(config, seed)| PoseChaos::new(config.clone(), *seed));

        let mut report = ScenarioReport::default();
        for frame in &self.frames {
            let mut landmarks = synth.landmarks(frame.angle);
            if let Some(chaos) = chaos.as_mut() {
                if chaos.apply(&mut landmarks) == FrameFate::Dropped {
                    report.dropped_frames += 1;
                }
            }
            let result = detector.process_frame(&LandmarkFrame::new(&landmarks), frame.at);
            report.results.push(result);
        }
        report.chaos = chaos.map(|c| c.stats().clone());
        report.finish(&detector);
        Ok(report)
    }
}

/// What a scenario run produced
#[derive(Clone, Debug, Default)]
pub struct ScenarioReport {
    pub results: Vec<DetectionResult>,
    pub rep_count: u32,
    pub rep_accuracies: Vec<f32>,
    pub average_accuracy: f32,
    pub final_phase: ExercisePhase,
    pub dropped_frames: usize,
    pub chaos: Option<ChaosStats>,
}

impl ScenarioReport {
    fn finish(&mut self, detector: &DynDetector) {
        self.rep_count = detector.rep_count();
        self.rep_accuracies = detector.rep_accuracies().to_vec();
        self.average_accuracy = detector.average_accuracy();
        self.final_phase = detector.current_phase();
    }

    /// Phases in the order visited, consecutive repeats collapsed
    pub fn phases(&self) -> Vec<ExercisePhase> {
        let mut phases: Vec<ExercisePhase> = Vec::new();
        for result in &self.results {
            if phases.last() != Some(&result.phase) {
                phases.push(result.phase);
            }
        }
        phases
    }

    pub fn visited(&self, phase: ExercisePhase) -> bool {
        self.results.iter().any(|r| r.phase == phase)
    }

    pub fn transitions(&self) -> Vec<PhaseTransition> {
        self.results.iter().filter_map(|r| r.transition).collect()
    }

    pub fn completed(&self) -> impl Iterator<Item = &DetectionResult> {
        self.results.iter().filter(|r| r.rep_completed)
    }
}
