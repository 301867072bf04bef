//! Rep phase state machine
//!
//! ```text
//!   Idle ──▶ Ready ──▶ Moving ──▶ Holding ──▶ Returning ──▶ Cooldown
//!    ▲         │  ▲       │ ▲         │           │             │
//!    └─────────┘  │       │ └─────────┘           │             │
//!                 │       └─(reversed)──▶ Returning (aborted)   │
//!                 └──────────────────────────────┴──────────────┘
//! ```
//!
//! Every transition except Returning to Cooldown is debounced. The machine
//! works on smoothed angles and caller-supplied time; it never reads a clock.

use std::time::Duration;

use repsense_core::{
    CooldownConfig, ExercisePhase, FrameTime, PhaseTransition, ThresholdResult, TransitionReason,
};
use repsense_geometry::ExerciseGeometry;

use crate::{adaptive_cooldown, Debouncer, EngineConfig};

/// Everything a step reads but does not own
pub struct StepContext<'a, G: ?Sized> {
    pub geometry: &'a G,
    pub thresholds: &'a ThresholdResult,
    pub cooldown: &'a CooldownConfig,
    pub config: &'a EngineConfig,
}

/// A rep that left the machine on this frame
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RepOutcome {
    /// Most target-ward angle reached
    pub peak_angle: f32,
    pub duration: Duration,
    /// False for a rep abandoned before the target
    pub counted: bool,
}

/// Result of one step
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Step {
    pub transition: Option<PhaseTransition>,
    pub outcome: Option<RepOutcome>,
}

/// Mutable rep-tracking state
#[derive(Clone, Debug)]
pub struct PhaseMachine {
    phase: ExercisePhase,
    debouncer: Debouncer,
    rep_count: u32,
    previous_angle: Option<f32>,
    velocity: f32,
    rep_started_at: Option<FrameTime>,
    hold_started_at: Option<FrameTime>,
    peak_angle: Option<f32>,
    aborted: bool,
    last_rep_completed_at: Option<FrameTime>,
    last_rep_duration: Option<Duration>,
}

impl PhaseMachine {
    pub fn new(debounce_frames: u32) -> Self {
        Self {
            phase: ExercisePhase::Idle,
            debouncer: Debouncer::new(debounce_frames),
            rep_count: 0,
            previous_angle: None,
            velocity: 0.0,
            rep_started_at: None,
            hold_started_at: None,
            peak_angle: None,
            aborted: false,
            last_rep_completed_at: None,
            last_rep_duration: None,
        }
    }

    pub fn phase(&self) -> ExercisePhase {
        self.phase
    }

    pub fn rep_count(&self) -> u32 {
        self.rep_count
    }

    /// Per-frame angle change of the last step
    pub fn velocity(&self) -> f32 {
        self.velocity
    }

    pub fn peak_angle(&self) -> Option<f32> {
        self.peak_angle
    }

    pub fn last_rep_duration(&self) -> Option<Duration> {
        self.last_rep_duration
    }

    pub fn last_rep_completed_at(&self) -> Option<FrameTime> {
        self.last_rep_completed_at
    }

    /// Fraction of the required hold completed, only while holding
    pub fn hold_progress(&self, now: FrameTime, thresholds: &ThresholdResult) -> Option<f32> {
        if self.phase != ExercisePhase::Holding {
            return None;
        }
        let required = thresholds.hold_time();
        if required.is_zero() {
            return Some(1.0);
        }
        let elapsed = self
            .hold_started_at
            .map(|start| now.duration_since(start))
            .unwrap_or_default();
        Some((elapsed.as_secs_f64() / required.as_secs_f64()).clamp(0.0, 1.0) as f32)
    }

    /// Advance on one smoothed angle
    pub fn step<G: ExerciseGeometry + ?Sized>(
        &mut self,
        angle: f32,
        now: FrameTime,
        ctx: &StepContext<'_, G>,
    ) -> Step {
        let t = ctx.thresholds;
        self.velocity = self.previous_angle.map(|prev| angle - prev).unwrap_or(0.0);
        self.previous_angle = Some(angle);

        if self.phase.is_in_rep() {
            let beyond_peak = self
                .peak_angle
                .map_or(true, |peak| t.toward_target(angle) > t.toward_target(peak));
            if beyond_peak {
                self.peak_angle = Some(angle);
            }
        }

        let candidate = self.candidate(angle, now, ctx);

        let committed = match candidate {
            Some((ExercisePhase::Cooldown, reason)) => {
                self.debouncer.reset();
                Some((ExercisePhase::Cooldown, reason))
            }
            Some((phase, reason)) => self
                .debouncer
                .observe(Some(phase))
                .map(|phase| (phase, reason)),
            None => {
                self.debouncer.observe(None);
                None
            }
        };

        match committed {
            Some((to, reason)) => self.commit(to, reason, angle, now),
            None => Step::default(),
        }
    }

    fn candidate<G: ExerciseGeometry + ?Sized>(
        &self,
        angle: f32,
        now: FrameTime,
        ctx: &StepContext<'_, G>,
    ) -> Option<(ExercisePhase, TransitionReason)> {
        let t = ctx.thresholds;
        let g = ctx.geometry;
        let toward = t.toward_target(angle);

        match self.phase {
            ExercisePhase::Idle => g
                .is_in_start_position(angle, t)
                .then_some((ExercisePhase::Ready, TransitionReason::EnteredStartPosition)),

            ExercisePhase::Ready => {
                let in_start = g.is_in_start_position(angle, t);
                if toward >= ctx.config.min_movement_deg || (!in_start && toward > 0.0) {
                    Some((ExercisePhase::Moving, TransitionReason::MovementStarted))
                } else if !in_start {
                    Some((ExercisePhase::Idle, TransitionReason::LeftStartPosition))
                } else {
                    None
                }
            }

            ExercisePhase::Moving => {
                if g.has_reached_target(angle, t) {
                    return Some((ExercisePhase::Holding, TransitionReason::TargetReached));
                }
                let retreat = self
                    .peak_angle
                    .map_or(0.0, |peak| t.toward_target(peak) - toward);
                let heading_back = self.velocity * t.direction().sign() < -ctx.config.velocity_noise_deg;
                if retreat > ctx.config.reversal_margin_deg
                    && (heading_back || g.has_returned(angle, t))
                {
                    Some((ExercisePhase::Returning, TransitionReason::MovementReversed))
                } else {
                    None
                }
            }

            ExercisePhase::Holding => {
                let held = self
                    .hold_started_at
                    .map_or(Duration::ZERO, |start| now.duration_since(start));
                if held >= t.hold_time() {
                    Some((ExercisePhase::Returning, TransitionReason::HoldCompleted))
                } else if toward < t.toward_target(t.completion.angle) - ctx.config.hold_exit_margin_deg {
                    Some((ExercisePhase::Moving, TransitionReason::HoldAbandoned))
                } else {
                    None
                }
            }

            ExercisePhase::Returning => {
                if !g.has_returned(angle, t) {
                    None
                } else if self.aborted {
                    let to = if g.is_in_start_position(angle, t) {
                        ExercisePhase::Ready
                    } else {
                        ExercisePhase::Idle
                    };
                    Some((to, TransitionReason::ReturnedWithoutCompletion))
                } else {
                    Some((ExercisePhase::Cooldown, TransitionReason::RepCompleted))
                }
            }

            ExercisePhase::Cooldown => {
                let since = self
                    .last_rep_completed_at
                    .map_or(Duration::MAX, |done| now.duration_since(done));
                if since < adaptive_cooldown(ctx.cooldown, self.last_rep_duration) {
                    None
                } else if g.is_in_start_position(angle, t) {
                    Some((ExercisePhase::Ready, TransitionReason::CooldownElapsed))
                } else {
                    Some((ExercisePhase::Idle, TransitionReason::CooldownElapsed))
                }
            }
        }
    }

    fn commit(
        &mut self,
        to: ExercisePhase,
        reason: TransitionReason,
        angle: f32,
        now: FrameTime,
    ) -> Step {
        let from = self.phase;
        self.phase = to;
        let mut outcome = None;

        match (from, to) {
            (ExercisePhase::Ready, ExercisePhase::Moving) => {
                self.rep_started_at = Some(now);
                self.peak_angle = Some(angle);
                self.aborted = false;
            }
            (ExercisePhase::Moving, ExercisePhase::Holding) => {
                self.hold_started_at = Some(now);
            }
            (ExercisePhase::Moving, ExercisePhase::Returning) => {
                self.aborted = true;
            }
            (ExercisePhase::Holding, _) => {
                self.hold_started_at = None;
            }
            (ExercisePhase::Returning, _) => {
                let duration = self
                    .rep_started_at
                    .map(|start| now.duration_since(start))
                    .unwrap_or_default();
                let counted = to == ExercisePhase::Cooldown;
                outcome = Some(RepOutcome {
                    peak_angle: self.peak_angle.unwrap_or(angle),
                    duration,
                    counted,
                });
                if counted {
                    self.rep_count = self.rep_count.saturating_add(1);
                    self.last_rep_completed_at = Some(now);
                    self.last_rep_duration = Some(duration);
                }
                self.rep_started_at = None;
                self.peak_angle = None;
                self.aborted = false;
            }
            _ => {}
        }

        Step {
            transition: Some(PhaseTransition::new(from, to, reason, now)),
            outcome,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use repsense_geometry::Squat;

    struct Rig {
        geometry: Squat,
        thresholds: ThresholdResult,
        cooldown: CooldownConfig,
        config: EngineConfig,
        machine: PhaseMachine,
        now: FrameTime,
    }

    impl Rig {
        fn new() -> Self {
            let geometry = Squat::new();
            let config = EngineConfig {
                debounce_frames: 2,
                ..EngineConfig::default()
            };
            Self {
                thresholds: geometry.default_thresholds(),
                cooldown: geometry.default_cooldown(),
                machine: PhaseMachine::new(config.debounce_frames),
                geometry,
                config,
                now: FrameTime::ZERO,
            }
        }

        /// Feed `angle` for `frames` frames, 100 ms apart
        fn feed(&mut self, angle: f32, frames: usize) -> Vec<Step> {
            let mut steps = Vec::new();
            for _ in 0..frames {
                self.now = self.now + Duration::from_millis(100);
                let ctx = StepContext {
                    geometry: &self.geometry,
                    thresholds: &self.thresholds,
                    cooldown: &self.cooldown,
                    config: &self.config,
                };
                steps.push(self.machine.step(angle, self.now, &ctx));
            }
            steps
        }
    }

    #[test]
    fn test_enter_ready_is_debounced() {
        let mut rig = Rig::new();
        rig.feed(160.0, 1);
        assert_eq!(rig.machine.phase(), ExercisePhase::Idle);
        rig.feed(160.0, 1);
        assert_eq!(rig.machine.phase(), ExercisePhase::Ready);
    }

    #[test]
    fn test_full_rep() {
        let mut rig = Rig::new();
        rig.feed(160.0, 3);
        rig.feed(145.0, 3);
        assert_eq!(rig.machine.phase(), ExercisePhase::Moving);
        rig.feed(110.0, 3);
        assert_eq!(rig.machine.phase(), ExercisePhase::Holding);
        assert!(rig.machine.hold_progress(rig.now, &rig.thresholds).is_some());
        rig.feed(95.0, 8);
        assert_eq!(rig.machine.phase(), ExercisePhase::Returning);
        assert_eq!(rig.machine.peak_angle(), Some(95.0));

        let steps = rig.feed(150.0, 1);
        assert_eq!(rig.machine.phase(), ExercisePhase::Cooldown);
        let outcome = steps[0].outcome.unwrap();
        assert!(outcome.counted);
        assert_eq!(outcome.peak_angle, 95.0);
        assert_eq!(rig.machine.rep_count(), 1);
        assert!(steps[0].transition.unwrap().completes_rep());
    }

    #[test]
    fn test_reversal_aborts() {
        let mut rig = Rig::new();
        rig.feed(160.0, 3);
        rig.feed(145.0, 3);
        rig.feed(135.0, 3);
        rig.feed(140.0, 1);
        rig.feed(146.0, 2);
        assert_eq!(rig.machine.phase(), ExercisePhase::Returning);

        let steps = rig.feed(160.0, 2);
        assert_eq!(rig.machine.phase(), ExercisePhase::Ready);
        let outcome = steps[1].outcome.unwrap();
        assert!(!outcome.counted);
        assert_eq!(outcome.peak_angle, 135.0);
        assert_eq!(rig.machine.rep_count(), 0);
    }

    #[test]
    fn test_hold_abandoned() {
        let mut rig = Rig::new();
        rig.feed(160.0, 3);
        rig.feed(145.0, 3);
        rig.feed(120.0, 2);
        assert_eq!(rig.machine.phase(), ExercisePhase::Holding);
        rig.feed(137.0, 2);
        assert_eq!(rig.machine.phase(), ExercisePhase::Moving);
        assert_eq!(rig.machine.hold_progress(rig.now, &rig.thresholds), None);
    }

    #[test]
    fn test_ready_to_idle() {
        let mut rig = Rig::new();
        rig.feed(160.0, 3);
        rig.feed(178.0, 2);
        assert_eq!(rig.machine.phase(), ExercisePhase::Idle);
    }

    #[test]
    fn test_cooldown_waits() {
        let mut rig = Rig::new();
        rig.feed(160.0, 3);
        rig.feed(145.0, 3);
        rig.feed(100.0, 8);
        rig.feed(160.0, 1);
        assert_eq!(rig.machine.phase(), ExercisePhase::Cooldown);
        // Rep took 1 s: cooldown is the 400 ms floor
        rig.feed(160.0, 3);
        assert_eq!(rig.machine.phase(), ExercisePhase::Cooldown);
        rig.feed(160.0, 3);
        assert_eq!(rig.machine.phase(), ExercisePhase::Ready);
    }
}
