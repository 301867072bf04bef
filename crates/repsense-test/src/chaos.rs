//! Chaos for landmark streams
//!
//! Simulates a misbehaving pose estimator:
//! - Positional noise
//! - Dropped frames, alone or in bursts
//! - Occluded landmarks (visibility collapse)

use rand::distributions::{Distribution, Uniform};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use repsense_core::Landmark;

/// Positional noise added to every landmark
#[derive(Clone, Debug)]
pub enum NoiseDistribution {
    None,
    /// Uniform in [-amplitude, amplitude]
    Uniform { amplitude: f32 },
    /// Zero-mean normal
    Normal { stddev: f32 },
}

impl NoiseDistribution {
    pub fn sample(&self, rng: &mut StdRng) -> f32 {
        match self {
            NoiseDistribution::None => 0.0,
            NoiseDistribution::Uniform { amplitude } => {
                if *amplitude <= 0.0 {
                    return 0.0;
                }
                Uniform::new_inclusive(-*amplitude, *amplitude).sample(rng)
            }
            NoiseDistribution::Normal { stddev } => {
                // Box-Muller
                let u1: f64 = rng.gen_range(f64::EPSILON..1.0);
                let u2: f64 = rng.gen();
                let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
                (z * *stddev as f64) as f32
            }
        }
    }
}

/// Estimator chaos configuration
#[derive(Clone, Debug)]
pub struct PoseChaosConfig {
    pub noise: NoiseDistribution,
    /// Chance a single frame has no pose (0.0 - 1.0)
    pub dropout_rate: f64,
    /// Chance a burst of dropped frames starts
    pub burst_dropout_prob: f64,
    /// Burst length range, in frames
    pub burst_length: (u32, u32),
    /// Chance one landmark of a frame is occluded
    pub occlusion_prob: f64,
    /// Visibility given to an occluded landmark
    pub occluded_visibility: f32,
}

impl Default for PoseChaosConfig {
    fn default() -> Self {
        PoseChaosConfig {
            noise: NoiseDistribution::Normal { stddev: 0.002 },
            dropout_rate: 0.01,
            burst_dropout_prob: 0.005,
            burst_length: (2, 5),
            occlusion_prob: 0.02,
            occluded_visibility: 0.1,
        }
    }
}

impl PoseChaosConfig {
    /// Perfect estimator
    pub fn clean() -> Self {
        PoseChaosConfig {
            noise: NoiseDistribution::None,
            dropout_rate: 0.0,
            burst_dropout_prob: 0.0,
            burst_length: (0, 0),
            occlusion_prob: 0.0,
            occluded_visibility: 0.1,
        }
    }

    /// Typical laptop webcam in a lit room
    pub fn webcam() -> Self {
        Self::default()
    }

    /// Poor light, partial framing, a busy background
    pub fn hostile() -> Self {
        PoseChaosConfig {
            noise: NoiseDistribution::Normal { stddev: 0.006 },
            dropout_rate: 0.08,
            burst_dropout_prob: 0.03,
            burst_length: (3, 10),
            occlusion_prob: 0.15,
            occluded_visibility: 0.05,
        }
    }
}

/// What chaos did to a frame
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameFate {
    /// Only noise applied
    Delivered,
    /// One landmark lost visibility
    Occluded(usize),
    /// No landmarks at all
    Dropped,
}

/// Chaos statistics
#[derive(Clone, Debug, Default)]
pub struct ChaosStats {
    pub frames_seen: u64,
    pub frames_dropped: u64,
    pub frames_occluded: u64,
    pub bursts: u64,
}

impl ChaosStats {
    pub fn drop_rate(&self) -> f64 {
        if self.frames_seen == 0 {
            0.0
        } else {
            self.frames_dropped as f64 / self.frames_seen as f64
        }
    }
}

/// Seeded landmark chaos
#[derive(Debug)]
pub struct PoseChaos {
    config: PoseChaosConfig,
    rng: StdRng,
    burst_remaining: u32,
    stats: ChaosStats,
}

impl PoseChaos {
    pub fn new(config: PoseChaosConfig, seed: u64) -> Self {
        PoseChaos {
            config,
            rng: StdRng::seed_from_u64(seed),
            burst_remaining: 0,
            stats: ChaosStats::default(),
        }
    }

    /// Corrupt one frame in place
    pub fn apply(&mut self, landmarks: &mut Vec<Landmark>) -> FrameFate {
        self.stats.frames_seen += 1;

        if self.should_drop() {
            self.stats.frames_dropped += 1;
            landmarks.clear();
            return FrameFate::Dropped;
        }

        for lm in landmarks.iter_mut() {
            lm.x += self.config.noise.sample(&mut self.rng);
            lm.y += self.config.noise.sample(&mut self.rng);
        }

        if !landmarks.is_empty() && self.rng.gen::<f64>() < self.config.occlusion_prob {
            let index = self.rng.gen_range(0..landmarks.len());
            landmarks[index].visibility = self.config.occluded_visibility;
            self.stats.frames_occluded += 1;
            return FrameFate::Occluded(index);
        }

        FrameFate::Delivered
    }

    fn should_drop(&mut self) -> bool {
        if self.burst_remaining > 0 {
            self.burst_remaining -= 1;
            return true;
        }

        if self.rng.gen::<f64>() < self.config.burst_dropout_prob {
            let (min, max) = self.config.burst_length;
            // This frame is the first of the burst
            self.burst_remaining = self.rng.gen_range(min..=max.max(min)).saturating_sub(1);
            self.stats.bursts += 1;
            return true;
        }

        self.rng.gen::<f64>() < self.config.dropout_rate
    }

    pub fn stats(&self) -> &ChaosStats {
        &self.stats
    }

    pub fn reset_stats(&mut self) {
        self.stats = ChaosStats::default();
    }
}
