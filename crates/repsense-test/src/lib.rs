//! RepSense Test Harness - Synthetic poses, estimator chaos and scenarios
//!
//! This crate provides:
//! - Landmark frames synthesized for a chosen joint angle
//! - Seeded estimator chaos (noise, dropped frames, occlusion)
//! - Keyframed angle scenarios, replayed raw or end to end
//! - Reference scenarios and the end-to-end suite

pub mod chaos;
pub mod integration;
pub mod scenario;
pub mod synth;

pub use chaos::*;
pub use integration::*;
pub use scenario::*;
pub use synth::*;
