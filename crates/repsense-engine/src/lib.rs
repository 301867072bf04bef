//! RepSense Engine - Repetition detection
//!
//! Per frame, a [`RepDetector`] measures the driving joint through its
//! exercise geometry, smooths the angle, and advances the phase state machine:
//!
//! ```text
//! landmarks → angle → smoothed angle → phase machine → DetectionResult
//!                                           │
//!                                           └─ rep done → score, cooldown
//! ```
//!
//! Detectors are created through [`create_detector`] and held in a
//! caller-owned [`DetectorRegistry`]. Time is always supplied by the caller.

pub mod config;
pub mod cooldown;
pub mod debounce;
pub mod detector;
pub mod feedback;
pub mod machine;
pub mod registry;
pub mod scoring;

pub use config::*;
pub use cooldown::*;
pub use debounce::*;
pub use detector::*;
pub use feedback::*;
pub use machine::*;
pub use registry::*;
pub use scoring::*;
