//! RepSense Core - Fundamental types and primitives
//!
//! This crate defines the types shared by every RepSense crate:
//! - Landmarks and landmark topologies (body pose, hand)
//! - Frame time
//! - Exercise and joint identifiers
//! - Phases, transitions and per-frame detection results
//! - Thresholds, calibration payloads and cooldown configuration

pub mod cooldown;
pub mod error;
pub mod exercise;
pub mod landmark;
pub mod phase;
pub mod result;
pub mod threshold;
pub mod time;

pub use cooldown::*;
pub use error::*;
pub use exercise::*;
pub use landmark::*;
pub use phase::*;
pub use result::*;
pub use threshold::*;
pub use time::*;
