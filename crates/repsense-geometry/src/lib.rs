//! RepSense Geometry
//!
//! Turns a frame of landmarks into a single joint angle.
//!
//! Each exercise is an [`ExerciseGeometry`] strategy: it names the three
//! anchor landmarks of the joint that drives the rep, the plane the angle is
//! measured in, how to pick between left and right sides, and its default
//! thresholds and cooldown. The state machine in `repsense-engine` is written
//! once against this trait.

pub mod catalog;
pub mod finger;
pub mod joint;
pub mod lower_body;
pub mod side;
pub mod smoothing;
pub mod strategy;
pub mod upper_body;
pub mod vector;

pub use catalog::*;
pub use finger::*;
pub use joint::*;
pub use lower_body::*;
pub use side::*;
pub use smoothing::*;
pub use strategy::*;
pub use upper_body::*;
pub use vector::*;
