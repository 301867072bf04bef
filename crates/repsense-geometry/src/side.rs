//! Bilateral side selection
//!
//! Bilateral exercises measure both sides and reduce them to one sample. The
//! reduction only looks at the current frame. These heuristics are tuned per
//! exercise and have not been validated under rotated or partly occluded
//! camera views, which is why they sit behind a trait and can be swapped.

use std::fmt;

use repsense_core::JointAngleSample;

use crate::SideReading;

/// Reduce left/right readings to one sample
pub trait SidePolicy: fmt::Debug + Send + Sync {
    /// Both readings are present
    fn choose(&self, left: SideReading, right: SideReading) -> JointAngleSample;

    /// Falls back to whichever side is valid
    fn select(&self, left: Option<SideReading>, right: Option<SideReading>) -> Option<JointAngleSample> {
        match (left, right) {
            (Some(l), Some(r)) => Some(self.choose(l, r)),
            (Some(side), None) | (None, Some(side)) => Some(side.sample),
            (None, None) => None,
        }
    }
}

/// Mean of both sides
#[derive(Debug, Clone, Copy, Default)]
pub struct AverageBoth;

impl SidePolicy for AverageBoth {
    fn choose(&self, left: SideReading, right: SideReading) -> JointAngleSample {
        JointAngleSample::new(
            (left.sample.angle + right.sample.angle) / 2.0,
            (left.sample.confidence + right.sample.confidence) / 2.0,
        )
    }
}

/// Side whose joint is nearer the camera (e.g. the forward leg of a lunge)
#[derive(Debug, Clone, Copy, Default)]
pub struct NearestDepth;

impl SidePolicy for NearestDepth {
    fn choose(&self, left: SideReading, right: SideReading) -> JointAngleSample {
        if right.depth < left.depth {
            right.sample
        } else {
            left.sample
        }
    }
}

/// Side with the smaller angle (the working arm of a curl, the raised knee)
#[derive(Debug, Clone, Copy, Default)]
pub struct MostFlexed;

impl SidePolicy for MostFlexed {
    fn choose(&self, left: SideReading, right: SideReading) -> JointAngleSample {
        if right.sample.angle < left.sample.angle {
            right.sample
        } else {
            left.sample
        }
    }
}

/// Side with the larger angle (the raised arm of a lateral raise)
#[derive(Debug, Clone, Copy, Default)]
pub struct MostExtended;

impl SidePolicy for MostExtended {
    fn choose(&self, left: SideReading, right: SideReading) -> JointAngleSample {
        if right.sample.angle > left.sample.angle {
            right.sample
        } else {
            left.sample
        }
    }
}
