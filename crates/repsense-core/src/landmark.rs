//! Landmarks and landmark topologies
//!
//! Landmarks are produced every frame by an external pose or hand estimator.
//! The engine only reads them. Indices follow the 33-point body topology and
//! the 21-point hand topology used by common landmark estimators.

use serde::{Deserialize, Serialize};

/// A single landmark (normalized image coordinates, or metres for world landmarks)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
    /// Relative depth, smaller is nearer the camera
    pub z: f32,
    /// Visibility/presence score in [0, 1]
    #[serde(default = "full_visibility")]
    pub visibility: f32,
}

fn full_visibility() -> f32 {
    1.0
}

impl Default for Landmark {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            z: 0.0,
            visibility: 0.0,
        }
    }
}

impl Landmark {
    /// Fully visible landmark
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self {
            x,
            y,
            z,
            visibility: 1.0,
        }
    }

    pub fn with_visibility(mut self, visibility: f32) -> Self {
        self.visibility = visibility;
        self
    }

    /// Usable for measurement: finite coordinates and visibility at or above the floor
    #[inline]
    pub fn is_visible(&self, min_visibility: f32) -> bool {
        self.x.is_finite()
            && self.y.is_finite()
            && self.z.is_finite()
            && self.visibility >= min_visibility
    }
}

/// One frame of landmarks as handed to a detector
///
/// `image` holds the normalized image-space landmarks. `world` optionally holds
/// the metric world-space landmarks some estimators emit alongside them, with
/// the same index topology.
#[derive(Debug, Clone, Copy)]
pub struct LandmarkFrame<'a> {
    image: &'a [Landmark],
    world: Option<&'a [Landmark]>,
}

impl<'a> LandmarkFrame<'a> {
    pub fn new(image: &'a [Landmark]) -> Self {
        Self { image, world: None }
    }

    pub fn with_world(image: &'a [Landmark], world: &'a [Landmark]) -> Self {
        Self {
            image,
            world: Some(world),
        }
    }

    pub fn image(&self) -> &'a [Landmark] {
        self.image
    }

    pub fn world(&self) -> Option<&'a [Landmark]> {
        self.world
    }

    /// Image landmark at `index`, if the frame is long enough
    #[inline]
    pub fn get(&self, index: usize) -> Option<&'a Landmark> {
        self.image.get(index)
    }

    /// World landmark at `index`, if world landmarks were supplied
    #[inline]
    pub fn world_point(&self, index: usize) -> Option<&'a Landmark> {
        self.world.and_then(|w| w.get(index))
    }

    pub fn len(&self) -> usize {
        self.image.len()
    }

    pub fn is_empty(&self) -> bool {
        self.image.is_empty()
    }
}

/// Body pose topology (33 landmarks)
pub mod pose {
    pub const LANDMARK_COUNT: usize = 33;

    pub const NOSE: usize = 0;
    pub const LEFT_SHOULDER: usize = 11;
    pub const RIGHT_SHOULDER: usize = 12;
    pub const LEFT_ELBOW: usize = 13;
    pub const RIGHT_ELBOW: usize = 14;
    pub const LEFT_WRIST: usize = 15;
    pub const RIGHT_WRIST: usize = 16;
    pub const LEFT_HIP: usize = 23;
    pub const RIGHT_HIP: usize = 24;
    pub const LEFT_KNEE: usize = 25;
    pub const RIGHT_KNEE: usize = 26;
    pub const LEFT_ANKLE: usize = 27;
    pub const RIGHT_ANKLE: usize = 28;
}

/// Hand topology (21 landmarks)
pub mod hand {
    pub const LANDMARK_COUNT: usize = 21;

    pub const WRIST: usize = 0;
    pub const THUMB_CMC: usize = 1;
    pub const THUMB_MCP: usize = 2;
    pub const THUMB_IP: usize = 3;
    pub const THUMB_TIP: usize = 4;
    pub const INDEX_MCP: usize = 5;
    pub const INDEX_PIP: usize = 6;
    pub const INDEX_DIP: usize = 7;
    pub const INDEX_TIP: usize = 8;
    pub const MIDDLE_MCP: usize = 9;
    pub const MIDDLE_PIP: usize = 10;
    pub const MIDDLE_DIP: usize = 11;
    pub const MIDDLE_TIP: usize = 12;
    pub const RING_MCP: usize = 13;
    pub const RING_PIP: usize = 14;
    pub const RING_DIP: usize = 15;
    pub const RING_TIP: usize = 16;
    pub const PINKY_MCP: usize = 17;
    pub const PINKY_PIP: usize = 18;
    pub const PINKY_DIP: usize = 19;
    pub const PINKY_TIP: usize = 20;
}
