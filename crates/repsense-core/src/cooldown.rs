//! Cooldown configuration
//!
//! After a rep is counted the detector waits before a new cycle may begin.
//! The wait scales with how long the previous rep took, bounded on both sides.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{RepError, RepResult};

/// Adaptive cooldown bounds, fixed per exercise type at construction
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CooldownConfig {
    /// Floor, guards against double counting on angle noise
    pub min_cooldown: Duration,
    /// Ceiling, prevents stalling after a very slow rep
    pub max_cooldown: Duration,
    /// Fraction of the previous rep duration to wait
    pub adaptive_scale: f64,
}

impl CooldownConfig {
    /// Validated constructor
    pub fn new(min_cooldown: Duration, max_cooldown: Duration, adaptive_scale: f64) -> RepResult<Self> {
        let config = Self {
            min_cooldown,
            max_cooldown,
            adaptive_scale,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn from_millis(min_ms: u64, max_ms: u64, adaptive_scale: f64) -> RepResult<Self> {
        Self::new(
            Duration::from_millis(min_ms),
            Duration::from_millis(max_ms),
            adaptive_scale,
        )
    }

    pub fn validate(&self) -> RepResult<()> {
        if self.min_cooldown > self.max_cooldown {
            return Err(RepError::InvalidCooldown(format!(
                "min {:?} exceeds max {:?}",
                self.min_cooldown, self.max_cooldown
            )));
        }
        if !self.adaptive_scale.is_finite() || self.adaptive_scale < 0.0 {
            return Err(RepError::InvalidCooldown(format!(
                "adaptive scale {} must be finite and non-negative",
                self.adaptive_scale
            )));
        }
        Ok(())
    }
}

impl Default for CooldownConfig {
    fn default() -> Self {
        CooldownConfig {
            min_cooldown: Duration::from_millis(300),
            max_cooldown: Duration::from_millis(1500),
            adaptive_scale: 0.3,
        }
    }
}
