//! Adaptive cooldown between reps

use std::time::Duration;

use repsense_core::CooldownConfig;

/// Cooldown after a rep that took `last_rep_duration`
///
/// `clamp(duration * scale, min, max)`, or `min` when there was no prior rep.
/// Always within `[min, max]`.
pub fn adaptive_cooldown(config: &CooldownConfig, last_rep_duration: Option<Duration>) -> Duration {
    let (min, max) = if config.min_cooldown <= config.max_cooldown {
        (config.min_cooldown, config.max_cooldown)
    } else {
        (config.max_cooldown, config.min_cooldown)
    };

    let Some(duration) = last_rep_duration else {
        return min;
    };

    let raw = duration.as_secs_f64() * config.adaptive_scale;
    if !raw.is_finite() || raw >= max.as_secs_f64() {
        return max;
    }
    if raw <= min.as_secs_f64() {
        return min;
    }
    Duration::try_from_secs_f64(raw).unwrap_or(max).clamp(min, max)
}
