//! Moving-average angle smoothing

use std::collections::VecDeque;

use repsense_core::JointAngleSample;

/// Default number of frames averaged
pub const DEFAULT_SMOOTHING_WINDOW: usize = 5;

/// Fixed-window moving average over joint angles
///
/// Defined from the first sample: with fewer than `window` samples it
/// averages what it has. Confidence is passed through unsmoothed.
#[derive(Debug, Clone)]
pub struct AngleSmoother {
    window: usize,
    samples: VecDeque<f32>,
    sum: f64,
}

impl AngleSmoother {
    /// A window of 0 is treated as 1 (no smoothing)
    pub fn new(window: usize) -> Self {
        let window = window.max(1);
        Self {
            window,
            samples: VecDeque::with_capacity(window),
            sum: 0.0,
        }
    }

    pub fn window(&self) -> usize {
        self.window
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Push a raw sample, return the smoothed one
    pub fn push(&mut self, sample: JointAngleSample) -> JointAngleSample {
        if self.samples.len() == self.window {
            if let Some(old) = self.samples.pop_front() {
                self.sum -= old as f64;
            }
        }
        self.samples.push_back(sample.angle);
        self.sum += sample.angle as f64;

        JointAngleSample {
            angle: self.mean().unwrap_or(sample.angle),
            confidence: sample.confidence,
        }
    }

    /// Current smoothed angle
    pub fn mean(&self) -> Option<f32> {
        if self.samples.is_empty() {
            None
        } else {
            Some((self.sum / self.samples.len() as f64) as f32)
        }
    }

    pub fn reset(&mut self) {
        self.samples.clear();
        self.sum = 0.0;
    }
}

impl Default for AngleSmoother {
    fn default() -> Self {
        Self::new(DEFAULT_SMOOTHING_WINDOW)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s(angle: f32) -> JointAngleSample {
        JointAngleSample::new(angle, 0.8)
    }

    #[test]
    fn test_defined_before_window_fills() {
        let mut smoother = AngleSmoother::default();
        assert_eq!(smoother.mean(), None);
        assert_eq!(smoother.push(s(100.0)).angle, 100.0);
        assert_eq!(smoother.push(s(110.0)).angle, 105.0);
    }

    #[test]
    fn test_window_slides() {
        let mut smoother = AngleSmoother::new(3);
        for a in [10.0, 20.0, 30.0] {
            smoother.push(s(a));
        }
        let out = smoother.push(s(40.0));
        assert!((out.angle - 30.0).abs() < 1e-4);
        assert_eq!(smoother.len(), 3);
    }

    #[test]
    fn test_confidence_passes_through() {
        let mut smoother = AngleSmoother::default();
        smoother.push(JointAngleSample::new(90.0, 0.9));
        let out = smoother.push(JointAngleSample::new(90.0, 0.3));
        assert_eq!(out.confidence, 0.3);
    }

    #[test]
    fn test_reset() {
        let mut smoother = AngleSmoother::default();
        smoother.push(s(50.0));
        smoother.reset();
        assert!(smoother.is_empty());
        assert_eq!(smoother.push(s(120.0)).angle, 120.0);
    }

    #[test]
    fn test_zero_window() {
        let mut smoother = AngleSmoother::new(0);
        smoother.push(s(10.0));
        assert_eq!(smoother.push(s(20.0)).angle, 20.0);
    }
}
