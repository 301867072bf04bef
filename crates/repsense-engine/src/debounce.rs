//! Transition debouncing

use repsense_core::ExercisePhase;

/// Commits a candidate phase only after it is seen on consecutive frames
#[derive(Clone, Debug)]
pub struct Debouncer {
    required: u32,
    candidate: Option<ExercisePhase>,
    count: u32,
}

impl Debouncer {
    /// `required` of 0 behaves as 1
    pub fn new(required: u32) -> Self {
        Self {
            required: required.max(1),
            candidate: None,
            count: 0,
        }
    }

    pub fn required(&self) -> u32 {
        self.required
    }

    /// Candidate currently being counted, with its streak
    pub fn pending(&self) -> Option<(ExercisePhase, u32)> {
        self.candidate.map(|phase| (phase, self.count))
    }

    /// Observe this frame's candidate
    ///
    /// Returns the phase to commit once the same candidate has been seen on
    /// `required` consecutive frames. A different candidate restarts the
    /// streak; `None` clears it.
    pub fn observe(&mut self, candidate: Option<ExercisePhase>) -> Option<ExercisePhase> {
        let Some(phase) = candidate else {
            self.reset();
            return None;
        };

        if self.candidate == Some(phase) {
            self.count = self.count.saturating_add(1);
        } else {
            self.candidate = Some(phase);
            self.count = 1;
        }

        if self.count >= self.required {
            self.reset();
            Some(phase)
        } else {
            None
        }
    }

    pub fn reset(&mut self) {
        self.candidate = None;
        self.count = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ExercisePhase::*;

    #[test]
    fn test_commits_after_required_frames() {
        let mut d = Debouncer::new(3);
        assert_eq!(d.observe(Some(Ready)), None);
        assert_eq!(d.observe(Some(Ready)), None);
        assert_eq!(d.observe(Some(Ready)), Some(Ready));
        assert_eq!(d.pending(), None);
    }

    #[test]
    fn test_different_candidate_restarts() {
        let mut d = Debouncer::new(3);
        d.observe(Some(Ready));
        d.observe(Some(Ready));
        assert_eq!(d.observe(Some(Idle)), None);
        assert_eq!(d.pending(), Some((Idle, 1)));
        d.observe(Some(Idle));
        assert_eq!(d.observe(Some(Idle)), Some(Idle));
    }

    #[test]
    fn test_gap_restarts() {
        let mut d = Debouncer::new(2);
        d.observe(Some(Moving));
        assert_eq!(d.observe(None), None);
        assert_eq!(d.observe(Some(Moving)), None);
        assert_eq!(d.observe(Some(Moving)), Some(Moving));
    }

    #[test]
    fn test_single_frame() {
        let mut d = Debouncer::new(0);
        assert_eq!(d.required(), 1);
        assert_eq!(d.observe(Some(Holding)), Some(Holding));
    }
}
