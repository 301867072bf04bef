//! Caller-owned detector registry

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::debug;

use repsense_core::{ExerciseType, RepError, RepResult};
use repsense_geometry::{geometry_for, ExerciseGeometry};

use crate::{DynDetector, EngineConfig, RepDetector};

/// Registry shared across threads
pub type SharedRegistry = Arc<Mutex<DetectorRegistry>>;

/// Build a detector with the default geometry and cooldown for `exercise`
pub fn create_detector(exercise: ExerciseType, config: EngineConfig) -> RepResult<DynDetector> {
    let geometry = geometry_for(exercise);
    let cooldown = geometry.default_cooldown();
    RepDetector::with_config(geometry, config, cooldown)
}

/// One detector per exercise type
#[derive(Debug, Default)]
pub struct DetectorRegistry {
    config: EngineConfig,
    detectors: HashMap<ExerciseType, DynDetector>,
}

impl DetectorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry whose lazily created detectors use `config`
    pub fn with_config(config: EngineConfig) -> RepResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            detectors: HashMap::new(),
        })
    }

    pub fn shared(self) -> SharedRegistry {
        Arc::new(Mutex::new(self))
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Detector for `exercise`, created on first use
    pub fn get_or_create(&mut self, exercise: ExerciseType) -> RepResult<&mut DynDetector> {
        if !self.detectors.contains_key(&exercise) {
            let detector = create_detector(exercise, self.config.clone())?;
            debug!(exercise = %exercise, "detector created");
            self.detectors.insert(exercise, detector);
        }
        self.get_mut(exercise)
    }

    pub fn get(&self, exercise: ExerciseType) -> Option<&DynDetector> {
        self.detectors.get(&exercise)
    }

    pub fn get_mut(&mut self, exercise: ExerciseType) -> RepResult<&mut DynDetector> {
        self.detectors
            .get_mut(&exercise)
            .ok_or(RepError::DetectorNotRegistered(exercise))
    }

    /// Install a custom detector, returning the one it replaces
    pub fn register(&mut self, detector: DynDetector) -> Option<DynDetector> {
        self.detectors.insert(detector.exercise(), detector)
    }

    pub fn remove(&mut self, exercise: ExerciseType) -> Option<DynDetector> {
        self.detectors.remove(&exercise)
    }

    pub fn contains(&self, exercise: ExerciseType) -> bool {
        self.detectors.contains_key(&exercise)
    }

    pub fn len(&self) -> usize {
        self.detectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.detectors.is_empty()
    }

    pub fn exercises(&self) -> impl Iterator<Item = ExerciseType> + '_ {
        self.detectors.keys().copied()
    }

    pub fn reset(&mut self, exercise: ExerciseType) -> RepResult<()> {
        self.get_mut(exercise)?.reset();
        Ok(())
    }

    pub fn reset_all(&mut self) {
        for detector in self.detectors.values_mut() {
            detector.reset();
        }
    }
}
