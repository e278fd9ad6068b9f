//! Records which stages of a guarded call ran.

use crate::guard::Stage;
use parking_lot::Mutex;

/// Collects stage invocations in order.
///
/// Methods take `&self`, so one recorder can be borrowed by all three
/// closures of a guarded call at once.
#[derive(Debug, Default)]
pub struct StageRecorder {
    stages: Mutex<Vec<Stage>>,
}

impl StageRecorder {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records that `stage` ran.
    pub fn record(&self, stage: Stage) {
        self.stages.lock().push(stage);
    }

    /// Returns all recorded stages in invocation order.
    #[must_use]
    pub fn stages(&self) -> Vec<Stage> {
        self.stages.lock().clone()
    }

    /// Returns how many times `stage` ran.
    #[must_use]
    pub fn count(&self, stage: Stage) -> usize {
        self.stages.lock().iter().filter(|s| **s == stage).count()
    }

    /// Clears recorded stages.
    pub fn clear(&self) {
        self.stages.lock().clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recorder_keeps_order() {
        let recorder = StageRecorder::new();
        recorder.record(Stage::Work);
        recorder.record(Stage::OnFinally);

        assert_eq!(recorder.stages(), vec![Stage::Work, Stage::OnFinally]);
        assert_eq!(recorder.count(Stage::Work), 1);
        assert_eq!(recorder.count(Stage::OnException), 0);
    }

    #[test]
    fn test_recorder_clear() {
        let recorder = StageRecorder::new();
        recorder.record(Stage::Work);
        recorder.clear();

        assert!(recorder.stages().is_empty());
    }
}
