//! Assertions over recorded guard stages.

use super::StageRecorder;
use crate::guard::Stage;

/// Asserts that exactly `expected` ran, in that order.
pub fn assert_stage_order(recorder: &StageRecorder, expected: &[Stage]) {
    let actual = recorder.stages();
    assert_eq!(
        actual, expected,
        "Expected stages {:?}, got {:?}",
        expected, actual
    );
}

/// Asserts that `stage` ran exactly once.
pub fn assert_invoked_once(recorder: &StageRecorder, stage: Stage) {
    let count = recorder.count(stage);
    assert_eq!(
        count, 1,
        "Expected stage '{}' to run once, it ran {} times",
        stage, count
    );
}

/// Asserts that `stage` never ran.
pub fn assert_not_invoked(recorder: &StageRecorder, stage: Stage) {
    let count = recorder.count(stage);
    assert_eq!(
        count, 0,
        "Expected stage '{}' not to run, it ran {} times",
        stage, count
    );
}
