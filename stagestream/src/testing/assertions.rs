//! Test assertions for stream results and pipeline liveness.

use crate::errors::{ErrorKind, Result};
use crate::stream::PipelineMonitor;
use std::fmt::Debug;
use std::time::Duration;

/// Asserts that `result` failed with an error of kind `expected`.
pub fn assert_error_kind<T: Debug>(result: &Result<T>, expected: ErrorKind) {
    match result {
        Ok(value) => panic!("Expected {expected} error, got Ok({value:?})"),
        Err(err) => assert_eq!(
            err.kind(),
            expected,
            "Expected {:?}, got {:?}",
            expected,
            err
        ),
    }
}

/// Asserts that every stage worker of the monitored pipeline exits within
/// `timeout`.
pub fn assert_shutdown(monitor: &PipelineMonitor, timeout: Duration) {
    assert!(
        monitor.wait_for_shutdown(timeout),
        "Pipeline {} still has {} running worker(s) after {:?}",
        monitor.id(),
        monitor.active_workers(),
        timeout
    );
}

/// Asserts that the monitored pipeline's cancellation signal is closed.
pub fn assert_cancelled(monitor: &PipelineMonitor) {
    assert!(
        monitor.is_cancelled(),
        "Expected pipeline {} to be cancelled",
        monitor.id()
    );
}
