//! Liveness tracking for stage worker threads.

use parking_lot::{Condvar, Mutex};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Counts the live worker threads of one pipeline.
///
/// Each worker holds a [`WorkerGuard`]; dropping the guard (normal exit or
/// unwinding) marks the worker finished.
#[derive(Clone, Default)]
pub struct WorkerTracker {
    inner: Arc<TrackerInner>,
}

#[derive(Default)]
struct TrackerInner {
    active: Mutex<usize>,
    idle: Condvar,
}

impl WorkerTracker {
    /// Creates a tracker with no registered workers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a worker and returns the guard that keeps it counted.
    #[must_use]
    pub fn register(&self) -> WorkerGuard {
        *self.inner.active.lock() += 1;
        WorkerGuard {
            inner: self.inner.clone(),
        }
    }

    /// Returns the number of workers still running.
    #[must_use]
    pub fn active(&self) -> usize {
        *self.inner.active.lock()
    }

    /// Blocks until every registered worker has finished or `timeout` passes.
    ///
    /// Returns true if the tracker went idle in time.
    pub fn wait_idle(&self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        let mut active = self.inner.active.lock();
        while *active > 0 {
            if self.inner.idle.wait_until(&mut active, deadline).timed_out() {
                return *active == 0;
            }
        }
        true
    }
}

impl std::fmt::Debug for WorkerTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkerTracker")
            .field("active", &self.active())
            .finish()
    }
}

/// Keeps one worker counted as live until dropped.
pub struct WorkerGuard {
    inner: Arc<TrackerInner>,
}

impl Drop for WorkerGuard {
    fn drop(&mut self) {
        let mut active = self.inner.active.lock();
        *active = active.saturating_sub(1);
        if *active == 0 {
            self.inner.idle.notify_all();
        }
    }
}

impl std::fmt::Debug for WorkerGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkerGuard").finish()
    }
}
