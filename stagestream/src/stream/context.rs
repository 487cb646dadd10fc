//! Per-pipeline shared state and the monitor handed to callers.

use crate::cancellation::{CancellationSignal, WorkerTracker};
use crate::config::StreamConfig;
use crate::errors::StreamError;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

/// State shared by every stage of one pipeline instance.
pub(crate) struct PipelineContext {
    pub(crate) id: Uuid,
    pub(crate) signal: CancellationSignal,
    pub(crate) workers: WorkerTracker,
    pub(crate) config: StreamConfig,
    next_stage: AtomicUsize,
}

impl PipelineContext {
    pub(crate) fn new(config: StreamConfig) -> Arc<Self> {
        Arc::new(Self {
            id: Uuid::new_v4(),
            signal: CancellationSignal::new(),
            workers: WorkerTracker::new(),
            config,
            next_stage: AtomicUsize::new(0),
        })
    }

    /// Position of the next stage in the chain, starting at 0 for the source.
    pub(crate) fn next_stage_index(&self) -> usize {
        self.next_stage.fetch_add(1, Ordering::Relaxed)
    }

    /// Closes the pipeline's cancellation signal.
    pub(crate) fn cancel(&self, reason: &str) -> bool {
        self.signal.close(reason)
    }

    /// The error a terminal reports when the signal was closed under it.
    pub(crate) fn cancelled_error(&self) -> StreamError {
        StreamError::Cancelled(
            self.signal
                .reason()
                .unwrap_or_else(|| "cancelled".to_string()),
        )
    }

    pub(crate) fn monitor(&self) -> PipelineMonitor {
        PipelineMonitor {
            id: self.id,
            signal: self.signal.clone(),
            workers: self.workers.clone(),
        }
    }
}

impl std::fmt::Debug for PipelineContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PipelineContext")
            .field("id", &self.id)
            .field("cancelled", &self.signal.is_closed())
            .field("active_workers", &self.workers.active())
            .finish()
    }
}

/// An observer of one pipeline instance.
///
/// Remains usable after the stream itself has been consumed.
#[derive(Debug, Clone)]
pub struct PipelineMonitor {
    id: Uuid,
    signal: CancellationSignal,
    workers: WorkerTracker,
}

impl PipelineMonitor {
    /// Returns the pipeline id used in log fields.
    #[must_use]
    pub const fn id(&self) -> Uuid {
        self.id
    }

    /// Returns the number of stage workers still running.
    #[must_use]
    pub fn active_workers(&self) -> usize {
        self.workers.active()
    }

    /// Returns whether the pipeline's cancellation signal is closed.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.signal.is_closed()
    }

    /// Closes the pipeline's cancellation signal from outside, e.g. after a
    /// deadline. Returns true if this call performed the close.
    pub fn cancel(&self, reason: impl Into<String>) -> bool {
        self.signal.close(reason)
    }

    /// Blocks until every stage worker has exited or `timeout` passes.
    pub fn wait_for_shutdown(&self, timeout: Duration) -> bool {
        self.workers.wait_idle(timeout)
    }
}
