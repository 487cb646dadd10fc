//! Lifecycle logging for stage workers.

use crate::core::{StageExit, StageKind};
use std::time::Instant;
use tracing::{debug, trace};
use uuid::Uuid;

/// Tracks one stage worker from start to exit and logs both ends.
#[derive(Debug)]
pub struct StageSpan {
    pipeline: Uuid,
    stage: String,
    kind: StageKind,
    trace_elements: bool,
    start: Instant,
    forwarded: u64,
}

impl StageSpan {
    /// Starts a span and logs the stage start.
    #[must_use]
    pub fn start(pipeline: Uuid, stage: impl Into<String>, kind: StageKind, trace_elements: bool) -> Self {
        let stage = stage.into();
        debug!(pipeline = %pipeline, stage = %stage, kind = %kind, "Stage started");
        Self {
            pipeline,
            stage,
            kind,
            trace_elements,
            start: Instant::now(),
            forwarded: 0,
        }
    }

    /// Returns the stage name.
    #[must_use]
    pub fn stage(&self) -> &str {
        &self.stage
    }

    /// Records one element handed downstream.
    pub fn record_forward(&mut self) {
        self.forwarded += 1;
        if self.trace_elements {
            trace!(pipeline = %self.pipeline, stage = %self.stage, seq = self.forwarded, "Element forwarded");
        }
    }

    /// Returns the number of elements forwarded so far.
    #[must_use]
    pub const fn forwarded(&self) -> u64 {
        self.forwarded
    }

    /// Logs the stage exit and returns the elapsed time in milliseconds.
    pub fn finish(self, exit: StageExit) -> f64 {
        let duration_ms = self.start.elapsed().as_secs_f64() * 1000.0;
        debug!(
            pipeline = %self.pipeline,
            stage = %self.stage,
            kind = %self.kind,
            exit = %exit,
            forwarded = self.forwarded,
            duration_ms,
            "Stage stopped"
        );
        duration_ms
    }
}
