//! Shared plumbing for every stage: conduits, the worker thread, and the
//! recovery boundary around user callbacks.

use super::context::PipelineContext;
use crate::core::{StageExit, StageKind};
use crate::errors::{Result, StreamError};
use crate::observability::StageSpan;
use crossbeam_channel::{bounded, select, Receiver, Sender, TryRecvError};
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::thread;
use tracing::warn;

/// One step read from an upstream stage.
#[derive(Debug)]
pub(crate) enum Pull<T> {
    /// The next element.
    Item(T),
    /// Upstream forwarded or originated an error and has halted.
    Failed(StreamError),
    /// Upstream closed its data conduit.
    Exhausted,
    /// The pipeline's cancellation signal is closed.
    Cancelled,
}

/// The consuming end of a stage.
pub(crate) struct Inlet<T> {
    data: Receiver<T>,
    errors: Receiver<StreamError>,
    done: Receiver<()>,
    errors_open: bool,
    /// Set when the producing worker could not be started.
    deferred: Option<StreamError>,
}

impl<T> Inlet<T> {
    /// Blocks until upstream offers an element or an error, closes, or the
    /// pipeline is cancelled.
    pub(crate) fn pull(&mut self) -> Pull<T> {
        if let Some(err) = self.deferred.take() {
            return Pull::Failed(err);
        }
        if matches!(self.done.try_recv(), Err(TryRecvError::Disconnected)) {
            return Pull::Cancelled;
        }

        loop {
            let step = if self.errors_open {
                select! {
                    recv(self.data) -> msg => Some(msg.map_or(Pull::Exhausted, Pull::Item)),
                    recv(self.errors) -> msg => msg.ok().map(Pull::Failed),
                    recv(self.done) -> _ => Some(Pull::Cancelled),
                }
            } else {
                select! {
                    recv(self.data) -> msg => Some(msg.map_or(Pull::Exhausted, Pull::Item)),
                    recv(self.done) -> _ => Some(Pull::Cancelled),
                }
            };

            match step {
                Some(pull) => return pull,
                // The error conduit closed first; any error was already delivered.
                None => self.errors_open = false,
            }
        }
    }
}

/// The producing end of a stage, owned by its worker thread.
///
/// Dropping it closes both conduits.
pub(crate) struct Outlet<T> {
    data: Sender<T>,
    errors: Sender<StreamError>,
    done: Receiver<()>,
}

impl<T> Outlet<T> {
    /// Hands one element downstream.
    ///
    /// Returns false if the pipeline was cancelled or the consumer is gone;
    /// the worker must stop in that case.
    pub(crate) fn emit(&self, item: T) -> bool {
        select! {
            send(self.data, item) -> res => res.is_ok(),
            recv(self.done) -> _ => false,
        }
    }

    /// Hands an error downstream unless the pipeline is cancelled first.
    /// The worker must stop afterwards.
    pub(crate) fn fail(&self, err: StreamError) {
        select! {
            send(self.errors, err) -> _ => {},
            recv(self.done) -> _ => {},
        }
    }
}

/// Runs a user callback, converting a panic into [`StreamError::Panicked`].
pub(crate) fn guard_call<R>(stage: &str, f: impl FnOnce() -> R) -> Result<R> {
    panic::catch_unwind(AssertUnwindSafe(f)).map_err(|payload| {
        let err = StreamError::from_panic(stage, payload.as_ref());
        warn!(stage, error = %err, "Recovered panic in user callback");
        err
    })
}

/// Starts a stage worker thread running `body` and returns the inlet
/// downstream reads from.
///
/// `body` returns why it stopped; its outlet is dropped right after, closing
/// the conduits.
pub(crate) fn spawn_stage<T, F>(ctx: &Arc<PipelineContext>, kind: StageKind, body: F) -> Inlet<T>
where
    T: Send + 'static,
    F: FnOnce(&Outlet<T>, &mut StageSpan) -> StageExit + Send + 'static,
{
    let (data_tx, data_rx) = bounded(0);
    let (errors_tx, errors_rx) = bounded(0);
    let done = ctx.signal.done();
    let outlet = Outlet {
        data: data_tx,
        errors: errors_tx,
        done: done.clone(),
    };

    let index = ctx.next_stage_index();
    let stage = format!("{index}-{kind}");
    let pipeline = ctx.id;
    let trace_elements = ctx.config.trace_elements;
    let guard = ctx.workers.register();

    let mut builder = thread::Builder::new().name(ctx.config.thread_name(index, &kind.to_string()));
    if let Some(size) = ctx.config.stack_size {
        builder = builder.stack_size(size);
    }

    let spawned = builder.spawn(move || {
        let _guard = guard;
        let outlet = outlet;
        let mut span = StageSpan::start(pipeline, stage, kind, trace_elements);
        let exit = body(&outlet, &mut span);
        span.finish(exit);
    });

    let deferred = match spawned {
        Ok(_detached) => None,
        Err(e) => {
            warn!(pipeline = %ctx.id, kind = %kind, error = %e, "Failed to spawn stage worker");
            Some(StreamError::Spawn(e.to_string()))
        }
    };

    Inlet {
        data: data_rx,
        errors: errors_rx,
        done,
        errors_open: true,
        deferred,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StreamConfig;
    use std::time::Duration;

    #[test]
    fn test_guard_call_passes_value() {
        assert_eq!(guard_call("stage", || 5).unwrap(), 5);
    }

    #[test]
    fn test_guard_call_recovers_panic() {
        let err = guard_call("7-map", || -> i32 { panic!("bad input") }).unwrap_err();
        match err {
            StreamError::Panicked { stage, message } => {
                assert_eq!(stage, "7-map");
                assert_eq!(message, "bad input");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_stage_delivers_then_closes() {
        let ctx = PipelineContext::new(StreamConfig::default());
        let mut inlet = spawn_stage(&ctx, StageKind::Values, |outlet, span| {
            for i in 0..3 {
                if !outlet.emit(i) {
                    return StageExit::Cancelled;
                }
                span.record_forward();
            }
            StageExit::Exhausted
        });

        let mut seen = Vec::new();
        loop {
            match inlet.pull() {
                Pull::Item(i) => seen.push(i),
                Pull::Exhausted => break,
                other => panic!("unexpected pull: {other:?}"),
            }
        }
        assert_eq!(seen, vec![0, 1, 2]);
        assert!(ctx.workers.wait_idle(Duration::from_secs(5)));
    }

    #[test]
    fn test_stage_error_is_delivered_once() {
        let ctx = PipelineContext::new(StreamConfig::default());
        let mut inlet = spawn_stage::<i32, _>(&ctx, StageKind::Map, |outlet, _span| {
            outlet.fail(StreamError::msg("boom"));
            StageExit::Failed
        });

        match inlet.pull() {
            Pull::Failed(err) => assert_eq!(err.to_string(), "boom"),
            other => panic!("unexpected pull: {other:?}"),
        }
        assert!(matches!(inlet.pull(), Pull::Exhausted));
    }

    #[test]
    fn test_cancel_unblocks_sender() {
        let ctx = PipelineContext::new(StreamConfig::default());
        let _inlet = spawn_stage(&ctx, StageKind::Values, |outlet, _span| {
            // Nobody reads; only cancellation can release this send.
            if outlet.emit(1) {
                StageExit::Exhausted
            } else {
                StageExit::Cancelled
            }
        });

        thread::sleep(Duration::from_millis(20));
        assert_eq!(ctx.workers.active(), 1);

        ctx.cancel("test");
        assert!(ctx.workers.wait_idle(Duration::from_secs(5)));
    }

    #[test]
    fn test_pull_after_cancel_reports_cancelled() {
        let ctx = PipelineContext::new(StreamConfig::default());
        let mut inlet = spawn_stage(&ctx, StageKind::Values, |outlet, _span| {
            let _ = outlet.emit(1);
            StageExit::Cancelled
        });

        ctx.cancel("test");
        assert!(matches!(inlet.pull(), Pull::Cancelled));
        assert!(ctx.workers.wait_idle(Duration::from_secs(5)));
    }
}
