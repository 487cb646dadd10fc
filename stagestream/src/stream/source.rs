//! Source stages: fixed values and collection cursors.

use super::context::PipelineContext;
use super::stage::{guard_call, spawn_stage};
use super::Stream;
use crate::collections::{Collection, Cursor};
use crate::config::StreamConfig;
use crate::core::{StageExit, StageKind};
use crate::errors::StreamError;

impl<T: Send + 'static> Stream<T> {
    /// Starts a pipeline that emits `elements` in order and then closes.
    ///
    /// An empty input closes immediately.
    pub fn of<I>(elements: I) -> Self
    where
        I: IntoIterator<Item = T>,
        I::IntoIter: Send + 'static,
    {
        Self::of_with_config(elements, StreamConfig::default())
    }

    /// Like [`Stream::of`], with an explicit pipeline configuration.
    pub fn of_with_config<I>(elements: I, config: StreamConfig) -> Self
    where
        I: IntoIterator<Item = T>,
        I::IntoIter: Send + 'static,
    {
        let ctx = PipelineContext::new(config);
        let mut elements = elements.into_iter();

        let inlet = spawn_stage(&ctx, StageKind::Values, move |outlet, span| loop {
            let next = match guard_call(span.stage(), || elements.next()) {
                Ok(next) => next,
                Err(e) => {
                    outlet.fail(e);
                    return StageExit::Failed;
                }
            };
            let Some(item) = next else {
                return StageExit::Exhausted;
            };
            if !outlet.emit(item) {
                return StageExit::Cancelled;
            }
            span.record_forward();
        });

        Self::from_parts(inlet, ctx)
    }

    /// Starts a pipeline over a snapshot cursor of `collection`.
    pub fn from_collection<C>(collection: &C) -> Self
    where
        C: Collection<T> + ?Sized,
    {
        Self::from_cursor(collection.cursor(), StreamConfig::default())
    }

    /// Starts a pipeline that drains `cursor`.
    ///
    /// A cursor reporting [`StreamError::OutOfBounds`] ends the stream like
    /// ordinary exhaustion. Any other cursor error is forwarded once and the
    /// source stops.
    pub fn from_cursor<C>(cursor: C, config: StreamConfig) -> Self
    where
        C: Cursor<T> + Send + 'static,
    {
        let ctx = PipelineContext::new(config);
        let mut cursor = cursor;

        let inlet = spawn_stage(&ctx, StageKind::Collection, move |outlet, span| loop {
            let step = guard_call(span.stage(), || {
                if cursor.has_next() {
                    Some(cursor.next())
                } else {
                    None
                }
            });

            match step {
                Ok(None | Some(Err(StreamError::OutOfBounds))) => return StageExit::Exhausted,
                Ok(Some(Ok(item))) => {
                    if !outlet.emit(item) {
                        return StageExit::Cancelled;
                    }
                    span.record_forward();
                }
                Ok(Some(Err(e))) | Err(e) => {
                    outlet.fail(e);
                    return StageExit::Failed;
                }
            }
        });

        Self::from_parts(inlet, ctx)
    }
}
