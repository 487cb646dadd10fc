//! Terminal operations. Each one consumes the stream, runs on the calling
//! thread, and closes the pipeline's cancellation signal before returning.

use super::context::PipelineContext;
use super::stage::{guard_call, Pull};
use super::Stream;
use crate::errors::{Result, StreamError};
use std::ops::ControlFlow;
use tracing::debug;

/// Closes the pipeline's signal when the terminal returns or unwinds.
struct CloseOnExit<'a> {
    ctx: &'a PipelineContext,
    operation: &'static str,
}

impl Drop for CloseOnExit<'_> {
    fn drop(&mut self) {
        if self.ctx.cancel(self.operation) {
            debug!(pipeline = %self.ctx.id, operation = self.operation, "Terminal operation finished");
        }
    }
}

impl<T: Send + 'static> Stream<T> {
    /// Pulls elements until `on_item` breaks or the stream ends.
    ///
    /// Returns `Some` with the break value, `None` on exhaustion.
    fn drive<R>(
        self,
        operation: &'static str,
        mut on_item: impl FnMut(T) -> Result<ControlFlow<R>>,
    ) -> Result<Option<R>> {
        let (mut inlet, ctx) = self.into_parts();
        let _close = CloseOnExit {
            ctx: &ctx,
            operation,
        };

        loop {
            match inlet.pull() {
                Pull::Item(item) => {
                    if let ControlFlow::Break(found) = on_item(item)? {
                        return Ok(Some(found));
                    }
                }
                Pull::Exhausted => return Ok(None),
                Pull::Failed(e) => return Err(e),
                Pull::Cancelled => return Err(ctx.cancelled_error()),
            }
        }
    }

    /// Returns true if every element satisfies `predicate`, stopping at the
    /// first that does not. An empty stream yields true.
    pub fn all_match<P>(self, mut predicate: P) -> Result<bool>
    where
        P: FnMut(&T) -> bool,
    {
        let found = self.drive("all_match", |item| {
            Ok(if guard_call("all_match", || predicate(&item))? {
                ControlFlow::Continue(())
            } else {
                ControlFlow::Break(false)
            })
        })?;
        Ok(found.unwrap_or(true))
    }

    /// Returns true at the first element satisfying `predicate`. An empty
    /// stream yields false.
    pub fn any_match<P>(self, mut predicate: P) -> Result<bool>
    where
        P: FnMut(&T) -> bool,
    {
        let found = self.drive("any_match", |item| {
            Ok(if guard_call("any_match", || predicate(&item))? {
                ControlFlow::Break(true)
            } else {
                ControlFlow::Continue(())
            })
        })?;
        Ok(found.unwrap_or(false))
    }

    /// Collects every element in order.
    pub fn to_vec(self) -> Result<Vec<T>> {
        match self.to_vec_partial() {
            (values, None) => Ok(values),
            (_, Some(err)) => Err(err),
        }
    }

    /// Collects elements in order, returning what was gathered before the
    /// first error alongside that error.
    pub fn to_vec_partial(self) -> (Vec<T>, Option<StreamError>) {
        let mut values = Vec::new();
        let outcome = self.drive::<()>("to_vec", |item| {
            values.push(item);
            Ok(ControlFlow::Continue(()))
        });
        (values, outcome.err())
    }

    /// Returns the first element.
    ///
    /// Fails with [`StreamError::ElementNotFound`] on an empty stream.
    pub fn find_first(self) -> Result<T> {
        self.drive("find_first", |item| Ok(ControlFlow::Break(item)))?
            .ok_or(StreamError::ElementNotFound)
    }

    /// Returns some element. Pipelines are sequential, so this is the first.
    pub fn find_any(self) -> Result<T> {
        self.find_first()
    }

    /// Counts the elements.
    pub fn count(self) -> Result<usize> {
        let mut seen = 0usize;
        self.drive::<()>("count", |_| {
            seen += 1;
            Ok(ControlFlow::Continue(()))
        })?;
        Ok(seen)
    }
}
