//! Pull-style consumption of a stream.

use super::context::{PipelineContext, PipelineMonitor};
use super::stage::{Inlet, Pull};
use super::Stream;
use crate::errors::{Result, StreamError};
use parking_lot::Mutex;
use std::fmt;
use std::sync::Arc;

struct IterState<T> {
    inlet: Inlet<T>,
    lookahead: Option<T>,
    last_error: Option<StreamError>,
    finished: bool,
}

/// A blocking pull iterator over the last stage of a pipeline.
///
/// Every method takes `&self`, so one iterator can be shared between
/// threads. Exhaustion, an error, [`close`](Self::close) or dropping the
/// iterator closes the pipeline's cancellation signal.
pub struct StreamIterator<T> {
    state: Mutex<IterState<T>>,
    ctx: Arc<PipelineContext>,
}

impl<T: Send + 'static> Stream<T> {
    /// Converts the stream into a pull iterator.
    pub fn iterator(self) -> StreamIterator<T> {
        let (inlet, ctx) = self.into_parts();
        StreamIterator {
            state: Mutex::new(IterState {
                inlet,
                lookahead: None,
                last_error: None,
                finished: false,
            }),
            ctx,
        }
    }
}

impl<T> StreamIterator<T> {
    /// Returns true if [`next`](Self::next) will yield an element.
    ///
    /// Blocks until upstream offers one, ends, fails, or the pipeline is
    /// cancelled. An element read here is held until the next call to
    /// `next`. Returns false once an error has been observed; see
    /// [`last_error`](Self::last_error).
    pub fn has_next(&self) -> bool {
        let mut state = self.state.lock();
        if state.lookahead.is_some() {
            return true;
        }
        if state.finished {
            return false;
        }

        match state.inlet.pull() {
            Pull::Item(item) => {
                state.lookahead = Some(item);
                true
            }
            Pull::Exhausted => {
                self.finish(&mut state, "iterator exhausted");
                false
            }
            Pull::Failed(err) => {
                state.last_error = Some(err);
                self.finish(&mut state, "iterator observed an error");
                false
            }
            Pull::Cancelled => {
                state.finished = true;
                false
            }
        }
    }

    /// Returns the next element.
    ///
    /// Once an error has been observed every call returns that error. After
    /// exhaustion or cancellation every call returns
    /// [`StreamError::OutOfBounds`].
    // Takes `&self` so one iterator can be drained from several threads,
    // which `Iterator::next` cannot express; `into_iter` gives the std form.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&self) -> Result<T> {
        let mut state = self.state.lock();
        if let Some(item) = state.lookahead.take() {
            return Ok(item);
        }
        if let Some(err) = &state.last_error {
            return Err(err.clone());
        }
        if state.finished {
            return Err(StreamError::OutOfBounds);
        }

        match state.inlet.pull() {
            Pull::Item(item) => Ok(item),
            Pull::Exhausted => {
                self.finish(&mut state, "iterator exhausted");
                Err(StreamError::OutOfBounds)
            }
            Pull::Cancelled => {
                state.finished = true;
                Err(StreamError::OutOfBounds)
            }
            Pull::Failed(err) => {
                state.last_error = Some(err.clone());
                self.finish(&mut state, "iterator observed an error");
                Err(err)
            }
        }
    }

    /// Closes the pipeline. Idempotent, and never waits on a caller blocked
    /// in [`has_next`](Self::has_next) or [`next`](Self::next); that caller
    /// is released instead.
    ///
    /// Returns true if this call performed the close.
    pub fn close(&self) -> bool {
        self.ctx.cancel("iterator closed")
    }

    /// Runs `consumer` on every remaining element.
    ///
    /// Stops at the first consumer error or stream error and returns it.
    pub fn for_each_remaining<F>(&self, mut consumer: F) -> Result<()>
    where
        F: FnMut(T) -> Result<()>,
    {
        while self.has_next() {
            consumer(self.next()?)?;
        }
        self.last_error().map_or(Ok(()), Err)
    }

    /// Returns the error that ended iteration, if any.
    pub fn last_error(&self) -> Option<StreamError> {
        self.state.lock().last_error.clone()
    }

    /// Returns a monitor for the pipeline behind this iterator.
    pub fn monitor(&self) -> PipelineMonitor {
        self.ctx.monitor()
    }

    fn finish(&self, state: &mut IterState<T>, reason: &str) {
        state.finished = true;
        self.ctx.cancel(reason);
    }
}

impl<T> Drop for StreamIterator<T> {
    fn drop(&mut self) {
        self.ctx.cancel("iterator dropped");
    }
}

impl<T> fmt::Debug for StreamIterator<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StreamIterator")
            .field("pipeline", &self.ctx)
            .finish_non_exhaustive()
    }
}

/// A std [`Iterator`] adapter yielding `Ok` elements, then the terminating
/// error once if there was one.
#[derive(Debug)]
pub struct IntoIter<T> {
    inner: StreamIterator<T>,
    reported_error: bool,
}

impl<T> Iterator for IntoIter<T> {
    type Item = Result<T>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.inner.has_next() {
            return Some(self.inner.next());
        }
        if self.reported_error {
            return None;
        }
        self.reported_error = true;
        self.inner.last_error().map(Err)
    }
}

impl<T> IntoIterator for StreamIterator<T> {
    type Item = Result<T>;
    type IntoIter = IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter {
            inner: self,
            reported_error: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorKind;
    use pretty_assertions::assert_eq;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn test_has_next_is_idempotent() {
        let it = Stream::of(vec![1, 2]).iterator();
        assert!(it.has_next());
        assert!(it.has_next());
        assert_eq!(it.next().unwrap(), 1);
        assert_eq!(it.next().unwrap(), 2);
        assert!(!it.has_next());
    }

    #[test]
    fn test_next_after_exhaustion_is_out_of_bounds() {
        let it = Stream::of(vec![1]).iterator();
        assert_eq!(it.next().unwrap(), 1);
        for _ in 0..3 {
            assert!(it.next().unwrap_err().is_out_of_bounds());
        }
        assert!(it.monitor().wait_for_shutdown(Duration::from_secs(5)));
    }

    #[test]
    fn test_error_is_sticky() {
        let it = Stream::of(vec![1, 2])
            .map(|n| if n == 1 { Err(StreamError::msg("first")) } else { Ok(n) })
            .iterator();

        assert!(!it.has_next());
        assert_eq!(it.last_error().unwrap().to_string(), "first");
        assert_eq!(it.next().unwrap_err().to_string(), "first");
        assert_eq!(it.next().unwrap_err().to_string(), "first");
    }

    #[test]
    fn test_close_releases_blocked_has_next() {
        let (tx, rx) = crossbeam_channel::bounded::<i32>(0);
        // The source blocks until `tx` is dropped.
        let it = Arc::new(Stream::of(rx.into_iter()).iterator());
        let monitor = it.monitor();

        let waiter = {
            let it = Arc::clone(&it);
            thread::spawn(move || it.has_next())
        };
        thread::sleep(Duration::from_millis(20));

        assert!(it.close());
        assert!(!it.close());
        assert!(!waiter.join().unwrap());
        assert_eq!(it.next().unwrap_err().kind(), ErrorKind::OutOfBounds);
        drop(tx);
        assert!(monitor.wait_for_shutdown(Duration::from_secs(5)));
    }

    #[test]
    fn test_for_each_remaining_visits_all() {
        let it = Stream::of(1..=4).iterator();
        assert_eq!(it.next().unwrap(), 1);

        let mut rest = Vec::new();
        it.for_each_remaining(|n| {
            rest.push(n);
            Ok(())
        })
        .unwrap();
        assert_eq!(rest, vec![2, 3, 4]);
    }

    #[test]
    fn test_for_each_remaining_stops_on_consumer_error() {
        let it = Stream::of(1..=4).iterator();
        let err = it
            .for_each_remaining(|n| if n == 2 { Err(StreamError::KeyNotFound) } else { Ok(()) })
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::KeyNotFound);
    }

    #[test]
    fn test_into_iter_yields_error_once() {
        let items: Vec<_> = Stream::of(vec![1, 2, 3])
            .map(|n| if n == 3 { Err(StreamError::ElementNotFound) } else { Ok(n) })
            .into_iter()
            .collect();

        assert_eq!(items.len(), 3);
        assert_eq!(*items[0].as_ref().unwrap(), 1);
        assert_eq!(*items[1].as_ref().unwrap(), 2);
        assert!(items[2].as_ref().unwrap_err().is_not_found());
    }

    #[test]
    fn test_drop_closes_pipeline() {
        let it = Stream::of(0..).iterator();
        let monitor = it.monitor();
        assert_eq!(it.next().unwrap(), 0);
        drop(it);
        assert!(monitor.is_cancelled());
        assert!(monitor.wait_for_shutdown(Duration::from_secs(5)));
    }
}
