//! Filter and map stages.

use super::stage::{guard_call, spawn_stage, Pull};
use super::Stream;
use crate::core::{StageExit, StageKind};
use crate::errors::Result;

impl<T: Send + 'static> Stream<T> {
    /// Keeps the elements `predicate` accepts, in order.
    ///
    /// Upstream errors pass through unchanged. A panicking predicate is
    /// reported as [`StreamError::Panicked`](crate::errors::StreamError::Panicked)
    /// and the stage stops.
    pub fn filter<P>(self, mut predicate: P) -> Self
    where
        P: FnMut(&T) -> bool + Send + 'static,
    {
        let (mut inlet, ctx) = self.into_parts();

        let downstream = spawn_stage(&ctx, StageKind::Filter, move |outlet, span| loop {
            match inlet.pull() {
                Pull::Item(item) => match guard_call(span.stage(), || predicate(&item)) {
                    Ok(true) => {
                        if !outlet.emit(item) {
                            return StageExit::Cancelled;
                        }
                        span.record_forward();
                    }
                    Ok(false) => {}
                    Err(e) => {
                        outlet.fail(e);
                        return StageExit::Failed;
                    }
                },
                Pull::Failed(e) => {
                    outlet.fail(e);
                    return StageExit::Failed;
                }
                Pull::Exhausted => return StageExit::Exhausted,
                Pull::Cancelled => return StageExit::Cancelled,
            }
        });

        Self::from_parts(downstream, ctx)
    }

    /// Applies `f` to each element, in order.
    ///
    /// The first error `f` returns is forwarded downstream and the stage
    /// stops; elements after it are not processed.
    pub fn map<U, F>(self, mut f: F) -> Stream<U>
    where
        U: Send + 'static,
        F: FnMut(T) -> Result<U> + Send + 'static,
    {
        let (mut inlet, ctx) = self.into_parts();

        let downstream = spawn_stage(&ctx, StageKind::Map, move |outlet, span| loop {
            match inlet.pull() {
                Pull::Item(item) => match guard_call(span.stage(), || f(item)) {
                    Ok(Ok(mapped)) => {
                        if !outlet.emit(mapped) {
                            return StageExit::Cancelled;
                        }
                        span.record_forward();
                    }
                    Ok(Err(e)) | Err(e) => {
                        outlet.fail(e);
                        return StageExit::Failed;
                    }
                },
                Pull::Failed(e) => {
                    outlet.fail(e);
                    return StageExit::Failed;
                }
                Pull::Exhausted => return StageExit::Exhausted,
                Pull::Cancelled => return StageExit::Cancelled,
            }
        });

        Stream::from_parts(downstream, ctx)
    }
}

/// Free-function form of [`Stream::map`].
pub fn map<T, U, F>(stream: Stream<T>, f: F) -> Stream<U>
where
    T: Send + 'static,
    U: Send + 'static,
    F: FnMut(T) -> Result<U> + Send + 'static,
{
    stream.map(f)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::{ErrorKind, StreamError};
    use crate::testing::CallCounter;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_filter_keeps_order() {
        let kept = Stream::of(1..=10).filter(|n| n % 3 == 0).to_vec().unwrap();
        assert_eq!(kept, vec![3, 6, 9]);
    }

    #[test]
    fn test_filter_rejecting_everything() {
        assert_eq!(Stream::of(1..=10).filter(|_| false).count().unwrap(), 0);
    }

    #[test]
    fn test_map_changes_type() {
        let words = map(Stream::of(vec![1, 22, 333]), |n: i32| Ok(n.to_string()))
            .to_vec()
            .unwrap();
        assert_eq!(words, vec!["1", "22", "333"]);
    }

    #[test]
    fn test_map_error_stops_stage() {
        let (values, err) = Stream::of(1..=5)
            .map(|n| {
                if n == 3 {
                    Err(StreamError::msg(format!("rejected {n}")))
                } else {
                    Ok(n)
                }
            })
            .to_vec_partial();

        assert_eq!(values, vec![1, 2]);
        assert_eq!(err.unwrap().to_string(), "rejected 3");
    }

    #[test]
    fn test_filter_passes_upstream_error_through() {
        let err = Stream::of(vec![1, 2])
            .map(|_| Err::<i32, _>(StreamError::KeyNotFound))
            .filter(|_| true)
            .count()
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::KeyNotFound);
    }

    #[test]
    fn test_filter_never_sees_elements_past_upstream_error() {
        let counter = CallCounter::new();
        let (values, err) = Stream::of(1..=10)
            .map(|n| {
                if n == 4 {
                    Err(StreamError::msg("broken at 4"))
                } else {
                    Ok(n)
                }
            })
            .filter(counter.predicate(|_: &i32| true))
            .to_vec_partial();

        assert_eq!(values, vec![1, 2, 3]);
        assert_eq!(err.unwrap().to_string(), "broken at 4");
        assert_eq!(counter.calls(), 3);
    }

    #[test]
    fn test_filter_panic_becomes_error() {
        let err = Stream::of(vec![1, 2, 3])
            .filter(|n| {
                assert_ne!(*n, 2, "predicate blew up");
                true
            })
            .to_vec()
            .unwrap_err();

        match err {
            StreamError::Panicked { stage, .. } => assert_eq!(stage, "1-filter"),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
