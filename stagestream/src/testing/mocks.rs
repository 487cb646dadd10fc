//! Test doubles for stream sources and callbacks.

use crate::collections::{Collection, Cursor};
use crate::errors::{Result, StreamError};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// A cursor that replays a fixed script of reads.
///
/// Each step is returned by one call to `next`, errors included. Once the
/// script runs out the cursor reports exhaustion.
#[derive(Debug)]
pub struct ScriptedCursor<T> {
    steps: VecDeque<Result<T>>,
    reads: Arc<AtomicUsize>,
}

impl<T> ScriptedCursor<T> {
    /// Creates a cursor over `steps`.
    pub fn new(steps: impl IntoIterator<Item = Result<T>>) -> Self {
        Self {
            steps: steps.into_iter().collect(),
            reads: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Creates a cursor that yields `items` and then ends.
    pub fn of(items: impl IntoIterator<Item = T>) -> Self {
        Self::new(items.into_iter().map(Ok))
    }

    /// Returns a handle to the number of `next` calls, usable after the
    /// cursor has moved into a stream.
    #[must_use]
    pub fn read_counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.reads)
    }
}

impl<T> Cursor<T> for ScriptedCursor<T> {
    fn has_next(&self) -> bool {
        !self.steps.is_empty()
    }

    fn next(&mut self) -> Result<T> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.steps
            .pop_front()
            .unwrap_or(Err(StreamError::OutOfBounds))
    }
}

/// A collection whose cursors replay a fixed script, errors included.
///
/// Element queries (`contains`, `len`, `to_vec`) only see the `Ok` steps.
#[derive(Debug, Clone)]
pub struct ScriptedCollection<T> {
    steps: Vec<Result<T>>,
}

impl<T> ScriptedCollection<T> {
    /// Creates a collection whose every cursor replays `steps`.
    pub fn new(steps: impl IntoIterator<Item = Result<T>>) -> Self {
        Self {
            steps: steps.into_iter().collect(),
        }
    }

    fn elements(&self) -> impl Iterator<Item = &T> + '_ {
        self.steps.iter().filter_map(|step| step.as_ref().ok())
    }
}

impl<T: Clone + PartialEq + Send + 'static> Collection<T> for ScriptedCollection<T> {
    type Cursor = ScriptedCursor<T>;

    fn cursor(&self) -> ScriptedCursor<T> {
        ScriptedCursor::new(self.steps.clone())
    }

    fn contains(&self, element: &T) -> bool {
        self.elements().any(|e| e == element)
    }

    fn len(&self) -> usize {
        self.elements().count()
    }

    fn to_vec(&self) -> Vec<T> {
        self.elements().cloned().collect()
    }
}

/// Counts invocations of wrapped callbacks. Clones share one count.
#[derive(Debug, Clone, Default)]
pub struct CallCounter {
    calls: Arc<AtomicUsize>,
}

impl CallCounter {
    /// Creates a counter at zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of calls recorded so far.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Wraps a predicate so each evaluation is counted.
    pub fn predicate<T, P>(&self, mut predicate: P) -> impl FnMut(&T) -> bool + Send + 'static
    where
        T: ?Sized + 'static,
        P: FnMut(&T) -> bool + Send + 'static,
    {
        let calls = Arc::clone(&self.calls);
        move |item| {
            calls.fetch_add(1, Ordering::SeqCst);
            predicate(item)
        }
    }

    /// Wraps a mapping function so each call is counted.
    pub fn function<T, U, F>(&self, mut f: F) -> impl FnMut(T) -> Result<U> + Send + 'static
    where
        T: 'static,
        U: 'static,
        F: FnMut(T) -> Result<U> + Send + 'static,
    {
        let calls = Arc::clone(&self.calls);
        move |item| {
            calls.fetch_add(1, Ordering::SeqCst);
            f(item)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collections::CursorExt;

    #[test]
    fn test_scripted_cursor_replays_steps() {
        let mut cursor = ScriptedCursor::new(vec![Ok(1), Err(StreamError::KeyNotFound), Ok(3)]);
        let reads = cursor.read_counter();

        assert_eq!(cursor.next().unwrap(), 1);
        assert!(cursor.next().is_err());
        assert!(cursor.has_next());
        assert_eq!(cursor.next().unwrap(), 3);
        assert!(!cursor.has_next());
        assert!(cursor.next().unwrap_err().is_out_of_bounds());
        assert_eq!(reads.load(Ordering::SeqCst), 4);
    }

    #[test]
    fn test_scripted_cursor_for_each_remaining() {
        let mut cursor = ScriptedCursor::of(vec!["a", "b"]);
        let mut seen = Vec::new();
        cursor
            .for_each_remaining(|s| {
                seen.push(s);
                Ok(())
            })
            .unwrap();
        assert_eq!(seen, vec!["a", "b"]);
    }

    #[test]
    fn test_scripted_collection_streams_its_error() {
        let faulty = ScriptedCollection::new(vec![Ok(1), Err(StreamError::msg("disk gone")), Ok(3)]);
        assert_eq!(faulty.len(), 2);
        assert!(faulty.contains(&3));

        let (values, err) = faulty.stream().to_vec_partial();
        assert_eq!(values, vec![1]);
        assert_eq!(err.unwrap().to_string(), "disk gone");
    }

    #[test]
    fn test_call_counter_shares_count() {
        let counter = CallCounter::new();
        let mut even = counter.predicate(|n: &i32| n % 2 == 0);
        let mut double = counter.clone().function(|n: i32| Ok(n * 2));

        assert!(even(&2));
        assert!(!even(&3));
        assert_eq!(double(4).unwrap(), 8);
        assert_eq!(counter.calls(), 3);
    }
}
