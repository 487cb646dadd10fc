//! Function helper types shared by collections and streams.

use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

/// A comparator deciding the order of two elements.
pub type Comparator<T> = dyn Fn(&T, &T) -> Ordering + Send + Sync;

/// A reusable boolean test over elements.
///
/// Predicates combine with [`Predicate::negate`], [`Predicate::and`] and
/// [`Predicate::or`]. Clones share the underlying function.
pub struct Predicate<T> {
    test: Arc<dyn Fn(&T) -> bool + Send + Sync>,
}

impl<T: 'static> Predicate<T> {
    /// Wraps a function as a predicate.
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        Self { test: Arc::new(f) }
    }

    /// Evaluates the predicate.
    #[must_use]
    pub fn test(&self, element: &T) -> bool {
        (self.test)(element)
    }

    /// Returns a predicate with the opposite result.
    #[must_use]
    pub fn negate(&self) -> Self {
        let inner = self.test.clone();
        Self::new(move |e| !inner(e))
    }

    /// Returns a predicate that holds when both hold. Short-circuits.
    #[must_use]
    pub fn and(&self, other: &Self) -> Self {
        let (a, b) = (self.test.clone(), other.test.clone());
        Self::new(move |e| a(e) && b(e))
    }

    /// Returns a predicate that holds when either holds. Short-circuits.
    #[must_use]
    pub fn or(&self, other: &Self) -> Self {
        let (a, b) = (self.test.clone(), other.test.clone());
        Self::new(move |e| a(e) || b(e))
    }

    /// Converts into a plain closure, e.g. for [`crate::stream::Stream::filter`].
    pub fn into_fn(self) -> impl Fn(&T) -> bool + Send + Sync + 'static {
        move |e| (self.test)(e)
    }
}

impl<T> Clone for Predicate<T> {
    fn clone(&self) -> Self {
        Self {
            test: self.test.clone(),
        }
    }
}

impl<T> fmt::Debug for Predicate<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Predicate").finish_non_exhaustive()
    }
}
