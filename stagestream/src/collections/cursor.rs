//! Sequential read cursors and the collection trait streams consume.

use crate::errors::{Result, StreamError};
use crate::stream::Stream;

/// A sequential read cursor over a collection.
pub trait Cursor<T> {
    /// Returns true if another element is available. Does not advance.
    fn has_next(&self) -> bool;

    /// Returns the next element and advances.
    ///
    /// Returns [`StreamError::OutOfBounds`] once no elements remain.
    fn next(&mut self) -> Result<T>;
}

impl<T, C: Cursor<T> + ?Sized> Cursor<T> for Box<C> {
    fn has_next(&self) -> bool {
        (**self).has_next()
    }

    fn next(&mut self) -> Result<T> {
        (**self).next()
    }
}

/// Helpers available on every [`Cursor`].
pub trait CursorExt<T>: Cursor<T> {
    /// Runs `consumer` on each remaining element until the cursor is
    /// exhausted or the consumer fails.
    ///
    /// Running out of elements mid-way is treated as ordinary exhaustion.
    fn for_each_remaining<F>(&mut self, mut consumer: F) -> Result<()>
    where
        F: FnMut(T) -> Result<()>,
    {
        while self.has_next() {
            match self.next() {
                Ok(element) => consumer(element)?,
                Err(StreamError::OutOfBounds) => return Ok(()),
                Err(e) => return Err(e),
            }
        }
        Ok(())
    }
}

impl<T, C: Cursor<T> + ?Sized> CursorExt<T> for C {}

/// A cursor over an owned snapshot of elements.
///
/// Collections hand these out so a stream source never touches the
/// collection's own storage.
#[derive(Debug, Clone)]
pub struct VecCursor<T> {
    items: std::vec::IntoIter<T>,
}

impl<T> VecCursor<T> {
    /// Creates a cursor over `items`, in order.
    #[must_use]
    pub fn new(items: Vec<T>) -> Self {
        Self {
            items: items.into_iter(),
        }
    }

    /// Returns the number of elements not yet read.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.items.len()
    }
}

impl<T> Cursor<T> for VecCursor<T> {
    fn has_next(&self) -> bool {
        self.items.len() != 0
    }

    fn next(&mut self) -> Result<T> {
        self.items.next().ok_or(StreamError::OutOfBounds)
    }
}

impl<T> From<Vec<T>> for VecCursor<T> {
    fn from(items: Vec<T>) -> Self {
        Self::new(items)
    }
}

/// A group of elements that can be read sequentially.
pub trait Collection<T> {
    /// The snapshot cursor type handed to readers.
    type Cursor: Cursor<T> + Send + 'static;

    /// Returns a cursor over the current elements.
    fn cursor(&self) -> Self::Cursor;

    /// Returns true if the collection holds `element`.
    fn contains(&self, element: &T) -> bool;

    /// Returns the number of elements.
    fn len(&self) -> usize;

    /// Returns true if there are no elements.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Copies the elements into a vector, in cursor order.
    fn to_vec(&self) -> Vec<T>;

    /// Starts a stream over the current elements.
    fn stream(&self) -> Stream<T>
    where
        T: Send + 'static,
        Self: Sized,
    {
        Stream::from_collection(self)
    }
}
