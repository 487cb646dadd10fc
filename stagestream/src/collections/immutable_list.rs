//! Copy-on-write list that can be shared freely between threads.

use super::cursor::{Collection, Cursor, CursorExt};
use super::functions::Comparator;
use crate::errors::{Result, StreamError};
use std::fmt;
use std::sync::Arc;

/// An ordered list that never changes once built.
///
/// Every `with_*` method returns a new list and leaves `self` untouched.
/// Clones share storage, so handing a list to another thread or a stream is
/// cheap.
pub struct ImmutableList<T> {
    data: Arc<[T]>,
}

impl<T: Clone + PartialEq> ImmutableList<T> {
    /// Creates an empty list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a list from `data`.
    #[must_use]
    pub fn from_vec(data: Vec<T>) -> Self {
        Self { data: data.into() }
    }

    /// Returns the element at `index`.
    pub fn get(&self, index: usize) -> Result<&T> {
        self.data.get(index).ok_or(StreamError::OutOfBounds)
    }

    /// Returns the index of the first element equal to `element`.
    pub fn index_of(&self, element: &T) -> Result<usize> {
        self.data
            .iter()
            .position(|e| e == element)
            .ok_or(StreamError::ElementNotFound)
    }

    /// Returns the index of the last element equal to `element`.
    pub fn last_index_of(&self, element: &T) -> Result<usize> {
        self.data
            .iter()
            .rposition(|e| e == element)
            .ok_or(StreamError::ElementNotFound)
    }

    /// Copies the elements in `from..to` into a new list.
    pub fn sub_list(&self, from: usize, to: usize) -> Result<Self> {
        if from > to || to > self.data.len() {
            return Err(StreamError::OutOfBounds);
        }
        Ok(Self {
            data: self.data[from..to].into(),
        })
    }

    /// Returns a copy with `element` appended.
    #[must_use]
    pub fn with_added(&self, element: T) -> Self {
        let mut data = self.data.to_vec();
        data.push(element);
        Self::from_vec(data)
    }

    /// Returns a copy with every element of `other` appended, in its cursor
    /// order. A cursor error is returned instead of a partial copy.
    pub fn with_added_all<C: Collection<T>>(&self, other: &C) -> Result<Self> {
        let mut data = Vec::with_capacity(self.data.len() + other.len());
        data.extend_from_slice(&self.data);
        other.cursor().for_each_remaining(|e| {
            data.push(e);
            Ok(())
        })?;
        Ok(Self::from_vec(data))
    }

    /// Returns a copy with `element` inserted at `index`.
    pub fn with_added_at(&self, index: usize, element: T) -> Result<Self> {
        if index > self.data.len() {
            return Err(StreamError::OutOfBounds);
        }
        let mut data = self.data.to_vec();
        data.insert(index, element);
        Ok(Self::from_vec(data))
    }

    /// Returns a copy with the element at `index` replaced.
    pub fn with_set(&self, index: usize, element: T) -> Result<Self> {
        if index >= self.data.len() {
            return Err(StreamError::OutOfBounds);
        }
        let mut data = self.data.to_vec();
        data[index] = element;
        Ok(Self::from_vec(data))
    }

    /// Returns a sorted copy. The sort is stable.
    #[must_use]
    pub fn with_sorted(&self, comparator: &Comparator<T>) -> Self {
        let mut data = self.data.to_vec();
        data.sort_by(|a, b| comparator(a, b));
        Self::from_vec(data)
    }

    /// Returns a copy without any element equal to `element`.
    #[must_use]
    pub fn with_removed(&self, element: &T) -> Self {
        self.with_removed_if(|e| e == element)
    }

    /// Returns a copy without the element at `index`.
    pub fn with_removed_at(&self, index: usize) -> Result<Self> {
        if index >= self.data.len() {
            return Err(StreamError::OutOfBounds);
        }
        let mut data = self.data.to_vec();
        data.remove(index);
        Ok(Self::from_vec(data))
    }

    /// Returns a copy without the elements contained in `other`.
    #[must_use]
    pub fn with_removed_all<C: Collection<T>>(&self, other: &C) -> Self {
        self.with_removed_if(|e| other.contains(e))
    }

    /// Returns a copy without the elements `predicate` accepts.
    #[must_use]
    pub fn with_removed_if<P: FnMut(&T) -> bool>(&self, mut predicate: P) -> Self {
        self.data.iter().filter(|e| !predicate(e)).cloned().collect()
    }

    /// Returns a copy holding only the elements contained in `other`.
    #[must_use]
    pub fn with_retained_all<C: Collection<T>>(&self, other: &C) -> Self {
        self.with_removed_if(|e| !other.contains(e))
    }

    /// Returns an empty list.
    #[must_use]
    pub fn with_cleared(&self) -> Self {
        Self::default()
    }

    /// Borrows the elements as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// Iterates over the elements by reference.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.data.iter()
    }
}

/// Cursor over an [`ImmutableList`]. Shares the list's storage.
#[derive(Debug)]
pub struct ImmutableCursor<T> {
    data: Arc<[T]>,
    next: usize,
}

impl<T: Clone> Cursor<T> for ImmutableCursor<T> {
    fn has_next(&self) -> bool {
        self.next < self.data.len()
    }

    fn next(&mut self) -> Result<T> {
        let element = self
            .data
            .get(self.next)
            .cloned()
            .ok_or(StreamError::OutOfBounds)?;
        self.next += 1;
        Ok(element)
    }
}

impl<T> Collection<T> for ImmutableList<T>
where
    T: Clone + PartialEq + Send + Sync + 'static,
{
    type Cursor = ImmutableCursor<T>;

    fn cursor(&self) -> ImmutableCursor<T> {
        ImmutableCursor {
            data: Arc::clone(&self.data),
            next: 0,
        }
    }

    fn contains(&self, element: &T) -> bool {
        self.data.contains(element)
    }

    fn len(&self) -> usize {
        self.data.len()
    }

    fn to_vec(&self) -> Vec<T> {
        self.data.to_vec()
    }
}

impl<T> Clone for ImmutableList<T> {
    fn clone(&self) -> Self {
        Self {
            data: Arc::clone(&self.data),
        }
    }
}

impl<T> Default for ImmutableList<T> {
    fn default() -> Self {
        Self {
            data: Arc::from(Vec::new()),
        }
    }
}

impl<T: PartialEq> PartialEq for ImmutableList<T> {
    fn eq(&self, other: &Self) -> bool {
        self.data == other.data
    }
}

impl<T: Eq> Eq for ImmutableList<T> {}

impl<T: fmt::Debug> fmt::Debug for ImmutableList<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.data.iter()).finish()
    }
}

impl<T> From<Vec<T>> for ImmutableList<T> {
    fn from(data: Vec<T>) -> Self {
        Self { data: data.into() }
    }
}

impl<T> FromIterator<T> for ImmutableList<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            data: iter.into_iter().collect(),
        }
    }
}

impl<T: fmt::Display> fmt::Display for ImmutableList<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, e) in self.data.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{e}")?;
        }
        write!(f, "]")
    }
}
