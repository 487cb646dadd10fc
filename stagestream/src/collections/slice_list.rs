//! Vec-backed ordered list.

use super::cursor::{Collection, Cursor, CursorExt, VecCursor};
use super::functions::Comparator;
use crate::errors::{Result, StreamError};
use std::fmt;

/// An ordered list that may hold repeated elements.
///
/// Not synchronized; wrap it in a lock for concurrent mutation. Cursors and
/// streams read from a snapshot, so later edits do not affect them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SliceList<T> {
    data: Vec<T>,
}

impl<T: Clone + PartialEq> SliceList<T> {
    /// Creates an empty list.
    #[must_use]
    pub const fn new() -> Self {
        Self { data: Vec::new() }
    }

    /// Takes ownership of an existing vector.
    #[must_use]
    pub const fn from_vec(data: Vec<T>) -> Self {
        Self { data }
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
        Ok(Self::from_vec(self.data[from..to].to_vec()))
    }

    /// Appends an element.
    pub fn add(&mut self, element: T) {
        self.data.push(element);
    }

    /// Appends every element of `other`, in its cursor order.
    ///
    /// If the cursor fails the list is left unchanged and the error is
    /// returned.
    pub fn add_all<C: Collection<T>>(&mut self, other: &C) -> Result<()> {
        let mut added = Vec::with_capacity(other.len());
        other.cursor().for_each_remaining(|e| {
            added.push(e);
            Ok(())
        })?;
        self.data.append(&mut added);
        Ok(())
    }

    /// Inserts an element at `index`, shifting later elements back.
    pub fn add_at(&mut self, index: usize, element: T) -> Result<()> {
        if index > self.data.len() {
            return Err(StreamError::OutOfBounds);
        }
        self.data.insert(index, element);
        Ok(())
    }

    /// Replaces the element at `index`, returning the old one.
    pub fn set(&mut self, index: usize, element: T) -> Result<T> {
        let slot = self.data.get_mut(index).ok_or(StreamError::OutOfBounds)?;
        Ok(std::mem::replace(slot, element))
    }

    /// Removes and returns the element at `index`.
    pub fn remove_at(&mut self, index: usize) -> Result<T> {
        if index >= self.data.len() {
            return Err(StreamError::OutOfBounds);
        }
        Ok(self.data.remove(index))
    }

    /// Removes every element equal to `element`.
    pub fn remove(&mut self, element: &T) {
        self.data.retain(|e| e != element);
    }

    /// Removes every element contained in `other`.
    pub fn remove_all<C: Collection<T>>(&mut self, other: &C) {
        self.data.retain(|e| !other.contains(e));
    }

    /// Removes every element for which `predicate` returns true.
    pub fn remove_if<P: FnMut(&T) -> bool>(&mut self, mut predicate: P) {
        self.data.retain(|e| !predicate(e));
    }

    /// Keeps only the elements contained in `other`.
    pub fn retain_all<C: Collection<T>>(&mut self, other: &C) {
        self.data.retain(|e| other.contains(e));
    }

    /// Sorts the list in place. The sort is stable.
    pub fn sort(&mut self, comparator: &Comparator<T>) {
        self.data.sort_by(|a, b| comparator(a, b));
    }

    /// Removes all elements.
    pub fn clear(&mut self) {
        self.data.clear();
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

    /// Returns a cursor that can replace or remove the elements it visits.
    pub fn cursor_mut(&mut self) -> ListCursorMut<'_, T> {
        ListCursorMut {
            data: &mut self.data,
            next: 0,
            current: None,
        }
    }
}

/// A cursor over a [`SliceList`] that edits the list in place.
///
/// [`set`](Self::set) and [`remove`](Self::remove) act on the element last
/// returned by `next`, and fail with [`StreamError::OutOfBounds`] before the
/// first `next` or after that element was removed.
#[derive(Debug)]
pub struct ListCursorMut<'a, T> {
    data: &'a mut Vec<T>,
    next: usize,
    current: Option<usize>,
}

impl<T> ListCursorMut<'_, T> {
    /// Replaces the current element, returning the old one.
    pub fn set(&mut self, element: T) -> Result<T> {
        let slot = self
            .current
            .and_then(|index| self.data.get_mut(index))
            .ok_or(StreamError::OutOfBounds)?;
        Ok(std::mem::replace(slot, element))
    }

    /// Removes the current element. The cursor continues with the element
    /// that followed it.
    pub fn remove(&mut self) -> Result<T> {
        let index = self.current.take().ok_or(StreamError::OutOfBounds)?;
        self.next = index;
        Ok(self.data.remove(index))
    }
}

impl<T: Clone> Cursor<T> for ListCursorMut<'_, T> {
    fn has_next(&self) -> bool {
        self.next < self.data.len()
    }

    fn next(&mut self) -> Result<T> {
        let element = self
            .data
            .get(self.next)
            .cloned()
            .ok_or(StreamError::OutOfBounds)?;
        self.current = Some(self.next);
        self.next += 1;
        Ok(element)
    }
}

impl<T: Clone + PartialEq + Send + 'static> Collection<T> for SliceList<T> {
    type Cursor = VecCursor<T>;

    fn cursor(&self) -> VecCursor<T> {
        VecCursor::new(self.data.clone())
    }

    fn contains(&self, element: &T) -> bool {
        self.data.contains(element)
    }

    fn len(&self) -> usize {
        self.data.len()
    }

    fn to_vec(&self) -> Vec<T> {
        self.data.clone()
    }
}

impl<T> Default for SliceList<T> {
    fn default() -> Self {
        Self { data: Vec::new() }
    }
}

impl<T> From<Vec<T>> for SliceList<T> {
    fn from(data: Vec<T>) -> Self {
        Self { data }
    }
}

impl<T> FromIterator<T> for SliceList<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            data: iter.into_iter().collect(),
        }
    }
}

impl<T: fmt::Display> fmt::Display for SliceList<T> {
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ScriptedCollection;
    use pretty_assertions::assert_eq;

    fn list(items: &[i32]) -> SliceList<i32> {
        SliceList::from_vec(items.to_vec())
    }

    #[test]
    fn test_get_and_bounds() {
        let l = list(&[10, 20, 30]);
        assert_eq!(*l.get(1).unwrap(), 20);
        assert!(l.get(3).unwrap_err().is_out_of_bounds());
    }

    #[test]
    fn test_index_of_and_last_index_of() {
        let l = list(&[1, 2, 1, 3]);
        assert_eq!(l.index_of(&1).unwrap(), 0);
        assert_eq!(l.last_index_of(&1).unwrap(), 2);
        assert!(l.index_of(&9).unwrap_err().is_not_found());
        assert!(l.last_index_of(&9).unwrap_err().is_not_found());
    }

    #[test]
    fn test_sub_list() {
        let l = list(&[1, 2, 3, 4]);
        assert_eq!(l.sub_list(1, 3).unwrap().as_slice(), &[2, 3]);
        assert_eq!(l.sub_list(0, 4).unwrap().len(), 4);
        assert!(l.sub_list(0, 0).unwrap().is_empty());
        assert!(l.sub_list(3, 2).unwrap_err().is_out_of_bounds());
        assert!(l.sub_list(0, 5).unwrap_err().is_out_of_bounds());
    }

    #[test]
    fn test_add_at() {
        let mut l = list(&[1, 3]);
        l.add_at(1, 2).unwrap();
        l.add_at(3, 4).unwrap();
        assert_eq!(l.as_slice(), &[1, 2, 3, 4]);
        assert!(l.add_at(9, 5).unwrap_err().is_out_of_bounds());
    }

    #[test]
    fn test_set_and_remove_at() {
        let mut l = list(&[1, 2, 3]);
        assert_eq!(l.set(0, 9).unwrap(), 1);
        assert_eq!(l.remove_at(1).unwrap(), 2);
        assert_eq!(l.as_slice(), &[9, 3]);
        assert!(l.set(2, 0).unwrap_err().is_out_of_bounds());
        assert!(l.remove_at(2).unwrap_err().is_out_of_bounds());
    }

    #[test]
    fn test_remove_removes_every_instance() {
        let mut l = list(&[1, 2, 1, 1, 3]);
        l.remove(&1);
        assert_eq!(l.as_slice(), &[2, 3]);
    }

    #[test]
    fn test_bulk_operations() {
        let mut l = list(&[1, 2, 3, 4, 5]);
        l.remove_all(&list(&[2, 4]));
        assert_eq!(l.as_slice(), &[1, 3, 5]);

        l.retain_all(&list(&[3, 5, 7]));
        assert_eq!(l.as_slice(), &[3, 5]);

        l.add_all(&list(&[6, 7])).unwrap();
        assert_eq!(l.as_slice(), &[3, 5, 6, 7]);

        l.remove_if(|e| e % 2 == 1);
        assert_eq!(l.as_slice(), &[6]);

        l.clear();
        assert!(l.is_empty());
    }

    #[test]
    fn test_add_all_surfaces_cursor_error() {
        let faulty = ScriptedCollection::new(vec![Ok(1), Err(StreamError::msg("disk gone")), Ok(3)]);
        let mut l = list(&[0]);

        let err = l.add_all(&faulty).unwrap_err();
        assert_eq!(err.to_string(), "disk gone");
        assert_eq!(l.as_slice(), &[0]);
    }

    #[test]
    fn test_add_all_stops_quietly_at_out_of_bounds() {
        let short = ScriptedCollection::new(vec![Ok(1), Err(StreamError::OutOfBounds), Ok(3)]);
        let mut l = list(&[0]);

        l.add_all(&short).unwrap();
        assert_eq!(l.as_slice(), &[0, 1]);
    }

    #[test]
    fn test_cursor_mut_edits_in_place() {
        let mut l = list(&[1, 2, 3, 4]);
        let mut cursor = l.cursor_mut();
        assert!(cursor.set(0).unwrap_err().is_out_of_bounds());

        while cursor.has_next() {
            let e = cursor.next().unwrap();
            if e % 2 == 0 {
                assert_eq!(cursor.remove().unwrap(), e);
                assert!(cursor.remove().unwrap_err().is_out_of_bounds());
            } else {
                assert_eq!(cursor.set(e * 10).unwrap(), e);
            }
        }
        assert_eq!(l.as_slice(), &[10, 30]);
    }

    #[test]
    fn test_sort_is_stable() {
        let mut l: SliceList<(i32, char)> =
            SliceList::from_vec(vec![(2, 'a'), (1, 'b'), (2, 'c'), (1, 'd')]);
        l.sort(&|a, b| a.0.cmp(&b.0));
        assert_eq!(l.as_slice(), &[(1, 'b'), (1, 'd'), (2, 'a'), (2, 'c')]);
    }

    #[test]
    fn test_cursor_is_a_snapshot() {
        let mut l = list(&[1, 2]);
        let mut cursor = l.cursor();
        l.add(3);

        assert_eq!(cursor.next().unwrap(), 1);
        assert_eq!(cursor.next().unwrap(), 2);
        assert!(!cursor.has_next());
    }

    #[test]
    fn test_display() {
        assert_eq!(list(&[1, 2, 3]).to_string(), "[1, 2, 3]");
        assert_eq!(list(&[]).to_string(), "[]");
    }

    #[test]
    fn test_stream_from_list() {
        let evens = list(&[1, 2, 3, 4])
            .stream()
            .filter(|e| e % 2 == 0)
            .to_vec()
            .unwrap();
        assert_eq!(evens, vec![2, 4]);
    }
}
