//! Hash-backed set.

use super::cursor::{Collection, Cursor, CursorExt, VecCursor};
use crate::errors::{Result, StreamError};
use std::collections::HashSet;
use std::fmt;
use std::hash::Hash;

/// A set holding each element at most once. Iteration order is unspecified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapSet<T: Eq + Hash> {
    data: HashSet<T>,
}

impl<T: Eq + Hash + Clone> MapSet<T> {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self {
            data: HashSet::new(),
        }
    }

    /// Adds an element. Returns false if it was already present.
    pub fn add(&mut self, element: T) -> bool {
        self.data.insert(element)
    }

    /// Adds every element of `other`.
    ///
    /// If the cursor fails the set is left unchanged and the error is
    /// returned.
    pub fn add_all<C: Collection<T>>(&mut self, other: &C) -> Result<()> {
        let mut added = Vec::with_capacity(other.len());
        other.cursor().for_each_remaining(|e| {
            added.push(e);
            Ok(())
        })?;
        self.data.extend(added);
        Ok(())
    }

    /// Removes an element, failing with [`StreamError::ElementNotFound`] if
    /// it is absent.
    pub fn remove(&mut self, element: &T) -> Result<()> {
        if self.data.remove(element) {
            Ok(())
        } else {
            Err(StreamError::ElementNotFound)
        }
    }

    /// Removes every element contained in `other`. Absent elements are ignored.
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

    /// Removes all elements.
    pub fn clear(&mut self) {
        self.data.clear();
    }

    /// Iterates over the elements by reference.
    pub fn iter(&self) -> std::collections::hash_set::Iter<'_, T> {
        self.data.iter()
    }

    /// Returns a cursor over a snapshot of the elements that can remove
    /// them from the set as it goes.
    pub fn cursor_mut(&mut self) -> SetCursorMut<'_, T> {
        let snapshot: Vec<T> = self.data.iter().cloned().collect();
        SetCursorMut {
            set: &mut self.data,
            snapshot: snapshot.into_iter(),
            current: None,
        }
    }
}

/// A cursor over a [`MapSet`] that can remove the element it last returned.
#[derive(Debug)]
pub struct SetCursorMut<'a, T: Eq + Hash> {
    set: &'a mut HashSet<T>,
    snapshot: std::vec::IntoIter<T>,
    current: Option<T>,
}

impl<T: Eq + Hash> SetCursorMut<'_, T> {
    /// Removes the element last returned by `next`.
    ///
    /// Fails with [`StreamError::OutOfBounds`] before the first `next` or
    /// when that element was already removed.
    pub fn remove(&mut self) -> Result<()> {
        let element = self.current.take().ok_or(StreamError::OutOfBounds)?;
        self.set.remove(&element);
        Ok(())
    }
}

impl<T: Eq + Hash + Clone> Cursor<T> for SetCursorMut<'_, T> {
    fn has_next(&self) -> bool {
        self.snapshot.len() != 0
    }

    fn next(&mut self) -> Result<T> {
        let element = self.snapshot.next().ok_or(StreamError::OutOfBounds)?;
        self.current = Some(element.clone());
        Ok(element)
    }
}

impl<T: Eq + Hash + Clone + Send + 'static> Collection<T> for MapSet<T> {
    type Cursor = VecCursor<T>;

    fn cursor(&self) -> VecCursor<T> {
        VecCursor::new(self.data.iter().cloned().collect())
    }

    fn contains(&self, element: &T) -> bool {
        self.data.contains(element)
    }

    fn len(&self) -> usize {
        self.data.len()
    }

    fn to_vec(&self) -> Vec<T> {
        self.data.iter().cloned().collect()
    }
}

impl<T: Eq + Hash> Default for MapSet<T> {
    fn default() -> Self {
        Self {
            data: HashSet::new(),
        }
    }
}

impl<T: Eq + Hash> FromIterator<T> for MapSet<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            data: iter.into_iter().collect(),
        }
    }
}

impl<T: Eq + Hash + fmt::Display> fmt::Display for MapSet<T> {
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
    use crate::collections::SliceList;
    use crate::testing::ScriptedCollection;
    use pretty_assertions::assert_eq;

    fn sorted(set: &MapSet<&'static str>) -> Vec<&'static str> {
        let mut items = set.to_vec();
        items.sort_unstable();
        items
    }

    #[test]
    fn test_add_and_remove() {
        let mut set: MapSet<&str> = ["a", "b", "c"].into_iter().collect();
        assert!(set.add("d"));
        assert!(!set.add("d"));
        set.remove(&"a").unwrap();

        assert_eq!(sorted(&set), vec!["b", "c", "d"]);
    }

    #[test]
    fn test_remove_missing_is_not_found() {
        let mut set: MapSet<&str> = MapSet::new();
        assert!(set.remove(&"x").unwrap_err().is_not_found());
    }

    #[test]
    fn test_bulk_operations() {
        let mut set: MapSet<&str> = ["a", "b", "c", "d"].into_iter().collect();
        set.remove_all(&SliceList::from_vec(vec!["a", "z"]));
        assert_eq!(sorted(&set), vec!["b", "c", "d"]);

        set.retain_all(&SliceList::from_vec(vec!["c", "d"]));
        assert_eq!(sorted(&set), vec!["c", "d"]);

        set.add_all(&SliceList::from_vec(vec!["c", "e"])).unwrap();
        assert_eq!(set.len(), 3);

        set.remove_if(|e| *e == "c");
        assert_eq!(sorted(&set), vec!["d", "e"]);

        set.clear();
        assert!(set.is_empty());
    }

    #[test]
    fn test_add_all_surfaces_cursor_error() {
        let faulty = ScriptedCollection::new(vec![Ok("x"), Err(StreamError::msg("disk gone")), Ok("y")]);
        let mut set: MapSet<&str> = ["a"].into_iter().collect();

        let err = set.add_all(&faulty).unwrap_err();
        assert_eq!(err.to_string(), "disk gone");
        assert_eq!(sorted(&set), vec!["a"]);
    }

    #[test]
    fn test_cursor_mut_removes_visited_elements() {
        let mut set: MapSet<i32> = (1..=6).collect();
        let mut cursor = set.cursor_mut();
        assert!(cursor.remove().unwrap_err().is_out_of_bounds());

        while cursor.has_next() {
            if cursor.next().unwrap() % 3 != 0 {
                cursor.remove().unwrap();
            }
        }

        let mut left = set.to_vec();
        left.sort_unstable();
        assert_eq!(left, vec![3, 6]);
    }

    #[test]
    fn test_single_element_display() {
        let set: MapSet<&str> = ["b"].into_iter().collect();
        assert_eq!(set.to_string(), "[b]");
    }

    #[test]
    fn test_stream_counts_unique_elements() {
        let set: MapSet<i32> = [1, 2, 2, 3, 3, 3].into_iter().collect();
        assert_eq!(set.stream().count().unwrap(), 3);
    }
}
