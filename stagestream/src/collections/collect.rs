//! Collectors from streams into collections.

use super::map_set::MapSet;
use super::slice_list::SliceList;
use crate::errors::Result;
use crate::stream::Stream;
use std::hash::Hash;

/// Drains `stream` into a list, preserving order.
pub fn to_list<T>(stream: Stream<T>) -> Result<SliceList<T>>
where
    T: Clone + PartialEq + Send + 'static,
{
    let iterator = stream.iterator();
    let mut list = SliceList::new();
    while iterator.has_next() {
        list.add(iterator.next()?);
    }
    match iterator.last_error() {
        Some(err) => Err(err),
        None => Ok(list),
    }
}

/// Drains `stream` into a set, dropping duplicates.
pub fn to_set<T>(stream: Stream<T>) -> Result<MapSet<T>>
where
    T: Eq + Hash + Clone + Send + 'static,
{
    let iterator = stream.iterator();
    let mut set = MapSet::new();
    while iterator.has_next() {
        set.add(iterator.next()?);
    }
    match iterator.last_error() {
        Some(err) => Err(err),
        None => Ok(set),
    }
}
