//! Hash-map wrapper exposing key, value and entry views.

use super::cursor::VecCursor;
use super::map_set::MapSet;
use super::slice_list::SliceList;
use crate::errors::{Result, StreamError};
use crate::stream::Stream;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::hash::Hash;

/// One key and its value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MapEntry<K, V> {
    /// The entry key.
    pub key: K,
    /// The entry value.
    pub value: V,
}

impl<K, V> MapEntry<K, V> {
    /// Creates an entry.
    pub const fn new(key: K, value: V) -> Self {
        Self { key, value }
    }
}

/// A key-value store backed by [`HashMap`]. Iteration order is unspecified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HashMapCollection<K: Eq + Hash, V> {
    data: HashMap<K, V>,
}

impl<K, V> HashMapCollection<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone + PartialEq,
{
    /// Creates an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
        }
    }

    /// Sets `key` to `value`, returning the previous value.
    pub fn put(&mut self, key: K, value: V) -> Option<V> {
        self.data.insert(key, value)
    }

    /// Copies every entry of `other` into this map.
    pub fn put_all(&mut self, other: &Self) {
        for (k, v) in &other.data {
            self.data.insert(k.clone(), v.clone());
        }
    }

    /// Sets `key` only if it is absent. Returns the existing value otherwise.
    pub fn put_if_absent(&mut self, key: K, value: V) -> Option<V> {
        match self.data.get(&key) {
            Some(existing) => Some(existing.clone()),
            None => {
                self.data.insert(key, value);
                None
            }
        }
    }

    /// Removes `key`, returning its value if it was present.
    pub fn remove_key(&mut self, key: &K) -> Option<V> {
        self.data.remove(key)
    }

    /// Removes `key` only if it currently maps to `value`.
    pub fn remove(&mut self, key: &K, value: &V) -> bool {
        if self.data.get(key) == Some(value) {
            self.data.remove(key);
            true
        } else {
            false
        }
    }

    /// Replaces the value of an existing key, returning the old value.
    /// Absent keys are left absent.
    pub fn replace(&mut self, key: &K, value: V) -> Option<V> {
        self.data
            .get_mut(key)
            .map(|slot| std::mem::replace(slot, value))
    }

    /// Returns the value for `key`.
    pub fn get(&self, key: &K) -> Result<&V> {
        self.data.get(key).ok_or(StreamError::KeyNotFound)
    }

    /// Returns the value for `key`, or `default` when absent.
    #[must_use]
    pub fn get_or_default(&self, key: &K, default: V) -> V {
        self.data.get(key).cloned().unwrap_or(default)
    }

    /// Returns true if `key` is present.
    #[must_use]
    pub fn contains_key(&self, key: &K) -> bool {
        self.data.contains_key(key)
    }

    /// Returns true if any key maps to `value`.
    #[must_use]
    pub fn contains_value(&self, value: &V) -> bool {
        self.data.values().any(|v| v == value)
    }

    /// Returns the keys as a set.
    #[must_use]
    pub fn keys(&self) -> MapSet<K> {
        self.data.keys().cloned().collect()
    }

    /// Returns the values as a list.
    #[must_use]
    pub fn values(&self) -> SliceList<V> {
        self.data.values().cloned().collect()
    }

    /// Returns a snapshot of all entries.
    #[must_use]
    pub fn entries(&self) -> Vec<MapEntry<K, V>> {
        self.data
            .iter()
            .map(|(k, v)| MapEntry::new(k.clone(), v.clone()))
            .collect()
    }

    /// Returns the number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns true if there are no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Starts a stream over a snapshot of the entries.
    pub fn stream(&self) -> Stream<MapEntry<K, V>>
    where
        K: Send + 'static,
        V: Send + 'static,
    {
        Stream::from_cursor(VecCursor::new(self.entries()), crate::config::StreamConfig::default())
    }
}

impl<K: Eq + Hash, V> Default for HashMapCollection<K, V> {
    fn default() -> Self {
        Self {
            data: HashMap::new(),
        }
    }
}

impl<K: Eq + Hash, V> FromIterator<(K, V)> for HashMapCollection<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            data: iter.into_iter().collect(),
        }
    }
}
