//! Ordered lists, sets and maps that streams read from and collect into.
//!
//! This module provides:
//! - The `Cursor` and `Collection` traits a stream source consumes
//! - SliceList, ImmutableList, MapSet and HashMapCollection implementations
//! - Predicate and comparator helper types
//! - Collectors from streams back into collections

pub mod collect;
mod cursor;
mod functions;
mod hash_map;
mod immutable_list;
mod map_set;
mod slice_list;

pub use cursor::{Collection, Cursor, CursorExt, VecCursor};
pub use functions::{Comparator, Predicate};
pub use hash_map::{HashMapCollection, MapEntry};
pub use immutable_list::{ImmutableCursor, ImmutableList};
pub use map_set::{MapSet, SetCursorMut};
pub use slice_list::{ListCursorMut, SliceList};
