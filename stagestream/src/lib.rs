//! # Stagestream
//!
//! Element streams where every stage runs on its own thread.
//!
//! Stagestream provides:
//!
//! - **Sources**: fixed values or any collection cursor
//! - **Transforms**: filter and map stages linked by unbuffered conduits
//! - **Terminals**: match, collect, find and count operations that shut the
//!   pipeline down before returning
//! - **Pull iteration**: a blocking iterator with an explicit close
//! - **Collections**: lists, sets and maps that stream and collect
//!
//! ## Quick Start
//!
//! ```rust
//! use stagestream::prelude::*;
//!
//! let first = Stream::of(vec![1, 2, 3, 4, 5, 6])
//!     .filter(|n| n % 2 == 0)
//!     .map(|n| Ok(format!("n: {n}")))
//!     .find_first()?;
//! assert_eq!(first, "n: 2");
//! # Ok::<(), StreamError>(())
//! ```

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    missing_docs,
    rust_2018_idioms
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc
)]

pub mod cancellation;
pub mod collections;
pub mod config;
pub mod core;
pub mod errors;
pub mod observability;
pub mod stream;
pub mod testing;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::cancellation::CancellationSignal;
    pub use crate::collections::{
        collect::{to_list, to_set},
        Collection, Comparator, Cursor, CursorExt, HashMapCollection, ImmutableList,
        MapEntry, MapSet, Predicate, SliceList, VecCursor,
    };
    pub use crate::config::StreamConfig;
    pub use crate::errors::{ErrorKind, Result, StreamError};
    pub use crate::stream::{PipelineMonitor, Stream, StreamIterator};
}
