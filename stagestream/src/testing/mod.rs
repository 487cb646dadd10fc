//! Testing utilities for stagestream pipelines.
//!
//! This module provides:
//! - Scripted cursors and collections, call-counting callbacks
//! - Assertions for error kinds and worker shutdown

mod assertions;
mod mocks;

pub use assertions::{assert_cancelled, assert_error_kind, assert_shutdown};
pub use mocks::{CallCounter, ScriptedCollection, ScriptedCursor};
