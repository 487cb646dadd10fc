//! Cooperative cancellation and worker liveness.
//!
//! This module provides:
//! - CancellationSignal, the close-once broadcast shared by a pipeline's stages
//! - WorkerTracker for observing when stage threads have exited

mod signal;
mod tracker;

pub use signal::CancellationSignal;
pub use tracker::{WorkerGuard, WorkerTracker};
