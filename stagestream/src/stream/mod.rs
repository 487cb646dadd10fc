//! Thread-per-stage element streams.
//!
//! A [`Stream`] is the downstream end of the last stage built so far. Every
//! source and transform runs on its own worker thread and hands elements to
//! the next stage over an unbuffered conduit, so at most one element is in
//! flight per hop. A terminal operation or a [`StreamIterator`] consumes the
//! last stage and closes the pipeline's cancellation signal when it is done,
//! which releases every worker still waiting to send.
//!
//! ```rust
//! use stagestream::stream::Stream;
//!
//! let evens = Stream::of(1..=6)
//!     .filter(|n| n % 2 == 0)
//!     .map(|n| Ok(n * 10))
//!     .to_vec()
//!     .unwrap();
//! assert_eq!(evens, vec![20, 40, 60]);
//! ```

mod context;
mod iterator;
mod source;
mod stage;
mod terminal;
mod transform;


pub use context::PipelineMonitor;
pub use iterator::{IntoIter, StreamIterator};
pub use transform::map;

use context::PipelineContext;
use stage::Inlet;
use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

/// A lazily running pipeline producing elements of type `T`.
///
/// Transforms and terminals consume the stream. Dropping a stream without
/// consuming it cancels the pipeline.
#[must_use = "streams do nothing useful unless consumed; dropping one cancels its pipeline"]
pub struct Stream<T> {
    inlet: Inlet<T>,
    ctx: Arc<PipelineContext>,
    abandon: AbandonGuard,
}

impl<T: Send + 'static> Stream<T> {
    fn from_parts(inlet: Inlet<T>, ctx: Arc<PipelineContext>) -> Self {
        let abandon = AbandonGuard {
            ctx: Arc::clone(&ctx),
            armed: true,
        };
        Self {
            inlet,
            ctx,
            abandon,
        }
    }

    /// Hands ownership of the last stage to a new consumer.
    fn into_parts(self) -> (Inlet<T>, Arc<PipelineContext>) {
        let Self {
            inlet,
            ctx,
            abandon,
        } = self;
        abandon.disarm();
        (inlet, ctx)
    }

    /// Returns the id of this pipeline instance.
    pub fn id(&self) -> Uuid {
        self.ctx.id
    }

    /// Returns a monitor for this pipeline that outlives the stream.
    pub fn monitor(&self) -> PipelineMonitor {
        self.ctx.monitor()
    }
}

impl<T> fmt::Debug for Stream<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Stream").field("pipeline", &self.ctx).finish()
    }
}

impl<T: Send + 'static> IntoIterator for Stream<T> {
    type Item = crate::errors::Result<T>;
    type IntoIter = IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iterator().into_iter()
    }
}

/// Cancels the pipeline when a stream is dropped unconsumed.
struct AbandonGuard {
    ctx: Arc<PipelineContext>,
    armed: bool,
}

impl AbandonGuard {
    fn disarm(mut self) {
        self.armed = false;
    }
}

impl Drop for AbandonGuard {
    fn drop(&mut self) {
        if self.armed {
            self.ctx.cancel("stream dropped without a terminal operation");
        }
    }
}
