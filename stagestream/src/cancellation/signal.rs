//! Close-once broadcast signal shared by every stage of a pipeline.

use crossbeam_channel::{bounded, Receiver, Sender};
use parking_lot::{Mutex, RwLock};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::debug;

/// A broadcast "done" marker for one pipeline instance.
///
/// The only transition is open -> closed. Closing is idempotent: the first
/// reason is kept and later calls are no-ops. Clones share the same state.
#[derive(Clone)]
pub struct CancellationSignal {
    inner: Arc<SignalInner>,
}

struct SignalInner {
    /// Whether close has been requested.
    closed: AtomicBool,
    /// The reason for closing (first one wins).
    reason: RwLock<Option<String>>,
    /// Held until close; dropping it disconnects every `done` receiver.
    sender: Mutex<Option<Sender<()>>>,
    /// Template receiver handed out by [`CancellationSignal::done`].
    receiver: Receiver<()>,
}

impl CancellationSignal {
    /// Creates a new open signal.
    #[must_use]
    pub fn new() -> Self {
        let (sender, receiver) = bounded(0);
        Self {
            inner: Arc::new(SignalInner {
                closed: AtomicBool::new(false),
                reason: RwLock::new(None),
                sender: Mutex::new(Some(sender)),
                receiver,
            }),
        }
    }

    /// Closes the signal with a reason.
    ///
    /// Returns true only for the call that performed the transition.
    pub fn close(&self, reason: impl Into<String>) -> bool {
        if self
            .inner
            .closed
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return false;
        }

        let reason = reason.into();
        debug!(reason = %reason, "Cancellation signal closed");
        *self.inner.reason.write() = Some(reason);
        // Nothing is ever sent; disconnection is the broadcast.
        self.inner.sender.lock().take();
        true
    }

    /// Returns whether the signal has been closed.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.inner.closed.load(Ordering::SeqCst)
    }

    /// Returns the close reason, if any.
    #[must_use]
    pub fn reason(&self) -> Option<String> {
        self.inner.reason.read().clone()
    }

    /// Returns a receiver that is ready (disconnected) once the signal closes.
    ///
    /// Intended for `select!`; no value is ever delivered on it.
    #[must_use]
    pub fn done(&self) -> Receiver<()> {
        self.inner.receiver.clone()
    }
}

impl Default for CancellationSignal {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for CancellationSignal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CancellationSignal")
            .field("closed", &self.is_closed())
            .field("reason", &self.reason())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam_channel::{select, RecvTimeoutError};
    use std::sync::atomic::AtomicUsize;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn test_signal_default_open() {
        let signal = CancellationSignal::new();
        assert!(!signal.is_closed());
        assert!(signal.reason().is_none());
        assert_eq!(
            signal.done().recv_timeout(Duration::from_millis(10)),
            Err(RecvTimeoutError::Timeout)
        );
    }

    #[test]
    fn test_signal_close() {
        let signal = CancellationSignal::new();
        assert!(signal.close("User requested"));

        assert!(signal.is_closed());
        assert_eq!(signal.reason(), Some("User requested".to_string()));
        assert!(signal.done().recv().is_err());
    }

    #[test]
    fn test_signal_close_idempotent() {
        let signal = CancellationSignal::new();
        assert!(signal.close("First reason"));
        assert!(!signal.close("Second reason"));

        assert_eq!(signal.reason(), Some("First reason".to_string()));
    }

    #[test]
    fn test_close_wakes_every_waiter() {
        let signal = CancellationSignal::new();
        let woken = Arc::new(AtomicUsize::new(0));

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let done = signal.done();
                let woken = woken.clone();
                thread::spawn(move || {
                    select! {
                        recv(done) -> _ => {
                            woken.fetch_add(1, Ordering::SeqCst);
                        }
                    }
                })
            })
            .collect();

        thread::sleep(Duration::from_millis(20));
        signal.close("broadcast");

        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(woken.load(Ordering::SeqCst), 4);
    }

    #[test]
    fn test_concurrent_close_transitions_once() {
        let signal = CancellationSignal::new();
        let winners = Arc::new(AtomicUsize::new(0));

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let signal = signal.clone();
                let winners = winners.clone();
                thread::spawn(move || {
                    if signal.close(format!("closer {i}")) {
                        winners.fetch_add(1, Ordering::SeqCst);
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(winners.load(Ordering::SeqCst), 1);
        assert!(signal.is_closed());
    }
}
