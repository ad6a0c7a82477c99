//! Wake-up signal from the audio thread to a waiting control thread.

use core::time::Duration;
use crossbeam_channel::{bounded, Receiver, Sender};
use std::time::Instant;

/// Single-slot signal. Posting never blocks or allocates.
pub(crate) struct AckSignal {
    tx: Sender<()>,
    rx: Receiver<()>,
}

impl AckSignal {
    pub(crate) fn new() -> Self {
        let (tx, rx) = bounded(1);
        Self { tx, rx }
    }

    /// Audio thread. An unconsumed signal absorbs this one.
    #[inline]
    pub(crate) fn post(&self) {
        let _ = self.tx.try_send(());
    }

    /// Drop stale signals before issuing a new request.
    pub(crate) fn drain(&self) {
        while self.rx.try_recv().is_ok() {}
    }

    /// Block until `done` holds, re-checking on every signal.
    ///
    /// Returns `false` on timeout.
    pub(crate) fn wait_until(&self, timeout: Duration, mut done: impl FnMut() -> bool) -> bool {
        let deadline = Instant::now() + timeout;
        loop {
            if done() {
                return true;
            }
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() || self.rx.recv_timeout(remaining).is_err() {
                return done();
            }
        }
    }
}
