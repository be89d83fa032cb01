//! Refresh coordination between mutations and the event store.
//!
//! The coordinator is a counter in a `watch` channel. Every successful
//! mutation bumps it; the store remembers the value it last loaded and
//! refetches once the counter has moved on.

use tokio::sync::watch;

pub struct RefreshCoordinator {
    tx: watch::Sender<u64>,
}

impl Default for RefreshCoordinator {
    fn default() -> Self {
        Self::new()
    }
}

impl RefreshCoordinator {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(0);
        RefreshCoordinator { tx }
    }

    /// Current generation.
    pub fn generation(&self) -> u64 {
        *self.tx.borrow()
    }

    /// Invalidate every subscriber. Returns the new generation.
    pub fn trigger(&self) -> u64 {
        self.tx.send_modify(|generation| *generation += 1);
        let generation = self.generation();
        tracing::debug!(generation, "Refresh triggered");
        generation
    }

    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.tx.subscribe()
    }
}
