//! # Receive side of a ticker.
//!
//! [`Ticks`] is the consumer-facing half of the tick handoff. The timing loop puts
//! each fired tick into a one-slot channel and does not arm the next timer until a
//! consumer has taken it out. A tick nobody asks for simply stays in the slot
//! until a consumer shows up or the ticker is stopped.
//!
//! `Ticks` is cheap to clone. Clones share the same receiver; each tick goes to
//! exactly one of them.

use std::sync::Arc;

use futures::Stream;
use tokio::{
    select,
    sync::{Mutex, mpsc},
    time::Instant,
};
use tokio_util::sync::CancellationToken;

/// Receive-only handle to the ticks of an [`Exponential`](crate::Exponential) ticker.
#[derive(Clone, Debug)]
pub struct Ticks {
    slot: Arc<Mutex<mpsc::Receiver<Instant>>>,
    stop: CancellationToken,
}

impl Ticks {
    pub(crate) fn new(slot: mpsc::Receiver<Instant>, stop: CancellationToken) -> Self {
        Self {
            slot: Arc::new(Mutex::new(slot)),
            stop,
        }
    }

    /// Waits for the next tick.
    ///
    /// Returns `None` once the ticker has been stopped; after that it never yields
    /// a tick again. There is no built-in timeout: wrap the call in
    /// [`tokio::time::timeout`] if needed.
    ///
    /// ### Cancel safety
    /// This method is cancel safe. A tick is only handed out when this future
    /// completes; dropping it earlier leaves the pending tick for the next caller.
    pub async fn recv(&self) -> Option<Instant> {
        if self.stop.is_cancelled() {
            return None;
        }
        let mut slot = select! {
            biased;
            _ = self.stop.cancelled() => return None,
            slot = self.slot.lock() => slot,
        };
        select! {
            biased;
            _ = self.stop.cancelled() => None,
            at = slot.recv() => at,
        }
    }

    /// Returns `true` once the ticker has been stopped.
    pub fn is_stopped(&self) -> bool {
        self.stop.is_cancelled()
    }

    /// Turns the receiver into a [`Stream`] that ends when the ticker stops.
    pub fn into_stream(self) -> impl Stream<Item = Instant> {
        futures::stream::unfold(self, |ticks| async move {
            let at = ticks.recv().await?;
            Some((at, ticks))
        })
    }
}
