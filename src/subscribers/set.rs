//! # Non-blocking event fan-out to multiple subscribers.
//!
//! Provides [`SubscriberSet`]: distributes ticker events to multiple subscribers
//! concurrently without blocking the publisher.
//!
//! ## Architecture
//! ```text
//! emit(event)
//!     │
//!     ├──► [queue 1] ──► worker 1 ──► subscriber1.on_event()
//!     │    (bounded)         └──────► panic → SubscriberPanicked
//!     └──► [queue N] ──► worker N ──► subscriberN.on_event()
//!          (bounded)
//! ```
//!
//! ## Rules
//! - **Overflow**: event dropped for that subscriber only, `SubscriberOverflow` published
//! - **Non-blocking**: `emit()` returns immediately (uses `try_send`)
//! - **Isolation**: slow/panicking subscriber doesn't affect others
//! - **Per-subscriber FIFO**: each subscriber sees events in order
//!
//! **Warning**: `AssertUnwindSafe` is used, which can leave shared state inconsistent
//! if a subscriber uses `Arc<Mutex<T>>` and panics while holding the lock.

use std::{any::Any, sync::Arc};

use futures::FutureExt;
use tokio::{
    sync::{broadcast, mpsc, mpsc::error::TrySendError},
    task::JoinHandle,
};

use crate::events::{Bus, Event, EventKind};
use crate::subscribers::Subscribe;

/// Fan-out coordinator for the subscribers of one ticker.
pub struct SubscriberSet {
    queues: Vec<(&'static str, mpsc::Sender<Arc<Event>>)>,
    workers: Vec<JoinHandle<()>>,
    bus: Bus,
}

impl SubscriberSet {
    /// Spawns one worker per subscriber. Must be called inside a tokio runtime.
    #[must_use]
    pub fn new(subs: Vec<Arc<dyn Subscribe>>, bus: Bus) -> Self {
        let (queues, workers): (Vec<_>, Vec<_>) = subs
            .into_iter()
            .map(|sub| {
                let (tx, rx) = mpsc::channel(sub.queue_capacity().max(1));
                let name = sub.name();
                ((name, tx), tokio::spawn(drive(sub, rx, bus.clone())))
            })
            .unzip();
        Self {
            queues,
            workers,
            bus,
        }
    }

    /// Queues `event` for every subscriber without waiting.
    ///
    /// A subscriber whose queue is full (or gone) misses the event and a
    /// `SubscriberOverflow` is published instead, except for overflow events
    /// themselves, which would otherwise feed back into the set.
    pub fn emit(&self, event: Event) {
        let overflow = event.kind == EventKind::SubscriberOverflow;
        let event = Arc::new(event);

        for &(name, ref tx) in &self.queues {
            let reason = match tx.try_send(Arc::clone(&event)) {
                Ok(()) => continue,
                Err(TrySendError::Full(_)) => "full",
                Err(TrySendError::Closed(_)) => "closed",
            };
            if !overflow {
                self.bus.publish(Event::subscriber_overflow(name, reason));
            }
        }
    }

    /// Forwards bus events into the set until the ticker's terminal event, then shuts down.
    ///
    /// The terminal event itself is delivered before the workers are drained.
    /// Lagged receivers skip ahead silently; a closed bus also ends the listener.
    pub async fn listen(self, mut rx: broadcast::Receiver<Event>) {
        loop {
            match rx.recv().await {
                Ok(ev) => {
                    let terminal = ev.is_terminal();
                    self.emit(ev);
                    if terminal {
                        break;
                    }
                }
                Err(broadcast::error::RecvError::Lagged(_)) => continue,
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
        self.shutdown().await;
    }

    /// Closes every queue and waits for the workers to drain them.
    pub async fn shutdown(self) {
        drop(self.queues);
        for worker in self.workers {
            let _ = worker.await;
        }
    }
}

/// Worker loop: feeds queued events to one subscriber, reporting panics on the bus.
async fn drive(sub: Arc<dyn Subscribe>, mut rx: mpsc::Receiver<Arc<Event>>, bus: Bus) {
    while let Some(ev) = rx.recv().await {
        let handled = std::panic::AssertUnwindSafe(sub.on_event(&ev))
            .catch_unwind()
            .await;
        if let Err(payload) = handled {
            bus.publish(Event::subscriber_panicked(sub.name(), panic_message(&*payload)));
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&'static str>()
        .map(|msg| (*msg).to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string())
}
