//! # Idempotent stop gate.
//!
//! [`StopGate`] guards a [`CancellationToken`] with a compare-and-set flag so that
//! exactly one caller "wins" the stop, no matter how many tasks call it at once.
//! The winner publishes `EventKind::StopRequested` and cancels the token; every
//! other call is a no-op.
//!
//! The token is shared with the timing loop (which exits when it is cancelled) and
//! with every [`Ticks`](crate::Ticks) receiver (which stop waiting).

use std::sync::atomic::{AtomicBool, Ordering};

use tokio_util::sync::CancellationToken;

use crate::events::{Bus, Event, EventKind};

/// One-shot stop signal shared between a ticker handle and its timing loop.
#[derive(Debug)]
pub(crate) struct StopGate {
    fired: AtomicBool,
    token: CancellationToken,
    bus: Bus,
}

impl StopGate {
    pub(crate) fn new(bus: Bus) -> Self {
        Self {
            fired: AtomicBool::new(false),
            token: CancellationToken::new(),
            bus,
        }
    }

    /// Returns a clone of the underlying token for observers.
    pub(crate) fn token(&self) -> CancellationToken {
        self.token.clone()
    }

    /// Fires the gate. Returns `true` only for the call that actually fired it.
    pub(crate) fn stop(&self) -> bool {
        if self
            .fired
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return false;
        }
        self.bus.publish(Event::new(EventKind::StopRequested));
        self.token.cancel();
        true
    }

    pub(crate) fn is_stopped(&self) -> bool {
        self.token.is_cancelled()
    }
}
