//! # Events emitted by a running ticker.
//!
//! The [`EventKind`] enum classifies event types across three categories:
//! - **Lifecycle events**: ticker started, stop requested, ticker stopped
//! - **Tick events**: tick delivered, tick dropped, interval saturated
//! - **Subscriber events**: overflow and panic reports from subscriber workers
//!
//! The [`Event`] struct carries metadata such as timestamps, tick number, the
//! base interval, the armed wait and a reason.
//!
//! ## Ordering guarantees
//! Each event has a globally unique sequence number (`seq`) that increases monotonically.
//! Use `seq` to restore the exact order when events are delivered out of order.
//!
//! ## Example
//! ```rust
//! use std::time::Duration;
//! use tickers::{Event, EventKind};
//!
//! let ev = Event::new(EventKind::TickDelivered)
//!     .with_tick(3)
//!     .with_interval(Duration::from_secs(8))
//!     .with_wait(Duration::from_millis(8_120));
//!
//! assert_eq!(ev.kind, EventKind::TickDelivered);
//! assert_eq!(ev.tick, Some(3));
//! assert_eq!(ev.interval, Some(Duration::from_secs(8)));
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::{Duration, SystemTime};

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of ticker events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    // === Subscriber events ===
    /// Subscriber panicked during event processing.
    ///
    /// Sets:
    /// - `reason`: `subscriber=<name> info=<panic message>`
    SubscriberPanicked,

    /// Subscriber dropped an event (queue full or worker closed).
    ///
    /// Sets:
    /// - `reason`: `subscriber=<name> reason=<full|closed>`
    SubscriberOverflow,

    // === Lifecycle events ===
    /// Timing loop started and armed its first timer.
    ///
    /// Sets:
    /// - `interval`: initial interval
    /// - `wait`: first armed wait (interval + jitter)
    TickerStarted,

    /// First call to `stop()` observed. Later calls publish nothing.
    StopRequested,

    /// Timing loop exited. Always the last event of a ticker.
    ///
    /// Sets:
    /// - `tick`: number of delivered ticks
    /// - `reason`: `stop_requested` or `receivers_dropped`
    TickerStopped,

    // === Tick events ===
    /// A consumer accepted a tick and the timer was re-armed.
    ///
    /// Sets:
    /// - `tick`: tick number (1-based)
    /// - `interval`: next base interval
    /// - `wait`: next armed wait (interval + jitter)
    TickDelivered,

    /// A fired tick was abandoned because stop won the handoff race.
    ///
    /// Sets:
    /// - `tick`: number of the abandoned tick
    /// - `reason`: `stop_requested`
    TickDropped,

    /// The base interval hit [`Duration::MAX`] and stops growing.
    ///
    /// Sets:
    /// - `tick`: tick number after which saturation happened
    /// - `interval`: the saturated interval
    IntervalSaturated,
}

/// Ticker event with optional metadata.
///
/// - `seq`: monotonic global sequence for ordering
/// - `at`: wall-clock timestamp (for logs)
/// - other optional fields are set depending on the [`EventKind`]
#[derive(Clone, Debug)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Event classification.
    pub kind: EventKind,

    /// Tick number (starting from 1).
    pub tick: Option<u64>,
    /// Base interval (without jitter).
    pub interval: Option<Duration>,
    /// Armed wait (interval plus jitter sample).
    pub wait: Option<Duration>,
    /// Human-readable reason.
    pub reason: Option<Arc<str>>,
}

impl Event {
    /// Creates a new event of the given kind with current timestamp and next sequence number.
    pub fn new(kind: EventKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            tick: None,
            interval: None,
            wait: None,
            reason: None,
        }
    }

    /// Attaches a tick number.
    #[inline]
    pub fn with_tick(mut self, n: u64) -> Self {
        self.tick = Some(n);
        self
    }

    /// Attaches a base interval.
    #[inline]
    pub fn with_interval(mut self, d: Duration) -> Self {
        self.interval = Some(d);
        self
    }

    /// Attaches an armed wait.
    #[inline]
    pub fn with_wait(mut self, d: Duration) -> Self {
        self.wait = Some(d);
        self
    }

    /// Attaches a human-readable reason.
    #[inline]
    pub fn with_reason(mut self, reason: impl Into<Arc<str>>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Creates a subscriber overflow event.
    #[inline]
    pub fn subscriber_overflow(subscriber: &'static str, reason: &'static str) -> Self {
        Event::new(EventKind::SubscriberOverflow)
            .with_reason(format!("subscriber={subscriber} reason={reason}"))
    }

    /// Creates a subscriber panic event.
    #[inline]
    pub fn subscriber_panicked(subscriber: &'static str, info: String) -> Self {
        Event::new(EventKind::SubscriberPanicked)
            .with_reason(format!("subscriber={subscriber} info={info}"))
    }

    /// Returns `true` for the terminal event of a ticker.
    #[inline]
    pub fn is_terminal(&self) -> bool {
        matches!(self.kind, EventKind::TickerStopped)
    }
}
