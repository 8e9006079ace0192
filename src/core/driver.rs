//! # Driver: the timing loop of one exponential ticker.
//!
//! Owns a single re-armed timer, the current interval and the jitter policy, and
//! hands ticks to consumers through a one-slot channel.
//!
//! ## Event flow
//! ```text
//! TickerStarted → [wait] → TickDelivered → [wait] → TickDelivered → ...
//!                       └─► TickDropped (stop won the handoff)
//!                                      └─► TickerStopped (always last)
//! ```
//!
//! ## Architecture
//! ```text
//! arm(initial + jitter)
//! loop {
//!   ├─► select { stop ─► exit, timer ─► fired }
//!   ├─► offer(now):
//!   │     slot.send(now)
//!   │     select { stop ─► slot drained? accepted : TickDropped, exit
//!   │              slot.reserve() ─► accepted (a consumer took the tick) }
//!   ├─► interval = growth.next(interval)      (saturating)
//!   ├─► wait = interval + jitter sample        (sample never kept)
//!   └─► timer.reset(now + wait)
//! }
//! ```
//!
//! ## Rules
//! - The next timer is armed only after a consumer has taken the current tick out
//!   of the slot. A receive that is dropped before reading leaves the tick there.
//! - Both suspension points race the stop token and prefer it (`biased`).
//! - `interval` never leaves this task.

use std::time::Duration;

use tokio::{
    select,
    sync::mpsc,
    time::{self, Instant},
};
use tokio_util::sync::CancellationToken;

use crate::{
    events::{Bus, Event, EventKind},
    policies::{Growth, JitterPolicy},
};

/// Fallback distance for deadlines that `Instant` cannot represent (~30 years).
const FAR_FUTURE: Duration = Duration::from_secs(86_400 * 365 * 30);

/// Outcome of offering one tick.
enum Handoff {
    Accepted,
    Stopped,
    Closed,
}

/// Why the loop exited.
#[derive(Clone, Copy)]
enum Exit {
    StopRequested,
    ReceiversDropped,
}

impl Exit {
    fn as_str(self) -> &'static str {
        match self {
            Exit::StopRequested => "stop_requested",
            Exit::ReceiversDropped => "receivers_dropped",
        }
    }
}

/// Timing loop state. Moved into its own task by the builder.
pub(crate) struct Driver {
    interval: Duration,
    growth: Growth,
    jitter: JitterPolicy,
    slot: mpsc::Sender<Instant>,
    stop: CancellationToken,
    bus: Bus,
}

impl Driver {
    pub(crate) fn new(
        initial: Duration,
        growth: Growth,
        jitter: JitterPolicy,
        slot: mpsc::Sender<Instant>,
        stop: CancellationToken,
        bus: Bus,
    ) -> Self {
        Self {
            interval: initial,
            growth,
            jitter,
            slot,
            stop,
            bus,
        }
    }

    /// Runs until the stop token is cancelled or every receiver is gone.
    ///
    /// Publishes `TickerStopped` as its final event on every exit path.
    pub(crate) async fn run(mut self) {
        let first_wait = self.jitter.apply(self.interval);
        let timer = time::sleep_until(deadline_after(first_wait));
        tokio::pin!(timer);

        self.bus.publish(
            Event::new(EventKind::TickerStarted)
                .with_interval(self.interval)
                .with_wait(first_wait),
        );

        let mut delivered: u64 = 0;
        let exit = loop {
            select! {
                biased;
                _ = self.stop.cancelled() => break Exit::StopRequested,
                _ = &mut timer => {}
            }

            let fired = Instant::now();
            match self.offer(fired).await {
                Handoff::Accepted => delivered += 1,
                Handoff::Stopped => {
                    self.bus.publish(
                        Event::new(EventKind::TickDropped)
                            .with_tick(delivered + 1)
                            .with_reason(Exit::StopRequested.as_str()),
                    );
                    break Exit::StopRequested;
                }
                Handoff::Closed => break Exit::ReceiversDropped,
            }

            let next = self.growth.next(self.interval);
            if next == Duration::MAX && self.interval < Duration::MAX {
                self.bus.publish(
                    Event::new(EventKind::IntervalSaturated)
                        .with_tick(delivered)
                        .with_interval(next),
                );
            }
            self.interval = next;

            let wait = self.jitter.apply(self.interval);
            timer.as_mut().reset(deadline_after(wait));

            self.bus.publish(
                Event::new(EventKind::TickDelivered)
                    .with_tick(delivered)
                    .with_interval(self.interval)
                    .with_wait(wait),
            );
        };

        self.bus.publish(
            Event::new(EventKind::TickerStopped)
                .with_tick(delivered)
                .with_reason(exit.as_str()),
        );
    }

    /// Puts `at` into the slot and waits until a consumer has taken it, or for the
    /// stop signal.
    ///
    /// The slot is empty on entry: the previous offer only returned once it was drained.
    async fn offer(&mut self, at: Instant) -> Handoff {
        let sent = select! {
            biased;
            _ = self.stop.cancelled() => return Handoff::Stopped,
            sent = self.slot.send(at) => sent,
        };
        if sent.is_err() {
            return Handoff::Closed;
        }

        select! {
            biased;
            _ = self.stop.cancelled() => {
                if self.slot_is_empty() {
                    Handoff::Accepted
                } else {
                    Handoff::Stopped
                }
            }
            drained = self.slot.reserve() => match drained {
                Ok(_permit) => Handoff::Accepted,
                Err(_) => Handoff::Closed,
            },
        }
    }

    fn slot_is_empty(&self) -> bool {
        self.slot.capacity() == self.slot.max_capacity()
    }
}

/// `now + wait`, falling back to a far-future deadline when that overflows `Instant`.
fn deadline_after(wait: Duration) -> Instant {
    let now = Instant::now();
    now.checked_add(wait).unwrap_or_else(|| now + FAR_FUTURE)
}
