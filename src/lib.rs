//! # tickers
//!
//! **tickers** provides an exponential backoff ticker for tokio: a ticker that
//! emits timestamps at exponentially growing intervals, optionally randomized by
//! jitter, until it is stopped.
//!
//! It is meant to back off polling, retry or health-check loops so that probe
//! frequency decays on its own while a condition persists.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!   Exponential::new / builder().build()
//!            │ validate config, spawn
//!            ▼
//! ┌──────────────────────────────────────────────────────────┐
//! │  Driver (one tokio task per ticker)                      │
//! │  - Growth       (interval × factor, saturating)          │
//! │  - JitterPolicy (fresh sample in [0, bound) per wait)    │
//! │  - one re-armed timer                                    │
//! └──────┬───────────────────────────────┬───────────────────┘
//!        │ one-slot handoff               │ publish
//!        ▼                                ▼
//!   Ticks::recv() ◄── consumer      Bus (broadcast) ──► SubscriberSet
//!        ▲                                           └─► Exponential::events()
//!        │ None after stop
//!   StopGate (compare-and-set + CancellationToken) ◄── stop() / drop
//! ```
//!
//! ### Lifecycle
//! ```text
//! arm(initial + jitter)
//! loop {
//!   ├─► wait for timer            (stop ─► exit)
//!   ├─► offer tick to a consumer  (stop ─► drop tick, exit)
//!   ├─► interval = interval × factor   (saturates at Duration::MAX)
//!   └─► arm(interval + jitter)
//! }
//! ```
//!
//! A consumer that is late does not make ticks pile up: the fired tick waits for it,
//! and the next timer is armed only once the tick has been taken. Stopping while a
//! tick waits drops that tick.
//!
//! ## Features
//! | Area              | Description                                                  | Key types / traits                         |
//! |-------------------|--------------------------------------------------------------|--------------------------------------------|
//! | **Ticker**        | Start, receive, stop.                                        | [`Exponential`], [`Ticks`]                 |
//! | **Construction**  | Options and builder, panicking or fallible.                  | [`with_jitter`], [`ExponentialBuilder`]    |
//! | **Policies**      | Interval growth and jitter sampling.                         | [`Growth`], [`JitterSource`]               |
//! | **Subscriber API**| Hook into ticker events (logging, metrics, custom).          | [`Subscribe`], [`Event`], [`EventKind`]    |
//! | **Errors**        | Typed construction errors.                                   | [`TickerError`]                            |
//! | **Configuration** | Centralized settings.                                        | [`TickerConfig`]                           |
//!
//! ## Optional features
//! - `logging`: exports a simple built-in `LogWriter` subscriber _(demo/reference only)_.
//!
//! ## Example
//! ```rust
//! use std::time::Duration;
//! use tickers::{Exponential, with_jitter};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() {
//!     // 1ms, 2ms, 4ms, ... plus up to 1ms of jitter each.
//!     let ticker = Exponential::with_options(
//!         Duration::from_millis(1),
//!         2.0,
//!         [with_jitter(Duration::from_millis(1))],
//!     );
//!
//!     let mut probes = 0;
//!     while let Some(_at) = ticker.tick().await {
//!         probes += 1;
//!         if probes == 3 {
//!             ticker.stop();
//!         }
//!     }
//!     assert_eq!(probes, 3);
//! }
//! ```
mod core;
mod error;
mod events;
mod policies;
mod subscribers;

// ---- Public re-exports ----

pub use crate::core::{
    Exponential, ExponentialBuilder, TickerConfig, TickerOption, Ticks, with_jitter,
};
pub use error::TickerError;
pub use events::{Event, EventKind};
pub use policies::{Growth, JitterPolicy, JitterSource, UniformJitter};
pub use subscribers::Subscribe;

// Optional: expose a simple built-in logger subscriber (demo/reference).
// Enable with: `--features logging`
#[cfg(feature = "logging")]
pub use subscribers::LogWriter;
