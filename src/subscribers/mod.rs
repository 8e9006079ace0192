//! # Event subscribers for tickers.
//!
//! This module provides the [`Subscribe`] trait, the [`SubscriberSet`] fan-out and
//! the optional built-in [`LogWriter`].
//!
//! ## Architecture
//! ```text
//! Driver ── publish(Event) ──► Bus ──► listener ──► SubscriberSet
//!                                                       │
//!                                             ┌─────────┼─────────┐
//!                                             ▼         ▼         ▼
//!                                         LogWriter  Metrics   Custom
//! ```
//!
//! The listener is spawned only when subscribers are registered through
//! [`ExponentialBuilder::with_subscribers`](crate::ExponentialBuilder::with_subscribers);
//! it exits after forwarding `EventKind::TickerStopped`.

#[cfg(feature = "logging")]
mod log;
mod set;
mod subscriber;

#[cfg(feature = "logging")]
pub use log::LogWriter;
pub use set::SubscriberSet;
pub use subscriber::Subscribe;
