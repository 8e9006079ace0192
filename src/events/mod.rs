//! Ticker events: types and broadcast bus.
//!
//! ## Contents
//! - [`EventKind`], [`Event`] event classification and payload metadata
//! - [`Bus`] thin wrapper over `tokio::sync::broadcast`
//!
//! ## Quick reference
//! - **Publishers**: `core::driver::Driver` (tick lifecycle), `core::gate::StopGate`
//!   (first stop), `SubscriberSet` workers (overflow/panic).
//! - **Consumers**: the subscriber listener spawned by `ExponentialBuilder`, and any
//!   receiver returned by [`Exponential::events`](crate::Exponential::events).

mod bus;
mod event;

pub use bus::Bus;
pub use event::{Event, EventKind};
