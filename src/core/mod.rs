//! Ticker core: construction, timing loop and shutdown.
//!
//! The public API from this module is [`Exponential`] (handle), [`Ticks`]
//! (receive side), [`ExponentialBuilder`], [`TickerConfig`] and the
//! [`TickerOption`]s.
//!
//! Internal modules:
//! - [`config`]: settings, validation and construction options;
//! - [`builder`]: wires bus, subscribers, stop gate and spawns the driver;
//! - [`driver`]: the timing loop (arm, fire, hand off, grow, re-arm);
//! - [`gate`]: idempotent stop signal;
//! - [`ticks`]: consumer side of the one-slot tick handoff;
//! - [`ticker`]: the [`Exponential`] handle.

mod builder;
mod config;
mod driver;
mod gate;
mod ticker;
mod ticks;

pub use builder::ExponentialBuilder;
pub use config::{TickerConfig, TickerOption, with_jitter};
pub use ticker::Exponential;
pub use ticks::Ticks;
