//! Interval and jitter policies.
//!
//! This module groups the knobs that control **how long** the ticker waits between
//! two tick opportunities.
//!
//! ## Contents
//! - [`Growth`] how the base interval evolves (`next = current × factor`, saturating)
//! - [`JitterPolicy`] bounded random extra delay added to each armed wait
//! - [`JitterSource`] injectable sampler; [`UniformJitter`] is the default
//!
//! ## Quick wiring
//! ```text
//! TickerConfig { initial, factor, jitter }
//!      └─► core::driver::Driver uses:
//!           - growth.next(interval) after every accepted tick
//!           - jitter.apply(interval) to compute the armed wait
//! ```
//!
//! ## Defaults
//! - No jitter (`bound = 0`).
//! - `UniformJitter` as the sample source once a bound is set.

mod growth;
mod jitter;

pub use growth::Growth;
pub use jitter::{JitterPolicy, JitterSource, UniformJitter};
