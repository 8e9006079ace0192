//! # Ticker configuration and construction options.
//!
//! Provides [`TickerConfig`] the immutable settings a ticker is started with, and
//! [`TickerOption`] the mutators applied to it before the timing loop starts.
//!
//! ## Sentinel values
//! - `jitter = 0s` → no jitter (the sample source is never consulted)
//! - `bus_capacity = 0` → clamped to 1

use std::time::Duration;

use crate::{error::TickerError, policies::Growth};

/// Default capacity of the event bus ring buffer.
const DEFAULT_BUS_CAPACITY: usize = 64;

/// Settings of one exponential ticker.
///
/// ## Field semantics
/// - `initial`: first interval (must be `> 0`)
/// - `factor`: growth factor applied after every accepted tick (must be finite and `> 1.0`)
/// - `jitter`: upper bound of the random extra wait (`0s` = none)
/// - `bus_capacity`: event bus ring buffer size (min 1)
///
/// All fields are public; [`TickerConfig::validate`] is the single place the
/// contract is checked, right before the loop is spawned.
#[derive(Clone, Debug, PartialEq)]
pub struct TickerConfig {
    /// First interval.
    pub initial: Duration,
    /// Multiplicative growth factor.
    pub factor: f64,
    /// Upper bound of the jitter added to each wait.
    pub jitter: Duration,
    /// Capacity of the event bus broadcast channel.
    pub bus_capacity: usize,
}

impl TickerConfig {
    /// Creates a config with the given interval and factor, no jitter and the default bus capacity.
    pub fn new(initial: Duration, factor: f64) -> Self {
        Self {
            initial,
            factor,
            jitter: Duration::ZERO,
            bus_capacity: DEFAULT_BUS_CAPACITY,
        }
    }

    /// Checks the construction contract and returns the growth policy for the loop.
    ///
    /// Fails on a zero initial interval, a factor `<= 1.0`, or a non-finite factor.
    pub fn validate(&self) -> Result<Growth, TickerError> {
        if self.initial.is_zero() {
            return Err(TickerError::InvalidInterval {
                interval: self.initial,
            });
        }
        Growth::new(self.factor)
    }

    /// Returns the jitter bound as an `Option`.
    ///
    /// - `None` → no jitter
    /// - `Some(d)` → each wait gets a sample in `[0, d)` added
    #[inline]
    pub fn jitter_bound(&self) -> Option<Duration> {
        if self.jitter.is_zero() {
            None
        } else {
            Some(self.jitter)
        }
    }

    /// Returns a bus capacity clamped to a minimum of 1.
    #[inline]
    pub fn bus_capacity_clamped(&self) -> usize {
        self.bus_capacity.max(1)
    }

    /// Applies a sequence of options in order.
    pub fn apply(&mut self, options: impl IntoIterator<Item = TickerOption>) {
        for opt in options {
            opt.apply_to(self);
        }
    }
}

/// A configuration mutator applied before the timing loop starts.
///
/// Build them with the free functions (currently [`with_jitter`]).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum TickerOption {
    /// Jitter bound; zero leaves the config untouched.
    Jitter(Duration),
}

impl TickerOption {
    fn apply_to(self, cfg: &mut TickerConfig) {
        match self {
            TickerOption::Jitter(bound) => {
                if !bound.is_zero() {
                    cfg.jitter = bound;
                }
            }
        }
    }
}

/// Adds a random extra wait in `[0, bound)` to every interval.
///
/// A zero bound is a no-op, so it never clears a bound set earlier.
///
/// # Example
/// ```rust
/// use std::time::Duration;
/// use tickers::{TickerConfig, with_jitter};
///
/// let mut cfg = TickerConfig::new(Duration::from_secs(1), 2.0);
/// cfg.apply([with_jitter(Duration::from_millis(250)), with_jitter(Duration::ZERO)]);
/// assert_eq!(cfg.jitter_bound(), Some(Duration::from_millis(250)));
/// ```
pub fn with_jitter(bound: Duration) -> TickerOption {
    TickerOption::Jitter(bound)
}
