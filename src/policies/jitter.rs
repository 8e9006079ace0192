//! # Jitter for ticker waits.
//!
//! [`JitterPolicy`] adds a bounded random delay to every armed wait so that many
//! tickers started together drift apart instead of probing in lockstep.
//!
//! - The sample is drawn from a [`JitterSource`], uniform in `[0, bound)`.
//! - A fresh sample is drawn on every cycle; it only lengthens the current wait and
//!   never feeds back into the interval sequence.
//! - `bound == 0` disables jitter entirely (the source is never consulted).
//!
//! The default source is [`UniformJitter`] (thread-local `rand` generator). Tests can
//! plug in any `FnMut(Duration) -> Duration` closure instead.

use rand::Rng;
use std::fmt;
use std::time::Duration;

/// Source of uniformly distributed jitter samples.
///
/// Implementations must return a duration in `[0, bound)`. Values at or above
/// `bound` are clamped by [`JitterPolicy`], so a sloppy source can never push a
/// wait beyond `base + bound`.
///
/// Any `FnMut(Duration) -> Duration + Send + 'static` closure is a source:
/// ```rust
/// use std::time::Duration;
/// use tickers::JitterSource;
///
/// let mut half = |bound: Duration| bound / 2;
/// assert_eq!(half.sample(Duration::from_millis(100)), Duration::from_millis(50));
/// ```
pub trait JitterSource: Send + 'static {
    /// Draws one sample in `[0, bound)`. Called only with `bound > 0`.
    fn sample(&mut self, bound: Duration) -> Duration;
}

impl<F> JitterSource for F
where
    F: FnMut(Duration) -> Duration + Send + 'static,
{
    fn sample(&mut self, bound: Duration) -> Duration {
        self(bound)
    }
}

/// Uniform jitter backed by `rand`'s thread-local generator.
///
/// Samples at nanosecond resolution. Bounds beyond `u64::MAX` nanoseconds are
/// treated as `u64::MAX` nanoseconds (~584 years).
#[derive(Clone, Copy, Debug, Default)]
pub struct UniformJitter;

impl JitterSource for UniformJitter {
    fn sample(&mut self, bound: Duration) -> Duration {
        let nanos = bound.as_nanos().min(u128::from(u64::MAX)) as u64;
        if nanos == 0 {
            return Duration::ZERO;
        }
        let mut rng = rand::rng();
        Duration::from_nanos(rng.random_range(0..nanos))
    }
}

/// Jitter applied to every armed wait of a ticker.
pub struct JitterPolicy {
    bound: Duration,
    source: Box<dyn JitterSource>,
}

impl JitterPolicy {
    /// Creates a policy with the given bound and sample source.
    pub fn new(bound: Duration, source: Box<dyn JitterSource>) -> Self {
        Self { bound, source }
    }

    /// A policy that never adds jitter.
    pub fn none() -> Self {
        Self::new(Duration::ZERO, Box::new(UniformJitter))
    }

    /// Returns `base` plus a fresh sample in `[0, bound]`.
    ///
    /// With a zero bound, returns `base` unchanged. The sum saturates at [`Duration::MAX`].
    pub fn apply(&mut self, base: Duration) -> Duration {
        if self.bound.is_zero() {
            return base;
        }
        let extra = self.source.sample(self.bound).min(self.bound);
        base.saturating_add(extra)
    }
}

impl fmt::Debug for JitterPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JitterPolicy")
            .field("bound", &self.bound)
            .finish_non_exhaustive()
    }
}
