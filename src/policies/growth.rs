//! # Interval growth for the exponential ticker.
//!
//! [`Growth`] turns the current interval into the next one by multiplying it with a
//! constant factor. The result saturates at [`Duration::MAX`] instead of wrapping, and
//! it never shrinks: every call returns a value `>=` its input.
//!
//! Jitter is **not** part of the sequence. The ticker adds a fresh jitter sample to
//! each armed wait, but only the un-jittered interval is fed back into [`Growth::next`].
//!
//! # Example
//! ```rust
//! use std::time::Duration;
//! use tickers::Growth;
//!
//! let growth = Growth::new(2.0).unwrap();
//!
//! assert_eq!(growth.next(Duration::from_secs(1)), Duration::from_secs(2));
//! assert_eq!(growth.next(Duration::from_secs(2)), Duration::from_secs(4));
//!
//! // Saturates instead of overflowing.
//! assert_eq!(growth.next(Duration::MAX), Duration::MAX);
//! ```

use std::time::Duration;

use crate::error::TickerError;

/// Nanosecond counts below this are computed in integer nanoseconds (exact for the
/// usual millisecond/second inputs); above it the seconds path takes over.
const NANOS_EXACT_LIMIT: f64 = u64::MAX as f64;

/// Multiplicative interval growth.
///
/// The factor is validated on construction: it must be finite and strictly greater
/// than `1.0`, which is what keeps the interval sequence strictly growing until it
/// saturates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Growth {
    factor: f64,
}

impl Growth {
    /// Creates a growth policy, rejecting factors `<= 1.0`, NaN and infinities.
    pub fn new(factor: f64) -> Result<Self, TickerError> {
        if factor.is_nan() || factor.is_infinite() {
            return Err(TickerError::NonFiniteFactor { factor });
        }
        if factor <= 1.0 {
            return Err(TickerError::InvalidFactor { factor });
        }
        Ok(Self { factor })
    }

    /// Returns the growth factor.
    #[inline]
    pub fn factor(&self) -> f64 {
        self.factor
    }

    /// Computes `current × factor`, clamped to [`Duration::MAX`].
    ///
    /// # Notes
    /// - Fractional nanoseconds are truncated.
    /// - The result is never smaller than `current`, even when float rounding
    ///   near the top of the range would say otherwise.
    pub fn next(&self, current: Duration) -> Duration {
        let nanos = current.as_nanos() as f64 * self.factor;
        let next = if nanos < NANOS_EXACT_LIMIT {
            Duration::from_nanos(nanos as u64)
        } else {
            Duration::try_from_secs_f64(current.as_secs_f64() * self.factor)
                .unwrap_or(Duration::MAX)
        };
        next.max(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_doubling_sequence() {
        let growth = Growth::new(2.0).unwrap();
        let mut current = Duration::from_secs(1);
        let mut seen = Vec::new();
        for _ in 0..4 {
            seen.push(current);
            current = growth.next(current);
        }
        assert_eq!(
            seen,
            vec![
                Duration::from_secs(1),
                Duration::from_secs(2),
                Duration::from_secs(4),
                Duration::from_secs(8),
            ]
        );
    }

    #[test]
    fn test_tripling_from_millis() {
        let growth = Growth::new(3.0).unwrap();
        assert_eq!(
            growth.next(Duration::from_millis(500)),
            Duration::from_millis(1500)
        );
        assert_eq!(
            growth.next(Duration::from_millis(1500)),
            Duration::from_millis(4500)
        );
        assert_eq!(
            growth.next(Duration::from_millis(4500)),
            Duration::from_millis(13500)
        );
    }

    #[test]
    fn test_fractional_factor_truncates_nanos() {
        let growth = Growth::new(1.5).unwrap();
        assert_eq!(growth.next(Duration::from_nanos(3)), Duration::from_nanos(4));
    }

    #[test]
    fn test_rejects_non_growing_factors() {
        assert_eq!(
            Growth::new(1.0),
            Err(TickerError::InvalidFactor { factor: 1.0 })
        );
        assert_eq!(
            Growth::new(0.5),
            Err(TickerError::InvalidFactor { factor: 0.5 })
        );
        assert_eq!(
            Growth::new(-2.0),
            Err(TickerError::InvalidFactor { factor: -2.0 })
        );
    }

    #[test]
    fn test_rejects_non_finite_factors() {
        assert!(matches!(
            Growth::new(f64::NAN),
            Err(TickerError::NonFiniteFactor { .. })
        ));
        assert!(matches!(
            Growth::new(f64::INFINITY),
            Err(TickerError::NonFiniteFactor { .. })
        ));
        assert!(matches!(
            Growth::new(f64::NEG_INFINITY),
            Err(TickerError::NonFiniteFactor { .. })
        ));
    }

    #[test]
    fn test_large_interval_saturates() {
        let growth = Growth::new(1e6).unwrap();
        let huge = Duration::from_secs(u64::MAX / 1000);
        assert_eq!(growth.next(huge), Duration::MAX);
    }

    #[test]
    fn test_saturated_interval_stays_saturated() {
        let growth = Growth::new(f64::MAX).unwrap();
        let mut current = Duration::from_secs(1);
        for _ in 0..5 {
            current = growth.next(current);
            assert_eq!(current, Duration::MAX);
        }
    }

    #[test]
    fn test_never_decreases_near_the_top() {
        let growth = Growth::new(1.000_000_1).unwrap();
        let mut current = Duration::from_secs(u64::MAX - 10);
        for _ in 0..100 {
            let next = growth.next(current);
            assert!(next >= current, "{next:?} < {current:?}");
            current = next;
        }
    }

    #[test]
    fn test_crosses_the_nanosecond_limit() {
        let growth = Growth::new(4.0).unwrap();
        // ~5.8e18ns × 4 overflows u64 nanoseconds but fits in Duration.
        let current = Duration::from_nanos(u64::MAX / 3);
        let next = growth.next(current);
        assert!(next > current);
        assert!(next < Duration::MAX);
        let expected = current.as_secs_f64() * 4.0;
        assert!((next.as_secs_f64() - expected).abs() < 1.0);
    }
}
