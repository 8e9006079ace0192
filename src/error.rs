//! Error types used when constructing a ticker.
//!
//! Only construction can fail. Once a ticker runs, slow consumers and stop races
//! are ordinary conditions rather than errors (see [`EventKind::TickDropped`](crate::EventKind::TickDropped)).
//!
//! [`TickerError`] provides helper methods (`as_label`, `as_message`) for logging/metrics,
//! the same shape the event subscribers use.

use std::time::Duration;
use thiserror::Error;

/// # Errors produced while building a ticker.
///
/// The panicking constructors ([`Exponential::new`](crate::Exponential::new),
/// [`ExponentialBuilder::build`](crate::ExponentialBuilder::build)) turn these into a panic;
/// the `try_*` variants hand them back to the caller.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TickerError {
    /// Initial interval was zero.
    #[error("initial interval must be positive, got {interval:?}")]
    InvalidInterval {
        /// The rejected interval.
        interval: Duration,
    },

    /// Growth factor was not strictly greater than 1.0.
    #[error("factor must be greater than 1.0, got {factor}")]
    InvalidFactor {
        /// The rejected factor.
        factor: f64,
    },

    /// Growth factor was NaN or infinite.
    #[error("factor must be a finite number, got {factor}")]
    NonFiniteFactor {
        /// The rejected factor.
        factor: f64,
    },

    /// Construction happened outside of a tokio runtime, so the timing loop could not be spawned.
    #[error("no tokio runtime available to spawn the timing loop")]
    NoRuntime,
}

impl TickerError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use tickers::TickerError;
    ///
    /// let err = TickerError::InvalidFactor { factor: 1.0 };
    /// assert_eq!(err.as_label(), "ticker_invalid_factor");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            TickerError::InvalidInterval { .. } => "ticker_invalid_interval",
            TickerError::InvalidFactor { .. } => "ticker_invalid_factor",
            TickerError::NonFiniteFactor { .. } => "ticker_non_finite_factor",
            TickerError::NoRuntime => "ticker_no_runtime",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            TickerError::InvalidInterval { interval } => format!("interval: {interval:?}"),
            TickerError::InvalidFactor { factor } => format!("factor: {factor} (<= 1.0)"),
            TickerError::NonFiniteFactor { factor } => format!("factor: {factor} (not finite)"),
            TickerError::NoRuntime => "no tokio runtime".to_string(),
        }
    }
}
