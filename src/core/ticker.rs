//! # Exponential: the ticker handle.
//!
//! [`Exponential`] is what callers hold. It is returned fully started: the timing
//! loop runs in its own tokio task from the moment of construction until
//! [`Exponential::stop`] is called or the handle is dropped.
//!
//! ## Lifecycle
//! ```text
//! new/build ──► Driver task spawned (Armed)
//!      │
//!      ├─► tick()/Ticks::recv() ──► Some(Instant) ...
//!      │
//!      └─► stop() / drop ──► StopGate fires once ──► Driver exits (Terminated)
//!                                                └─► recv() returns None forever
//! ```

use std::time::Duration;

use tokio::{sync::broadcast, task::JoinHandle, time::Instant};

use super::{builder::ExponentialBuilder, config::TickerOption, gate::StopGate, ticks::Ticks};
use crate::{
    error::TickerError,
    events::{Bus, Event},
};

/// A ticker whose interval grows exponentially, optionally with jitter.
///
/// The first tick fires after `initial`, the second `initial × factor` later, then
/// `initial × factor²`, and so on. Each interval is measured from the moment the
/// previous tick was accepted. A tick that no consumer asks for stays pending and
/// is handed to the next caller; it is dropped only if the ticker is stopped first.
///
/// Must be created inside a tokio runtime.
///
/// # Example
/// ```rust
/// use std::time::Duration;
/// use tickers::{Exponential, with_jitter};
///
/// #[tokio::main(flavor = "current_thread")]
/// async fn main() {
///     let ticker = Exponential::with_options(
///         Duration::from_millis(10),
///         2.0,
///         [with_jitter(Duration::from_millis(5))],
///     );
///
///     for _ in 0..3 {
///         let at = ticker.tick().await.expect("ticker is running");
///         println!("probe at {at:?}");
///     }
///     ticker.stop();
///     assert_eq!(ticker.tick().await, None);
/// }
/// ```
#[derive(Debug)]
pub struct Exponential {
    ticks: Ticks,
    gate: StopGate,
    bus: Bus,
    task: Option<JoinHandle<()>>,
    listener: Option<JoinHandle<()>>,
}

impl Exponential {
    /// Creates and starts a ticker.
    ///
    /// # Panics
    /// If `initial` is zero, if `factor <= 1.0`, if `factor` is NaN or infinite,
    /// or outside of a tokio runtime.
    pub fn new(initial: Duration, factor: f64) -> Self {
        ExponentialBuilder::new(initial, factor).build()
    }

    /// Creates and starts a ticker with construction options such as
    /// [`with_jitter`](crate::with_jitter).
    ///
    /// # Panics
    /// Same contract as [`Exponential::new`].
    pub fn with_options(
        initial: Duration,
        factor: f64,
        options: impl IntoIterator<Item = TickerOption>,
    ) -> Self {
        options
            .into_iter()
            .fold(ExponentialBuilder::new(initial, factor), |b, opt| {
                b.option(opt)
            })
            .build()
    }

    /// Creates and starts a ticker, returning an error instead of panicking.
    pub fn try_new(initial: Duration, factor: f64) -> Result<Self, TickerError> {
        ExponentialBuilder::new(initial, factor).try_build()
    }

    /// Returns a builder for custom jitter sources and subscribers.
    pub fn builder(initial: Duration, factor: f64) -> ExponentialBuilder {
        ExponentialBuilder::new(initial, factor)
    }

    pub(crate) fn from_parts(
        ticks: Ticks,
        gate: StopGate,
        bus: Bus,
        task: JoinHandle<()>,
        listener: Option<JoinHandle<()>>,
    ) -> Self {
        Self {
            ticks,
            gate,
            bus,
            task: Some(task),
            listener,
        }
    }

    /// Waits for the next tick. Returns `None` once the ticker is stopped.
    ///
    /// Shorthand for `self.ticks().recv()` without the clone.
    pub async fn tick(&self) -> Option<Instant> {
        self.ticks.recv().await
    }

    /// Returns a receive-only handle to the ticks, usable from other tasks.
    pub fn ticks(&self) -> Ticks {
        self.ticks.clone()
    }

    /// Stops the ticker.
    ///
    /// Safe to call any number of times, from any number of tasks; only the first
    /// call has an effect. Once it returns, no new tick is handed out. A tick that
    /// was already being handed over may still reach its consumer.
    pub fn stop(&self) {
        self.gate.stop();
    }

    /// Returns `true` once [`stop`](Self::stop) has been called (or the handle dropped).
    pub fn is_stopped(&self) -> bool {
        self.gate.is_stopped()
    }

    /// Returns `true` once the timing loop task has exited.
    pub fn is_terminated(&self) -> bool {
        self.task.as_ref().is_none_or(|t| t.is_finished())
    }

    /// Subscribes to this ticker's events.
    ///
    /// The receiver only sees events published after this call.
    pub fn events(&self) -> broadcast::Receiver<Event> {
        self.bus.subscribe()
    }

    /// Stops the ticker and waits until the timing loop (and subscriber workers,
    /// if any) have exited.
    pub async fn shutdown(mut self) {
        self.gate.stop();
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
        if let Some(listener) = self.listener.take() {
            let _ = listener.await;
        }
    }
}

impl Drop for Exponential {
    fn drop(&mut self) {
        self.gate.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{EventKind, Subscribe, with_jitter};
    use async_trait::async_trait;
    use futures::StreamExt;
    use std::sync::{Arc, Mutex};
    use tokio::time;

    /// Reads `n` ticks and returns the elapsed time before each one.
    async fn intervals(ticker: &Exponential, n: usize) -> Vec<Duration> {
        let mut out = Vec::with_capacity(n);
        let mut start = Instant::now();
        for i in 0..n {
            let got = ticker.tick().await.expect("ticker stopped early");
            let now = Instant::now();
            assert_eq!(got, now, "tick {i}: payload must be the delivery time");
            out.push(now - start);
            start = now;
        }
        out
    }

    fn drain(rx: &mut broadcast::Receiver<Event>) -> Vec<Event> {
        std::iter::from_fn(|| rx.try_recv().ok()).collect()
    }

    #[tokio::test(start_paused = true)]
    async fn test_factor_two_intervals() {
        let ticker = Exponential::new(Duration::from_secs(1), 2.0);
        assert_eq!(
            intervals(&ticker, 4).await,
            vec![
                Duration::from_secs(1),
                Duration::from_secs(2),
                Duration::from_secs(4),
                Duration::from_secs(8),
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_factor_three_intervals() {
        let ticker = Exponential::new(Duration::from_millis(500), 3.0);
        assert_eq!(
            intervals(&ticker, 4).await,
            vec![
                Duration::from_millis(500),
                Duration::from_millis(1500),
                Duration::from_millis(4500),
                Duration::from_millis(13500),
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_cumulative_tick_times() {
        let start = Instant::now();
        let ticker = Exponential::new(Duration::from_secs(1), 2.0);
        let mut offsets = Vec::new();
        for _ in 0..4 {
            offsets.push(ticker.tick().await.unwrap() - start);
        }
        assert_eq!(
            offsets,
            vec![
                Duration::from_secs(1),
                Duration::from_secs(3),
                Duration::from_secs(7),
                Duration::from_secs(15),
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_random_jitter_stays_in_bounds() {
        let cases = [
            (
                Duration::from_secs(1),
                2.0,
                Duration::from_millis(500),
                [1000, 2000, 4000, 8000],
            ),
            (
                Duration::from_millis(500),
                3.0,
                Duration::from_millis(250),
                [500, 1500, 4500, 13500],
            ),
        ];
        for (initial, factor, jitter, expected_min) in cases {
            let ticker = Exponential::with_options(initial, factor, [with_jitter(jitter)]);
            let got = intervals(&ticker, expected_min.len()).await;
            for (i, (elapsed, min_ms)) in got.into_iter().zip(expected_min).enumerate() {
                let min = Duration::from_millis(min_ms);
                let max = min + jitter;
                assert!(
                    elapsed >= min && elapsed <= max,
                    "interval {i}: expected between {min:?} and {max:?}, got {elapsed:?}"
                );
            }
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_jitter_is_not_carried_forward() {
        let ticker = Exponential::builder(Duration::from_millis(500), 3.0)
            .with_jitter(Duration::from_millis(250))
            .with_jitter_source(|bound: Duration| bound / 2)
            .build();
        assert_eq!(
            intervals(&ticker, 4).await,
            vec![
                Duration::from_millis(625),
                Duration::from_millis(1625),
                Duration::from_millis(4625),
                Duration::from_millis(13625),
            ]
        );
    }

    #[tokio::test]
    #[should_panic(expected = "factor must be greater than 1.0")]
    async fn test_factor_one_panics() {
        let _ = Exponential::new(Duration::from_secs(1), 1.0);
    }

    #[tokio::test]
    #[should_panic(expected = "initial interval must be positive")]
    async fn test_zero_interval_panics() {
        let _ = Exponential::new(Duration::ZERO, 2.0);
    }

    #[tokio::test]
    async fn test_try_new_reports_contract_violations() {
        assert_eq!(
            Exponential::try_new(Duration::ZERO, 2.0).unwrap_err(),
            TickerError::InvalidInterval {
                interval: Duration::ZERO
            }
        );
        assert_eq!(
            Exponential::try_new(Duration::from_secs(1), 0.9).unwrap_err(),
            TickerError::InvalidFactor { factor: 0.9 }
        );
        assert!(matches!(
            Exponential::try_new(Duration::from_secs(1), f64::INFINITY),
            Err(TickerError::NonFiniteFactor { .. })
        ));
    }

    #[test]
    fn test_outside_runtime_is_rejected() {
        assert_eq!(
            Exponential::try_new(Duration::from_secs(1), 2.0).unwrap_err(),
            TickerError::NoRuntime
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_ticks_after_stop() {
        for reads in [0usize, 2, 20] {
            let ticker = Exponential::new(Duration::from_secs(1), 2.0);
            for _ in 0..reads {
                ticker.tick().await.unwrap();
            }
            ticker.stop();

            time::sleep(Duration::from_secs(3600)).await;
            assert!(ticker.is_terminated(), "after {reads} reads");
            assert_eq!(ticker.tick().await, None, "after {reads} reads");
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_is_idempotent() {
        let ticker = Exponential::new(Duration::from_secs(1), 2.0);
        let mut events = ticker.events();

        ticker.stop();
        ticker.stop();
        assert!(ticker.is_stopped());
        ticker.shutdown().await;

        let stops = drain(&mut events)
            .iter()
            .filter(|ev| ev.kind == EventKind::StopRequested)
            .count();
        assert_eq!(stops, 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_stops() {
        let ticker = Arc::new(Exponential::new(Duration::from_millis(10), 2.0));
        let mut events = ticker.events();

        let handles: Vec<_> = (0..16)
            .map(|_| {
                let ticker = Arc::clone(&ticker);
                tokio::spawn(async move { ticker.stop() })
            })
            .collect();
        for h in handles {
            h.await.unwrap();
        }

        assert!(ticker.is_stopped());
        assert_eq!(ticker.tick().await, None);

        let ticker = Arc::try_unwrap(ticker).unwrap();
        ticker.shutdown().await;

        let stops = drain(&mut events)
            .iter()
            .filter(|ev| ev.kind == EventKind::StopRequested)
            .count();
        assert_eq!(stops, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_wakes_waiting_consumer() {
        let ticker = Exponential::new(Duration::from_secs(10), 2.0);
        let ticks = ticker.ticks();
        let waiter = tokio::spawn(async move { ticks.recv().await });

        time::sleep(Duration::from_secs(5)).await;
        ticker.stop();

        assert_eq!(waiter.await.unwrap(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_late_consumer_gets_pending_tick() {
        let start = Instant::now();
        let ticker = Exponential::new(Duration::from_secs(1), 2.0);

        time::sleep(Duration::from_secs(10)).await;
        let first = ticker.tick().await.unwrap();
        assert_eq!(first, start + Duration::from_secs(1));
        assert_eq!(Instant::now(), start + Duration::from_secs(10));

        assert_eq!(
            intervals(&ticker, 2).await,
            vec![Duration::from_secs(2), Duration::from_secs(4)]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_timed_out_receive_keeps_tick() {
        let start = Instant::now();
        let ticker = Exponential::new(Duration::from_secs(5), 2.0);

        let res = time::timeout(Duration::from_secs(1), ticker.tick()).await;
        assert!(res.is_err());

        let got = ticker.tick().await.unwrap();
        assert_eq!(got, start + Duration::from_secs(5));
        assert_eq!(
            intervals(&ticker, 1).await,
            vec![Duration::from_secs(10)]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropped_receive_keeps_pending_tick() {
        let start = Instant::now();
        let ticker = Exponential::new(Duration::from_secs(1), 2.0);

        let mut pending = Box::pin(ticker.tick());
        assert!(futures::poll!(&mut pending).is_pending());
        time::sleep(Duration::from_millis(1500)).await;
        drop(pending);

        assert_eq!(ticker.tick().await, Some(start + Duration::from_secs(1)));
        assert_eq!(
            ticker.tick().await,
            Some(start + Duration::from_millis(3500))
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_pending_tick_dropped_on_stop() {
        let ticker = Exponential::new(Duration::from_secs(1), 2.0);
        let mut events = ticker.events();

        time::sleep(Duration::from_secs(5)).await;
        ticker.shutdown().await;

        let kinds: Vec<_> = drain(&mut events).into_iter().map(|ev| ev.kind).collect();
        assert_eq!(
            kinds,
            vec![
                EventKind::TickerStarted,
                EventKind::StopRequested,
                EventKind::TickDropped,
                EventKind::TickerStopped,
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_events_trace_lifecycle() {
        let ticker = Exponential::new(Duration::from_secs(1), 2.0);
        let mut events = ticker.events();

        ticker.tick().await.unwrap();
        ticker.tick().await.unwrap();
        time::sleep(Duration::from_millis(1)).await;
        ticker.shutdown().await;

        let evs = drain(&mut events);
        let kinds: Vec<_> = evs.iter().map(|ev| ev.kind).collect();
        assert_eq!(
            kinds,
            vec![
                EventKind::TickerStarted,
                EventKind::TickDelivered,
                EventKind::TickDelivered,
                EventKind::StopRequested,
                EventKind::TickerStopped,
            ]
        );
        assert_eq!(evs[2].tick, Some(2));
        assert_eq!(evs[2].interval, Some(Duration::from_secs(4)));
        assert_eq!(evs[4].tick, Some(2));
        assert_eq!(evs[4].reason.as_deref(), Some("stop_requested"));
        assert!(evs.windows(2).all(|w| w[0].seq < w[1].seq));
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_stops_the_loop() {
        let ticker = Exponential::new(Duration::from_secs(1), 2.0);
        let ticks = ticker.ticks();
        drop(ticker);

        assert!(ticks.is_stopped());
        assert_eq!(ticks.recv().await, None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_ticks_as_stream() {
        let start = Instant::now();
        let ticker = Exponential::new(Duration::from_millis(100), 2.0);

        let offsets: Vec<Duration> = ticker
            .ticks()
            .into_stream()
            .take(3)
            .map(|at| at - start)
            .collect()
            .await;
        assert_eq!(
            offsets,
            vec![
                Duration::from_millis(100),
                Duration::from_millis(300),
                Duration::from_millis(700),
            ]
        );

        ticker.stop();
        let mut rest = std::pin::pin!(ticker.ticks().into_stream());
        assert_eq!(rest.next().await, None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_subscribers_see_every_event() {
        #[derive(Default)]
        struct Collect {
            seen: Mutex<Vec<EventKind>>,
        }

        #[async_trait]
        impl Subscribe for Collect {
            async fn on_event(&self, ev: &Event) {
                self.seen.lock().unwrap().push(ev.kind);
            }
        }

        let collect = Arc::new(Collect::default());
        let ticker = Exponential::builder(Duration::from_secs(1), 2.0)
            .with_subscribers(vec![collect.clone() as Arc<dyn Subscribe>])
            .build();

        ticker.tick().await.unwrap();
        time::sleep(Duration::from_millis(1)).await;
        ticker.shutdown().await;

        assert_eq!(
            *collect.seen.lock().unwrap(),
            vec![
                EventKind::TickerStarted,
                EventKind::TickDelivered,
                EventKind::StopRequested,
                EventKind::TickerStopped,
            ]
        );
    }
}
