use std::{sync::Arc, time::Duration};

use tokio::{runtime::Handle, sync::mpsc};

use super::{
    config::{TickerConfig, TickerOption, with_jitter},
    driver::Driver,
    gate::StopGate,
    ticker::Exponential,
    ticks::Ticks,
};
use crate::{
    error::TickerError,
    events::Bus,
    policies::{JitterPolicy, JitterSource, UniformJitter},
    subscribers::{Subscribe, SubscriberSet},
};

/// Builder for an [`Exponential`] ticker with optional jitter source and subscribers.
pub struct ExponentialBuilder {
    cfg: TickerConfig,
    jitter_source: Box<dyn JitterSource>,
    subscribers: Vec<Arc<dyn Subscribe>>,
}

impl ExponentialBuilder {
    /// Creates a builder for a ticker starting at `initial` and growing by `factor`.
    pub fn new(initial: Duration, factor: f64) -> Self {
        Self::from_config(TickerConfig::new(initial, factor))
    }

    /// Creates a builder from a prepared configuration.
    pub fn from_config(cfg: TickerConfig) -> Self {
        Self {
            cfg,
            jitter_source: Box::new(UniformJitter),
            subscribers: Vec::new(),
        }
    }

    /// Applies a construction option.
    pub fn option(mut self, opt: TickerOption) -> Self {
        self.cfg.apply([opt]);
        self
    }

    /// Adds up to `bound` of random extra wait to every interval (zero = no-op).
    pub fn with_jitter(self, bound: Duration) -> Self {
        self.option(with_jitter(bound))
    }

    /// Replaces the jitter sample source (default: [`UniformJitter`]).
    ///
    /// Only consulted when a non-zero jitter bound is configured.
    pub fn with_jitter_source(mut self, source: impl JitterSource) -> Self {
        self.jitter_source = Box::new(source);
        self
    }

    /// Sets event subscribers for observability.
    ///
    /// Subscribers receive ticker events through dedicated workers with bounded
    /// queues; they can never slow the ticks down.
    pub fn with_subscribers(mut self, subscribers: Vec<Arc<dyn Subscribe>>) -> Self {
        self.subscribers = subscribers;
        self
    }

    /// Sets the event bus capacity (min 1).
    pub fn with_bus_capacity(mut self, capacity: usize) -> Self {
        self.cfg.bus_capacity = capacity;
        self
    }

    /// Builds and starts the ticker.
    ///
    /// # Panics
    /// On an invalid configuration (zero interval, factor `<= 1.0`, non-finite
    /// factor) or outside of a tokio runtime. Use [`try_build`](Self::try_build)
    /// to get the error instead.
    pub fn build(self) -> Exponential {
        match self.try_build() {
            Ok(ticker) => ticker,
            Err(e) => panic!("{e}"),
        }
    }

    /// Builds and starts the ticker, reporting contract violations as errors.
    ///
    /// This initializes, in order:
    /// - Event bus
    /// - Subscriber workers and their listener (only if subscribers were given)
    /// - Stop gate and tick handoff
    /// - The timing loop task
    pub fn try_build(self) -> Result<Exponential, TickerError> {
        let growth = self.cfg.validate()?;
        let runtime = Handle::try_current().map_err(|_| TickerError::NoRuntime)?;

        let bus = Bus::new(self.cfg.bus_capacity_clamped());

        let listener = if self.subscribers.is_empty() {
            None
        } else {
            let rx = bus.subscribe();
            let set = SubscriberSet::new(self.subscribers, bus.clone());
            Some(runtime.spawn(set.listen(rx)))
        };

        let gate = StopGate::new(bus.clone());
        let (slot_tx, slot_rx) = mpsc::channel(1);
        let jitter = match self.cfg.jitter_bound() {
            Some(bound) => JitterPolicy::new(bound, self.jitter_source),
            None => JitterPolicy::none(),
        };

        let driver = Driver::new(
            self.cfg.initial,
            growth,
            jitter,
            slot_tx,
            gate.token(),
            bus.clone(),
        );
        let task = runtime.spawn(driver.run());

        let ticks = Ticks::new(slot_rx, gate.token());
        Ok(Exponential::from_parts(ticks, gate, bus, task, listener))
    }
}
