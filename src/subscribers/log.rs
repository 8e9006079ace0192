//! # LogWriter: simple event printer
//!
//! A minimal subscriber that prints incoming [`Event`]s to stdout.
//! Use it for tests or demos.
//!
//! ## Example output
//! ```text
//! [started] interval=1s wait=1s
//! [tick] n=1 next_interval=2s wait=2s
//! [tick] n=2 next_interval=4s wait=4s
//! [saturated] after=57 interval=18446744073709551615.999999999s
//! [stop-requested]
//! [dropped] n=3 reason="stop_requested"
//! [stopped] delivered=2 reason="stop_requested"
//! ```

use crate::events::{Event, EventKind};
use crate::subscribers::Subscribe;
use async_trait::async_trait;
use std::time::Duration;

/// Event writer subscriber.
#[derive(Default)]
pub struct LogWriter;

impl LogWriter {
    /// Construct a new [`LogWriter`].
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Subscribe for LogWriter {
    async fn on_event(&self, e: &Event) {
        println!("{}", render(e));
    }

    fn name(&self) -> &'static str {
        "log"
    }
}

fn render(e: &Event) -> String {
    let n = e.tick.unwrap_or_default();
    let reason = e.reason.as_deref().unwrap_or("unknown");
    match e.kind {
        EventKind::TickerStarted => {
            format!("[started] interval={} wait={}", dur(e.interval), dur(e.wait))
        }
        EventKind::TickDelivered => {
            format!(
                "[tick] n={n} next_interval={} wait={}",
                dur(e.interval),
                dur(e.wait)
            )
        }
        EventKind::TickDropped => format!("[dropped] n={n} reason={reason:?}"),
        EventKind::IntervalSaturated => {
            format!("[saturated] after={n} interval={}", dur(e.interval))
        }
        EventKind::StopRequested => "[stop-requested]".to_string(),
        EventKind::TickerStopped => format!("[stopped] delivered={n} reason={reason:?}"),
        EventKind::SubscriberOverflow => format!("[subscriber-overflow] {reason}"),
        EventKind::SubscriberPanicked => format!("[subscriber-panicked] {reason}"),
    }
}

fn dur(d: Option<Duration>) -> String {
    d.map_or_else(|| "-".to_string(), |d| format!("{d:?}"))
}
