//! # Example: poll_with_backoff
//!
//! Polls a flaky dependency with an [`Exponential`] ticker. Probes start every
//! 100ms and back off by 2× (plus up to 50ms of jitter) while the dependency is
//! down; the ticker is stopped as soon as a probe succeeds.
//!
//! ## Flow
//! ```text
//! Exponential::builder(100ms, 2.0)
//!   ├─► [started] interval=100ms
//!   ├─► probe #1 → down   [tick] n=1 next_interval=200ms
//!   ├─► probe #2 → down   [tick] n=2 next_interval=400ms
//!   ├─► ...
//!   ├─► probe #5 → up     stop()
//!   └─► [stop-requested] [stopped] delivered=5
//! ```
//!
//! ## Run
//! ```bash
//! cargo run --example poll_with_backoff --features logging
//! ```

use std::{
    sync::Arc,
    sync::atomic::{AtomicU32, Ordering},
    time::Duration,
};
use tickers::{Exponential, LogWriter, Subscribe};

static PROBES: AtomicU32 = AtomicU32::new(0);

/// Pretends to check a dependency that comes up on the fifth probe.
async fn probe() -> bool {
    PROBES.fetch_add(1, Ordering::Relaxed) + 1 >= 5
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let subs: Vec<Arc<dyn Subscribe>> = vec![Arc::new(LogWriter::new())];

    let ticker = Exponential::builder(Duration::from_millis(100), 2.0)
        .with_jitter(Duration::from_millis(50))
        .with_subscribers(subs)
        .build();

    let start = tokio::time::Instant::now();
    while let Some(at) = ticker.tick().await {
        let up = probe().await;
        println!(
            "[probe] at=+{:?} up={up}",
            at.duration_since(start)
        );
        if up {
            ticker.stop();
        }
    }

    ticker.shutdown().await;
}
