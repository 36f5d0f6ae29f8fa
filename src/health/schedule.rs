//! Timer abstraction driving the health poller.
//!
//! Production code uses [`IntervalTicker`]; tests drive the poller tick by
//! tick with [`manual_ticker`].

use std::time::Duration;

use async_trait::async_trait;
use rand::Rng;
use tokio::sync::mpsc;
use tokio::time::{self, Instant, Interval, MissedTickBehavior};

/// Source of polling ticks.
#[async_trait]
pub trait Ticker: Send {
    /// Resolve when the next poll is due.
    async fn tick(&mut self);
}

/// Fixed-period ticker. The first tick fires one period (plus jitter) after
/// creation.
pub struct IntervalTicker {
    interval: Interval,
}

impl IntervalTicker {
    pub fn new(period: Duration, max_jitter: Duration) -> Self {
        let jitter = if max_jitter.is_zero() {
            Duration::ZERO
        } else {
            let ms = max_jitter.as_millis() as u64;
            Duration::from_millis(rand::thread_rng().gen_range(0..=ms))
        };

        let mut interval = time::interval_at(Instant::now() + period + jitter, period);
        // A slow round delays the schedule instead of bursting to catch up.
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        Self { interval }
    }
}

#[async_trait]
impl Ticker for IntervalTicker {
    async fn tick(&mut self) {
        self.interval.tick().await;
    }
}

/// Ticker that fires once per [`TickHandle::tick`] call.
pub struct ManualTicker {
    rx: mpsc::UnboundedReceiver<()>,
}

/// Trigger side of a [`ManualTicker`].
#[derive(Clone)]
pub struct TickHandle {
    tx: mpsc::UnboundedSender<()>,
}

impl TickHandle {
    /// Queue one tick.
    pub fn tick(&self) {
        let _ = self.tx.send(());
    }
}

/// Create a manually driven ticker and its handle.
pub fn manual_ticker() -> (ManualTicker, TickHandle) {
    let (tx, rx) = mpsc::unbounded_channel();
    (ManualTicker { rx }, TickHandle { tx })
}

#[async_trait]
impl Ticker for ManualTicker {
    async fn tick(&mut self) {
        if self.rx.recv().await.is_none() {
            // All handles dropped: no tick will ever come.
            std::future::pending::<()>().await;
        }
    }
}
