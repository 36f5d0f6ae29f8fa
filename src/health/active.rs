//! Active health polling.
//!
//! # Responsibilities
//! - Refresh every indicator on each tick of the injected ticker
//! - Wait for a whole round before waiting on the next tick
//! - Stop on the shutdown broadcast

use std::sync::Arc;

use futures_util::future::join_all;
use tokio::sync::broadcast;

use crate::health::indicator::HealthIndicator;
use crate::health::schedule::Ticker;

pub struct HealthMonitor {
    indicators: Vec<Arc<dyn HealthIndicator>>,
}

impl HealthMonitor {
    pub fn new(indicators: Vec<Arc<dyn HealthIndicator>>) -> Self {
        Self { indicators }
    }

    pub async fn run<T: Ticker>(self, mut ticker: T, mut shutdown: broadcast::Receiver<()>) {
        tracing::info!(indicators = self.indicators.len(), "Health monitor starting");

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.poll_all().await;
                }
                _ = shutdown.recv() => {
                    tracing::info!("Health monitor received shutdown signal, exiting loop");
                    break;
                }
            }
        }
    }

    /// Refresh every indicator concurrently.
    pub async fn poll_all(&self) {
        let results = join_all(self.indicators.iter().map(|i| i.refresh())).await;

        let down: Vec<&str> = results
            .iter()
            .filter(|r| !r.is_up())
            .map(|r| r.key.as_str())
            .collect();

        if down.is_empty() {
            tracing::debug!(checked = results.len(), "Health poll complete, all dependencies up");
        } else {
            tracing::warn!(checked = results.len(), down = ?down, "Health poll complete with failures");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::health::error::HealthCheckError;
    use crate::health::result::IndicatorResult;
    use crate::health::schedule::manual_ticker;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    struct CountingIndicator {
        refreshes: AtomicUsize,
    }

    #[async_trait]
    impl HealthIndicator for CountingIndicator {
        fn key(&self) -> &str {
            "counting"
        }

        async fn test_health(&self) -> IndicatorResult {
            IndicatorResult::up("counting")
        }

        async fn is_healthy(&self) -> Result<IndicatorResult, HealthCheckError> {
            Ok(IndicatorResult::up("counting"))
        }

        async fn refresh(&self) -> IndicatorResult {
            self.refreshes.fetch_add(1, Ordering::SeqCst);
            IndicatorResult::up("counting")
        }
    }

    async fn wait_for(counter: &AtomicUsize, expected: usize) {
        for _ in 0..100 {
            if counter.load(Ordering::SeqCst) >= expected {
                return;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    }

    #[tokio::test]
    async fn test_refreshes_on_each_tick_and_stops_on_shutdown() {
        let indicator = Arc::new(CountingIndicator {
            refreshes: AtomicUsize::new(0),
        });
        let monitor = HealthMonitor::new(vec![indicator.clone() as Arc<dyn HealthIndicator>]);
        let (ticker, ticks) = manual_ticker();
        let (shutdown_tx, shutdown_rx) = broadcast::channel(1);

        let task = tokio::spawn(monitor.run(ticker, shutdown_rx));

        // Nothing happens without a tick.
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(indicator.refreshes.load(Ordering::SeqCst), 0);

        ticks.tick();
        wait_for(&indicator.refreshes, 1).await;
        assert_eq!(indicator.refreshes.load(Ordering::SeqCst), 1);

        ticks.tick();
        ticks.tick();
        wait_for(&indicator.refreshes, 3).await;
        assert_eq!(indicator.refreshes.load(Ordering::SeqCst), 3);

        shutdown_tx.send(()).unwrap();
        tokio::time::timeout(Duration::from_secs(1), task)
            .await
            .expect("monitor should exit")
            .unwrap();
    }
}
