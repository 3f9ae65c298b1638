//! Periodic background refresh.
//!
//! [`refresh_loop`] refreshes immediately, then once per interval, until the
//! shutdown channel fires. Refresh errors are logged and never stop the loop.
//! [`RefreshScheduler`] owns such a loop as a tokio task.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use crate::aggregator::PriceFetcher;

/// Shortest refresh interval; shorter periods (including zero) are raised to it.
pub const MIN_PERIOD: Duration = Duration::from_millis(1);

/// Refresh `fetcher` now and every `period` until `shutdown_rx` changes or its
/// sender is dropped.
pub async fn refresh_loop(fetcher: &PriceFetcher, period: Duration, mut shutdown_rx: watch::Receiver<bool>) {
    if period < MIN_PERIOD {
        warn!("[scheduler] interval {period:?} too short, using {MIN_PERIOD:?}");
    }
    let period = period.max(MIN_PERIOD);
    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = ticker.tick() => {}
            _ = shutdown_rx.changed() => {
                info!("[scheduler] shutdown signal received");
                return;
            }
        }

        // Check shutdown before starting a refresh
        if *shutdown_rx.borrow() {
            info!("[scheduler] shutdown requested");
            return;
        }

        match fetcher.refresh().await {
            Ok(()) => debug!("[scheduler] refresh ok, next in {period:?}"),
            Err(e) => warn!("[scheduler] refresh failed: {e}, retrying in {period:?}"),
        }
    }
}

/// Stoppable background refresh task.
pub struct RefreshScheduler {
    shutdown_tx: Option<watch::Sender<bool>>,
    task: Option<tokio::task::JoinHandle<()>>,
}

impl RefreshScheduler {
    /// Spawn the refresh loop for `fetcher` on the current tokio runtime.
    pub fn start(fetcher: Arc<PriceFetcher>, period: Duration) -> Self {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        info!("[scheduler] starting, interval={period:?}");

        let task = tokio::spawn(async move {
            refresh_loop(&fetcher, period, shutdown_rx).await;
        });

        Self { shutdown_tx: Some(shutdown_tx), task: Some(task) }
    }

    /// Whether the loop task is still alive.
    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|t| !t.is_finished())
    }

    /// Signal the loop and wait for it to finish.
    ///
    /// A refresh already in flight completes first.
    pub async fn stop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(true);
        }
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::Provider;
    use crate::schema::Schema;
    use crate::test_util::StubTransport;

    const URL: &str = "https://bitpay.test/rates";

    fn fetcher(transport: &Arc<StubTransport>) -> Arc<PriceFetcher> {
        let t: Arc<dyn crate::transport::HttpTransport> = transport.clone();
        Arc::new(PriceFetcher::new(vec![Provider::new("bitpay", URL, Schema::BitPay, t)]))
    }

    #[tokio::test]
    async fn refreshes_immediately() {
        let transport = Arc::new(StubTransport::new().body(URL, r#"[{"code":"USD","rate":2.0}]"#));
        let f = fetcher(&transport);

        let mut scheduler = RefreshScheduler::start(Arc::clone(&f), Duration::from_secs(3600));
        tokio::time::sleep(Duration::from_millis(50)).await;

        assert_eq!(transport.calls(URL), 1);
        assert_eq!(f.get_exchange_rate("usd").await, Ok(2.0));
        scheduler.stop().await;
        assert!(!scheduler.is_running());
    }

    #[tokio::test]
    async fn zero_period_is_clamped_not_fatal() {
        let transport = Arc::new(StubTransport::new().body(URL, r#"[{"code":"USD","rate":2.0}]"#));
        let f = fetcher(&transport);

        let mut scheduler = RefreshScheduler::start(Arc::clone(&f), Duration::ZERO);
        tokio::time::sleep(Duration::from_millis(50)).await;

        assert!(scheduler.is_running());
        assert!(transport.calls(URL) >= 1);
        assert_eq!(f.get_exchange_rate("usd").await, Ok(2.0));
        scheduler.stop().await;
        assert!(!scheduler.is_running());
    }

    #[tokio::test]
    async fn keeps_going_after_failures() {
        let transport = Arc::new(StubTransport::new().fail(URL));
        let f = fetcher(&transport);

        let mut scheduler = RefreshScheduler::start(Arc::clone(&f), Duration::from_millis(20));
        tokio::time::sleep(Duration::from_millis(110)).await;
        assert!(scheduler.is_running());
        scheduler.stop().await;

        assert!(transport.calls(URL) >= 3, "calls = {}", transport.calls(URL));
    }

    #[tokio::test]
    async fn stop_halts_refreshes() {
        let transport = Arc::new(StubTransport::new().body(URL, r#"[{"code":"USD","rate":2.0}]"#));
        let f = fetcher(&transport);

        let mut scheduler = RefreshScheduler::start(Arc::clone(&f), Duration::from_millis(20));
        tokio::time::sleep(Duration::from_millis(30)).await;
        scheduler.stop().await;

        let after_stop = transport.calls(URL);
        tokio::time::sleep(Duration::from_millis(80)).await;
        assert_eq!(transport.calls(URL), after_stop);
    }

    #[tokio::test]
    async fn dropped_sender_ends_loop() {
        let transport = Arc::new(StubTransport::new());
        let f = fetcher(&transport);
        let (tx, rx) = watch::channel(false);
        drop(tx);
        // Returns instead of looping forever.
        tokio::time::timeout(Duration::from_secs(1), refresh_loop(&f, Duration::from_millis(10), rx))
            .await
            .unwrap();
    }
}
