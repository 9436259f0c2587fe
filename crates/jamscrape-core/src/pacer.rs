//! Global request pacing for polite fetching.
//!
//! Every network fetch waits out a configured inter-request delay before
//! issuing its request. Pacing is global, not per-host: all requests go to
//! the same site, so concurrent callers serialise on one shared gap.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::Mutex;

/// Shared inter-request delay.
///
/// Cloning is cheap and all clones share the same last-request bookkeeping.
#[derive(Debug, Clone)]
pub struct Pacer {
    delay: Duration,
    last_request: Arc<Mutex<Option<Instant>>>,
}

impl Pacer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            last_request: Arc::new(Mutex::new(None)),
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Wait until the configured delay has elapsed since the previous
    /// request, then record the current time.
    ///
    /// The lock is held across the sleep: concurrent callers queue up
    /// behind it, which is exactly the global-gap guarantee.
    pub async fn wait(&self) {
        if self.delay.is_zero() {
            return;
        }
        let mut last = self.last_request.lock().await;
        if let Some(prev) = *last {
            let elapsed = prev.elapsed();
            if elapsed < self.delay {
                let remaining = self.delay - elapsed;
                tracing::debug!(sleep_ms = %remaining.as_millis(), "Pacing request");
                tokio::time::sleep(remaining).await;
            }
        }
        *last = Some(Instant::now());
    }
}

impl Default for Pacer {
    /// 1500 ms between requests, the stock delay for unauthenticated
    /// scraping of a shared site.
    fn default() -> Self {
        Self::new(Duration::from_millis(1500))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn consecutive_waits_observe_the_gap() {
        let pacer = Pacer::new(Duration::from_millis(50));
        let start = Instant::now();
        pacer.wait().await;
        pacer.wait().await;
        let elapsed = start.elapsed();
        assert!(
            elapsed >= Duration::from_millis(50),
            "second wait should have paused, elapsed: {elapsed:?}"
        );
    }

    #[tokio::test]
    async fn first_wait_does_not_sleep() {
        let pacer = Pacer::new(Duration::from_millis(200));
        let start = Instant::now();
        pacer.wait().await;
        assert!(start.elapsed() < Duration::from_millis(100));
    }

    #[tokio::test]
    async fn zero_delay_is_a_no_op() {
        let pacer = Pacer::new(Duration::ZERO);
        let start = Instant::now();
        for _ in 0..10 {
            pacer.wait().await;
        }
        assert!(start.elapsed() < Duration::from_millis(50));
    }

    #[tokio::test]
    async fn concurrent_callers_share_one_gap() {
        let pacer = Pacer::new(Duration::from_millis(40));
        let start = Instant::now();
        let mut handles = Vec::new();
        for _ in 0..3 {
            let pacer = pacer.clone();
            handles.push(tokio::spawn(async move { pacer.wait().await }));
        }
        for handle in handles {
            handle.await.unwrap();
        }
        // Three paced requests: at least two full gaps between them.
        assert!(start.elapsed() >= Duration::from_millis(80));
    }
}
