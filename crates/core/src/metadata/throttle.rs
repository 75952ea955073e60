//! Fixed-interval request spacing.

use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::{sleep, Instant};
use tracing::debug;

/// Guarantees a minimum pause after each request before the next one starts.
///
/// The first request passes immediately; each later one waits until
/// `interval` has elapsed since the previous one finished, as recorded by
/// [`RequestThrottle::complete`]. A request that is never completed is
/// spaced from its start instead.
#[derive(Debug)]
pub struct RequestThrottle {
    interval: Duration,
    last_request: Mutex<Option<Instant>>,
}

impl RequestThrottle {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_request: Mutex::new(None),
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Wait until the next request may be issued, then record it.
    pub async fn acquire(&self) {
        let mut last = self.last_request.lock().await;

        if let Some(last_time) = *last {
            let elapsed = last_time.elapsed();
            if elapsed < self.interval {
                let wait_time = self.interval - elapsed;
                debug!("Metadata rate limit: waiting {:?}", wait_time);
                sleep(wait_time).await;
            }
        }

        *last = Some(Instant::now());
    }

    /// Record that the request let through by [`acquire`](Self::acquire)
    /// has finished, successfully or not.
    pub async fn complete(&self) {
        *self.last_request.lock().await = Some(Instant::now());
    }
}
