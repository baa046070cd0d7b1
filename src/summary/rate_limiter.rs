// Minimum-interval rate limiter for text-generation calls.
//
// Hosted LLM free tiers cap requests per second. Every call waits until at
// least `interval` has passed since the previous one was let through.

use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::time::{Duration, Instant};

/// A simple rate limiter that enforces a maximum request rate.
#[derive(Clone)]
pub struct RateLimiter {
    inner: Arc<Mutex<RateLimiterInner>>,
}

struct RateLimiterInner {
    /// Minimum time between requests
    interval: Duration,
    /// When the last request was allowed through
    last_request: Option<Instant>,
}

impl RateLimiter {
    /// Create a limiter allowing `requests_per_second` requests per second.
    /// Non-positive rates are treated as one request per second.
    pub fn new(requests_per_second: f64) -> Self {
        let rps = if requests_per_second > 0.0 {
            requests_per_second
        } else {
            1.0
        };
        Self {
            inner: Arc::new(Mutex::new(RateLimiterInner {
                interval: Duration::from_secs_f64(1.0 / rps),
                last_request: None,
            })),
        }
    }

    /// Wait until a request is allowed, then return.
    pub async fn acquire(&self) {
        let mut inner = self.inner.lock().await;
        let now = Instant::now();

        if let Some(last) = inner.last_request {
            let elapsed = now.duration_since(last);
            if elapsed < inner.interval {
                let sleep_time = inner.interval - elapsed;
                // Lock held across the sleep: callers are admitted one interval apart.
                tokio::time::sleep(sleep_time).await;
            }
        }

        inner.last_request = Some(Instant::now());
    }
}
