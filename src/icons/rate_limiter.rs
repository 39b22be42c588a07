//! Fixed pacing between icon requests.
//!
//! The pipeline issues requests one at a time. [`RateLimiter`] enforces a
//! fixed minimum gap between the end of one asset request and the start of
//! the next. It does not back off or adapt to server responses.
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//! use alchemy_core::icons::RateLimiter;
//!
//! # async fn example() {
//! let mut limiter = RateLimiter::new(Duration::from_millis(100));
//!
//! // First request proceeds immediately
//! limiter.acquire().await;
//! limiter.record_request();
//!
//! // Next request waits until 100ms have passed since the previous one ended
//! limiter.acquire().await;
//! # }
//! ```

use std::time::Duration;

use tokio::time::Instant;
use tracing::{debug, trace};

/// Default gap between icon requests (100 milliseconds).
pub const DEFAULT_REQUEST_DELAY: Duration = Duration::from_millis(100);

/// Enforces a fixed delay between consecutive requests.
#[derive(Debug, Clone)]
pub struct RateLimiter {
    delay: Duration,
    /// When the previous request finished; `None` before the first one.
    last_request: Option<Instant>,
}

impl RateLimiter {
    /// Creates a limiter with the given gap between requests.
    #[must_use]
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            last_request: None,
        }
    }

    /// Creates a limiter that never waits.
    #[must_use]
    pub fn disabled() -> Self {
        Self::new(Duration::ZERO)
    }

    #[must_use]
    pub fn is_disabled(&self) -> bool {
        self.delay.is_zero()
    }

    /// Waits until the configured gap since the previous request has passed.
    ///
    /// Returns how long it waited.
    pub async fn acquire(&mut self) -> Duration {
        if self.is_disabled() {
            return Duration::ZERO;
        }
        let Some(last) = self.last_request else {
            trace!("first request; no wait");
            return Duration::ZERO;
        };

        let ready_at = last + self.delay;
        let now = Instant::now();
        if ready_at <= now {
            return Duration::ZERO;
        }

        let wait = ready_at - now;
        debug!(wait_ms = wait.as_millis(), "pausing before next request");
        tokio::time::sleep_until(ready_at).await;
        wait
    }

    /// Marks the end of a request; the next [`acquire`](Self::acquire) is measured from here.
    pub fn record_request(&mut self) {
        self.last_request = Some(Instant::now());
    }
}
