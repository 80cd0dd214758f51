//! Lightweight async rate limiter used for API request pacing.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::{sleep_until, Instant};

/// Spaces consecutive calls by a fixed cooldown. Idle time earns no credit, so bursts never happen.
#[derive(Clone, Debug)]
pub struct RateLimiter {
    cooldown: Duration,
    last_call: Arc<Mutex<Option<Instant>>>,
}

impl RateLimiter {
    /// Creates a limiter that enforces a minimum delay between requests.
    pub fn new(cooldown: Duration) -> Self {
        Self {
            cooldown,
            last_call: Arc::new(Mutex::new(None)),
        }
    }

    /// Waits until the cooldown since the previous acquire has passed, then records the new start.
    ///
    /// The lock is held across the sleep so two callers can never compute a wait
    /// from the same stale timestamp.
    pub async fn acquire(&self) {
        let mut guard = self.last_call.lock().await;
        if let Some(last) = *guard {
            let ready_at = last + self.cooldown;
            let now = Instant::now();
            if now < ready_at {
                tracing::trace!(wait_ms = (ready_at - now).as_millis() as u64, "rate limiter wait");
                sleep_until(ready_at).await;
            }
        }
        *guard = Some(Instant::now());
    }

    /// Returns configured cooldown interval.
    pub fn cooldown(&self) -> Duration {
        self.cooldown
    }
}
