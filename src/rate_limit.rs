//! Minimum-interval rate limiting for outbound API calls.
//!
//! A limiter is an ordinary value owned by whoever makes the calls (usually
//! shared through an `Arc`), so independent clients never throttle each other.

use std::sync::Mutex;
use std::thread;
use std::time::{Duration, Instant};

use log::trace;

/// Enforces a minimum spacing between successive calls to [`RateLimiter::acquire`].
#[derive(Debug)]
pub struct RateLimiter {
    min_interval: Duration,
    last_call: Mutex<Option<Instant>>,
}

impl RateLimiter {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_call: Mutex::new(None),
        }
    }

    /// A limiter that never waits.
    pub fn unlimited() -> Self {
        Self::new(Duration::ZERO)
    }

    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }

    /// Block until the next call is allowed, then record it.
    ///
    /// Returns how long the caller waited.
    pub fn acquire(&self) -> Duration {
        // A poisoned lock only means another caller panicked mid-wait;
        // the stored timestamp is still usable.
        let mut last_call = self
            .last_call
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        let wait = match *last_call {
            Some(previous) => {
                (previous + self.min_interval).saturating_duration_since(Instant::now())
            }
            None => Duration::ZERO,
        };

        if !wait.is_zero() {
            trace!("Rate limiter waiting {:?}", wait);
            thread::sleep(wait);
        }

        *last_call = Some(Instant::now());
        wait
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::unlimited()
    }
}
