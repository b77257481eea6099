//! Fixed-delay rate limiting for remote calls.
//!
//! The VK API rejects bursts, so the fetcher pauses after every batched
//! history call and before every profile lookup. The delay lives in an
//! explicit [`Throttle`] value injected into the fetcher instead of ad hoc
//! sleeps, so tests substitute [`Throttle::none`] and run instantly.
//!
//! # Example
//!
//! ```rust
//! use std::time::Duration;
//! use vkpack::throttle::Throttle;
//!
//! let throttle = Throttle::new(Duration::from_millis(250));
//! throttle.pause(); // blocks for 250ms
//!
//! let silent = Throttle::none();
//! silent.pause(); // returns immediately
//! ```

use std::thread;
use std::time::Duration;

/// A blocking, fixed-delay rate limiter.
///
/// Not a token bucket: every [`pause`](Self::pause) sleeps for the full
/// configured delay. That matches the one-call-per-second ceiling the
/// remote service enforces for this workload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Throttle {
    delay: Duration,
}

impl Throttle {
    /// Creates a throttle with the given delay per pause.
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    /// The one-second delay the VK rate limit calls for.
    pub fn standard() -> Self {
        Self::new(Duration::from_secs(1))
    }

    /// A zero-delay throttle for tests.
    pub fn none() -> Self {
        Self::new(Duration::ZERO)
    }

    /// Returns the configured delay.
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Blocks the current thread for the configured delay.
    pub fn pause(&self) {
        if !self.delay.is_zero() {
            thread::sleep(self.delay);
        }
    }
}

impl Default for Throttle {
    fn default() -> Self {
        Self::standard()
    }
}
