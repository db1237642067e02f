//! Minimum-interval throttling for pull-based updates.

use std::time::{Duration, Instant};

/// Enforces a minimum interval between executions at one call site.
///
/// Calls inside the window are absorbed as no-ops; the caller keeps its
/// last result. A zero interval never throttles.
#[derive(Debug)]
pub struct Throttle {
    min_interval: Duration,
    last: Option<Instant>,
}

impl Throttle {
    /// Create a throttle with the given minimum interval.
    #[must_use]
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last: None,
        }
    }

    /// Whether the caller may run now. Stamps the window on success.
    pub fn acquire(&mut self) -> bool {
        let now = Instant::now();
        match self.last {
            Some(last) if now.duration_since(last) < self.min_interval => false,
            _ => {
                self.last = Some(now);
                true
            }
        }
    }
}
