use std::time::{Duration, Instant};

/// Fixed-rate throttle for generation steps.
///
/// Rendering may happen as often as the window asks for it; the ticker only
/// decides whether enough time has passed for the next generation.
#[derive(Debug, Clone, Copy)]
pub struct Ticker {
    interval: Duration,
    last_tick: Instant,
}

impl Ticker {
    pub fn new(interval: Duration, now: Instant) -> Self {
        Self { interval, last_tick: now }
    }

    pub fn is_due(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.last_tick) >= self.interval
    }

    pub fn mark(&mut self, now: Instant) {
        self.last_tick = now;
    }

    /// Instant at which the next tick becomes due.
    pub fn deadline(&self) -> Instant {
        self.last_tick + self.interval
    }

    /// Marks and returns `true` when a tick is due.
    pub fn poll(&mut self, now: Instant) -> bool {
        if self.is_due(now) {
            self.mark(now);
            true
        } else {
            false
        }
    }
}
