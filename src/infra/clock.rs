//! Monotonic time source.

use std::time::Instant;

/// Source of monotonic timestamps for elapsed-time measurement.
/// 用于测量耗时的单调时间源。
pub trait Clock {
    fn now(&self) -> Instant;
}

/// The system's monotonic clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct MonotonicClock;

impl Clock for MonotonicClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}
