//! The virtual clock
//!
//! Holds current simulated time in millis. Time only moves forward: an
//! attempt to move it backward is refused with a diagnostic, never a crash.

use tracing::warn;

#[derive(Debug, Clone, Default)]
pub struct SimClock {
    now_ms: i64,
}

impl SimClock {
    /// A clock at epoch
    pub fn new() -> Self {
        Self { now_ms: 0 }
    }

    /// Current simulated time, millis
    pub fn now(&self) -> i64 {
        self.now_ms
    }

    /// Advance to `time_ms`; a backward move is ignored
    pub fn set(&mut self, time_ms: i64) {
        if time_ms < self.now_ms {
            warn!("Time went backwards at {time_ms}, not updating simulator time");
            return;
        }
        self.now_ms = time_ms;
    }

    /// Rewind to epoch
    pub fn reset(&mut self) {
        self.now_ms = 0;
    }
}
