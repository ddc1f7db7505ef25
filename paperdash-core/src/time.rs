//! Time sources for the dashboard
//!
//! The host supplies time; the core never reads a clock on its own.
//! - Wall clock (NTP-synchronised) drives season resolution
//! - Any monotonic millisecond counter is enough for staleness

/// Timestamp in milliseconds since the Unix epoch (or since boot for monotonic sources)
pub type Timestamp = u64;

/// Source of time for the dashboard
pub trait TimeSource {
    /// Current timestamp in milliseconds
    fn now(&self) -> Timestamp;

    /// Whether timestamps are wall-clock time (vs. time since boot)
    fn is_wall_clock(&self) -> bool;
}

/// System time source (requires std)
#[cfg(feature = "std")]
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemTime;

#[cfg(feature = "std")]
impl TimeSource for SystemTime {
    fn now(&self) -> Timestamp {
        use std::time::{SystemTime as StdSystemTime, UNIX_EPOCH};

        StdSystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as Timestamp
    }

    fn is_wall_clock(&self) -> bool {
        true
    }
}

/// Fixed time source for testing and replay
#[derive(Debug, Clone)]
pub struct FixedTime {
    timestamp: Timestamp,
    wall_clock: bool,
}

impl FixedTime {
    /// Monotonic-style source frozen at `timestamp`
    pub fn new(timestamp: Timestamp) -> Self {
        Self {
            timestamp,
            wall_clock: false,
        }
    }

    /// Wall-clock source frozen at `timestamp` (ms since epoch)
    pub fn wall_clock(timestamp: Timestamp) -> Self {
        Self {
            timestamp,
            wall_clock: true,
        }
    }

    /// Jump to `timestamp`
    pub fn set(&mut self, timestamp: Timestamp) {
        self.timestamp = timestamp;
    }

    /// Move forward by `ms`, stopping at `Timestamp::MAX`
    pub fn advance(&mut self, ms: u64) {
        self.timestamp = self.timestamp.saturating_add(ms);
    }
}

impl TimeSource for FixedTime {
    fn now(&self) -> Timestamp {
        self.timestamp
    }

    fn is_wall_clock(&self) -> bool {
        self.wall_clock
    }
}
