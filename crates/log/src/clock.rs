//! Time sources for timestamps and rate limiting

use std::time::Duration;

use parking_lot::Mutex;
use time::{OffsetDateTime, UtcOffset};

/// Source of capture timestamps
pub trait Clock: Send + Sync + 'static {
    /// Current wall-clock time
    fn now(&self) -> OffsetDateTime;

    /// Current time in whole seconds since the Unix epoch (0 before it)
    fn now_secs(&self) -> u64 {
        unix_secs(self.now())
    }
}

/// Whole seconds since the Unix epoch, 0 for earlier instants
pub(crate) fn unix_secs(at: OffsetDateTime) -> u64 {
    u64::try_from(at.unix_timestamp()).unwrap_or(0)
}

/// Wall clock in the local offset
///
/// The local offset is resolved once, by [`SystemClock::new`]. On unix the
/// `time` crate refuses to read it once the process runs more than one
/// thread, and the clock then falls back to UTC. Build the clock before
/// spawning threads, or pass the offset with [`SystemClock::with_offset`]:
///
/// ```rust
/// use std::sync::Arc;
///
/// use time::UtcOffset;
/// use vlog::{SystemClock, Vlog};
///
/// let offset = UtcOffset::from_hms(2, 0, 0).unwrap();
/// let log = Vlog::builder()
///     .clock(Arc::new(SystemClock::with_offset(offset)))
///     .build()
///     .unwrap();
/// # let _ = log;
/// ```
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    offset: UtcOffset,
}

impl SystemClock {
    /// Resolve the local offset now
    pub fn new() -> Self {
        Self {
            offset: UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC),
        }
    }

    /// Always report UTC
    pub const fn utc() -> Self {
        Self::with_offset(UtcOffset::UTC)
    }

    /// Report time in a fixed `offset`
    pub const fn with_offset(offset: UtcOffset) -> Self {
        Self { offset }
    }

    /// Offset applied to every timestamp
    pub const fn offset(&self) -> UtcOffset {
        self.offset
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> OffsetDateTime {
        OffsetDateTime::now_utc().to_offset(self.offset)
    }
}

/// Manually driven clock for tests and simulations
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<OffsetDateTime>,
}

impl ManualClock {
    /// Clock frozen at `start`
    pub fn new(start: OffsetDateTime) -> Self {
        Self {
            now: Mutex::new(start),
        }
    }

    /// Clock frozen at `secs` seconds after the Unix epoch (UTC)
    pub fn at_unix(secs: i64) -> Self {
        Self::new(OffsetDateTime::from_unix_timestamp(secs).unwrap_or(OffsetDateTime::UNIX_EPOCH))
    }

    /// Move forward
    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock();
        *now += by;
    }

    /// Jump to an arbitrary time, backwards included
    pub fn set(&self, to: OffsetDateTime) {
        *self.now.lock() = to;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> OffsetDateTime {
        *self.now.lock()
    }
}

#[cfg(test)]
mod tests {
    use time::macros::datetime;

    use super::*;

    #[test]
    fn test_manual_clock() {
        let clock = ManualClock::at_unix(1_704_110_400);
        assert_eq!(clock.now_secs(), 1_704_110_400);

        clock.advance(Duration::from_secs(3));
        assert_eq!(clock.now_secs(), 1_704_110_403);

        clock.set(OffsetDateTime::UNIX_EPOCH);
        assert_eq!(clock.now_secs(), 0);
    }

    #[test]
    fn test_pre_epoch_is_zero() {
        let clock = ManualClock::at_unix(-10);
        assert_eq!(clock.now_secs(), 0);
    }

    #[test]
    fn test_unix_secs_clamps() {
        assert_eq!(unix_secs(OffsetDateTime::UNIX_EPOCH), 0);
        assert_eq!(unix_secs(datetime!(1969-12-31 23:59:59 UTC)), 0);
        assert_eq!(unix_secs(datetime!(2024-01-01 12:00:00 UTC)), 1_704_110_400);
    }

    #[test]
    fn test_fixed_offset() {
        let offset = UtcOffset::from_hms(-5, 0, 0).unwrap();
        let clock = SystemClock::with_offset(offset);
        assert_eq!(clock.offset(), offset);
        assert_eq!(clock.now().offset(), offset);
        assert_eq!(SystemClock::utc().now().offset(), UtcOffset::UTC);
    }

    #[test]
    fn test_system_clock_moves() {
        let clock = SystemClock::utc();
        assert!(clock.now_secs() > 1_600_000_000);
    }
}
