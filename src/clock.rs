//! Local clock abstraction
//!
//! The countdown engine measures elapsed time on a monotonic clock so that
//! wall-clock adjustments never distort the per-question timing, while the
//! mid-game reconciliation compares a server-supplied wall-clock timestamp
//! against local wall-clock "now". Both readings go through this trait so
//! the timing logic stays deterministic under test.

use web_time::{Instant, SystemTime};

/// Source of local time readings for the session engine
///
/// Implementations must guarantee that successive [`Clock::now`] readings
/// never go backwards. No such guarantee exists for [`Clock::system_now`],
/// which mirrors whatever the platform wall clock reports.
pub trait Clock {
    /// Returns the current instant on the monotonic clock
    fn now(&self) -> Instant;

    /// Returns the current wall-clock time
    fn system_now(&self) -> SystemTime;
}

/// The platform clock
///
/// Uses `web-time`, which resolves to the standard library clocks on native
/// targets and to `performance.now()`/`Date.now()` on WASM.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn system_now(&self) -> SystemTime {
        SystemTime::now()
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn test_system_clock_monotonic() {
        let clock = SystemClock;
        let first = clock.now();
        let second = clock.now();
        assert!(second >= first);
    }

    #[test]
    fn test_system_clock_wall_reading() {
        let clock = SystemClock;
        let reading = clock.system_now();
        assert!(reading.duration_since(SystemTime::UNIX_EPOCH).is_ok());
    }
}
