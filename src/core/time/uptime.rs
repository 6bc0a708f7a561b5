/*!
 * Uptime Helpers
 *
 * Passive timers measured in microseconds of uptime.
 */

use super::ClockSource;
use crate::core::errors::ClockError;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Current uptime in microseconds, read from [`ClockSource::uptime_source`]
pub fn uptime_micros() -> Result<u64, ClockError> {
    Ok(ClockSource::uptime_source().now()?.as_micros())
}

/// Whether at least `interval` has passed since `before_micros` (a value
/// previously returned by [`uptime_micros`])
pub fn is_expired(before_micros: u64, interval: Duration) -> Result<bool, ClockError> {
    let elapsed = uptime_micros()?.saturating_sub(before_micros);
    Ok(Duration::from_micros(elapsed) >= interval)
}

/// Wall-clock nanoseconds since the Unix epoch
///
/// Follows system time changes; use only to timestamp records, never to
/// compute deadlines. Returns 0 if the system clock is set before 1970.
pub fn epoch_nanos() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_uptime_advances() {
        let a = uptime_micros().unwrap();
        thread::sleep(Duration::from_millis(5));
        let b = uptime_micros().unwrap();
        assert!(b >= a + 4_900);
    }

    #[test]
    fn test_is_expired() {
        let start = uptime_micros().unwrap();
        assert!(!is_expired(start, Duration::from_secs(60)).unwrap());
        thread::sleep(Duration::from_millis(20));
        assert!(is_expired(start, Duration::from_millis(19)).unwrap());
    }

    #[test]
    fn test_future_start_is_not_expired() {
        let start = uptime_micros().unwrap() + 10_000_000;
        assert!(!is_expired(start, Duration::from_millis(1)).unwrap());
    }

    #[test]
    fn test_epoch_nanos_is_after_2020() {
        // 2020-01-01T00:00:00Z
        assert!(epoch_nanos() > 1_577_836_800u128 * 1_000_000_000);
    }
}
