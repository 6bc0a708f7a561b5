/*!
 * Clock Sources
 *
 * The monotonic clock domains a condition variable can be bound to. None of
 * them follow wall-clock adjustments (settimeofday, NTP steps); they differ in
 * whether NTP frequency slewing applies and whether system suspend is counted.
 */

use super::MonotonicTime;
use crate::core::errors::ClockError;
use crate::core::limits::NANOS_PER_SEC;
use nix::sys::time::TimeSpec;
use nix::time::{clock_gettime, ClockId};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Monotonic clock domain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClockSource {
    /// `CLOCK_MONOTONIC`: slewed by NTP, never stepped
    #[default]
    Monotonic,
    /// `CLOCK_MONOTONIC_RAW`: hardware rate, no NTP slewing (Linux/Android)
    MonotonicRaw,
    /// `CLOCK_BOOTTIME`: like `Monotonic` but keeps counting across suspend (Linux/Android)
    ///
    /// Waits bound to it re-read the clock at least every `BOUND_CLOCK_PARK_SLICE`.
    Boottime,
}

impl ClockSource {
    /// Clock used for uptime measurements: the raw clock where the platform has one
    pub const fn uptime_source() -> Self {
        #[cfg(any(target_os = "linux", target_os = "android"))]
        {
            ClockSource::MonotonicRaw
        }
        #[cfg(not(any(target_os = "linux", target_os = "android")))]
        {
            ClockSource::Monotonic
        }
    }

    /// Kernel name of the clock
    pub const fn name(&self) -> &'static str {
        match self {
            ClockSource::Monotonic => "CLOCK_MONOTONIC",
            ClockSource::MonotonicRaw => "CLOCK_MONOTONIC_RAW",
            ClockSource::Boottime => "CLOCK_BOOTTIME",
        }
    }

    /// Read the clock
    pub fn now(self) -> Result<MonotonicTime, ClockError> {
        let id = self.clock_id()?;
        let ts = clock_gettime(id).map_err(|errno| ClockError::Read { clock: self, errno })?;
        self.normalize(ts)
    }

    /// Point on this clock `interval` from now
    ///
    /// Intervals too large to represent yield [`MonotonicTime::MAX`].
    pub fn deadline_after(self, interval: Duration) -> Result<MonotonicTime, ClockError> {
        Ok(self.now()?.saturating_add(interval))
    }

    /// Point on this clock `interval_ms` milliseconds from now; `0` is the current reading
    pub fn deadline_after_ms(self, interval_ms: u64) -> Result<MonotonicTime, ClockError> {
        let now = self.now()?;
        if interval_ms == 0 {
            return Ok(now);
        }
        Ok(now.saturating_add_millis(interval_ms))
    }

    fn clock_id(self) -> Result<ClockId, ClockError> {
        match self {
            ClockSource::Monotonic => Ok(ClockId::CLOCK_MONOTONIC),
            #[cfg(any(target_os = "linux", target_os = "android"))]
            ClockSource::MonotonicRaw => Ok(ClockId::CLOCK_MONOTONIC_RAW),
            #[cfg(any(target_os = "linux", target_os = "android"))]
            ClockSource::Boottime => Ok(ClockId::CLOCK_BOOTTIME),
            #[allow(unreachable_patterns)]
            other => Err(ClockError::Unsupported { clock: other }),
        }
    }

    #[allow(clippy::useless_conversion)]
    fn normalize(self, ts: TimeSpec) -> Result<MonotonicTime, ClockError> {
        let raw_nanos = i64::from(ts.tv_nsec());
        let nanos = u32::try_from(raw_nanos)
            .ok()
            .filter(|n| *n < NANOS_PER_SEC)
            .ok_or(ClockError::OutOfRange {
                clock: self,
                nanos: raw_nanos,
            })?;

        Ok(MonotonicTime::new(i64::from(ts.tv_sec()), nanos))
    }
}

impl fmt::Display for ClockSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
