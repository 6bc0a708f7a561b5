/*!
 * Monotonic Timestamp
 *
 * A point on a monotonic clock split into whole seconds and sub-second
 * nanoseconds, mirroring `struct timespec`.
 *
 * # Invariant
 *
 * The nanosecond field is always in `[0, NANOS_PER_SEC)`. Every constructor and
 * every addition carries nanosecond overflow into the seconds field; additions
 * that would overflow the seconds field return `None` (checked) or clamp to
 * `MonotonicTime::MAX` (saturating).
 */

use crate::core::limits::{
    MICROS_PER_SEC, MILLIS_PER_SEC, NANOS_PER_MICRO, NANOS_PER_MILLI, NANOS_PER_SEC,
};
use std::fmt;
use std::time::Duration;

/// Normalized reading of a monotonic clock
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonotonicTime {
    // Field order matters: derived `Ord` compares seconds first
    secs: i64,
    nanos: u32,
}

impl MonotonicTime {
    /// Clock origin
    pub const ZERO: Self = Self { secs: 0, nanos: 0 };

    /// Latest representable time; used as the deadline of unbounded waits
    pub const MAX: Self = Self {
        secs: i64::MAX,
        nanos: NANOS_PER_SEC - 1,
    };

    /// Build a timestamp, carrying excess nanoseconds into seconds
    ///
    /// Saturates to [`MonotonicTime::MAX`] if the carry overflows.
    pub fn new(secs: i64, nanos: u32) -> Self {
        Self::carry(secs, 0, nanos).unwrap_or(Self::MAX)
    }

    /// Whole seconds
    #[inline]
    pub const fn secs(&self) -> i64 {
        self.secs
    }

    /// Sub-second part in nanoseconds, always `< 1_000_000_000`
    #[inline]
    pub const fn subsec_nanos(&self) -> u32 {
        self.nanos
    }

    /// Add an interval expressed in whole milliseconds
    ///
    /// The interval is split into seconds and sub-second nanoseconds, the
    /// nanoseconds are added first and any overflow is carried into seconds.
    pub fn checked_add_millis(self, interval_ms: u64) -> Option<Self> {
        let whole_secs = interval_ms / MILLIS_PER_SEC;
        // < 1e9, and self.nanos < 1e9, so the sum fits in u32
        let sub_nanos = (interval_ms % MILLIS_PER_SEC) as u32 * NANOS_PER_MILLI;
        Self::carry(self.secs, whole_secs, self.nanos + sub_nanos)
    }

    /// Add an interval expressed in whole milliseconds, clamping at `MAX`
    pub fn saturating_add_millis(self, interval_ms: u64) -> Self {
        self.checked_add_millis(interval_ms).unwrap_or(Self::MAX)
    }

    /// Add an arbitrary interval
    pub fn checked_add(self, interval: Duration) -> Option<Self> {
        Self::carry(
            self.secs,
            interval.as_secs(),
            self.nanos + interval.subsec_nanos(),
        )
    }

    /// Add an arbitrary interval, clamping at `MAX`
    pub fn saturating_add(self, interval: Duration) -> Self {
        self.checked_add(interval).unwrap_or(Self::MAX)
    }

    /// Time elapsed from `earlier` to `self`, zero if `earlier` is not before `self`
    pub fn saturating_duration_since(self, earlier: Self) -> Duration {
        if self <= earlier {
            return Duration::ZERO;
        }

        let mut secs = self.secs.abs_diff(earlier.secs);
        let nanos = if self.nanos >= earlier.nanos {
            self.nanos - earlier.nanos
        } else {
            // Borrow one second; secs >= 1 here because self > earlier
            secs -= 1;
            self.nanos + NANOS_PER_SEC - earlier.nanos
        };

        Duration::new(secs, nanos)
    }

    /// Microseconds since the clock origin (negative readings count as zero)
    pub fn as_micros(&self) -> u64 {
        let secs = u64::try_from(self.secs).unwrap_or(0);
        secs.saturating_mul(MICROS_PER_SEC)
            .saturating_add(u64::from(self.nanos / NANOS_PER_MICRO))
    }

    /// Normalize `secs + add_secs` seconds and `nanos` nanoseconds
    #[inline]
    fn carry(secs: i64, add_secs: u64, nanos: u32) -> Option<Self> {
        let overflow = nanos / NANOS_PER_SEC;
        let nanos = nanos % NANOS_PER_SEC;

        let add = i64::try_from(add_secs)
            .ok()?
            .checked_add(i64::from(overflow))?;
        let secs = secs.checked_add(add)?;

        debug_assert!(nanos < NANOS_PER_SEC, "nanosecond field not normalized");
        Some(Self { secs, nanos })
    }
}

impl fmt::Display for MonotonicTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:09}s", self.secs, self.nanos)
    }
}
