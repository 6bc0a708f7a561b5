/*!
 * Time and Synchronization Constants
 *
 * Centralized location for the unit conversions and thresholds used by the
 * clock arithmetic and the wait primitives.
 */

use std::time::Duration;

// =============================================================================
// UNIT CONVERSIONS
// =============================================================================

/// Nanoseconds in one second
/// Upper (exclusive) bound of the nanosecond field of a normalized timestamp
pub const NANOS_PER_SEC: u32 = 1_000_000_000;

/// Nanoseconds in one millisecond
pub const NANOS_PER_MILLI: u32 = 1_000_000;

/// Milliseconds in one second
pub const MILLIS_PER_SEC: u64 = 1_000;

/// Microseconds in one second
pub const MICROS_PER_SEC: u64 = 1_000_000;

/// Nanoseconds in one microsecond
pub const NANOS_PER_MICRO: u32 = 1_000;

// =============================================================================
// WAIT THRESHOLDS
// =============================================================================

/// Maximum number of times a timed wait re-blocks after the platform reported
/// a timeout that the bound clock has not reached yet.
/// Past this the wakeup is reported as spurious.
pub const CLOCK_SKEW_RETRIES: u32 = 64;

/// Longest single park when the bound clock is not `CLOCK_MONOTONIC`.
/// Parks always run on the monotonic clock, which stops during suspend while
/// `CLOCK_BOOTTIME` keeps counting; the bound clock is re-read after every
/// slice, so a deadline passed while suspended is noticed within one slice.
pub const BOUND_CLOCK_PARK_SLICE: Duration = Duration::from_millis(250);

// =============================================================================
// DEMO DEFAULTS
// =============================================================================

/// Default quiet period for the debounce demo (50ms)
pub const DEMO_DEFAULT_DELAY: Duration = Duration::from_millis(50);

/// Default number of events produced by the debounce demo
pub const DEMO_DEFAULT_EVENTS: usize = 20;

/// Default spacing between produced events in the debounce demo (5ms)
pub const DEMO_DEFAULT_SPACING: Duration = Duration::from_millis(5);
