/*!
 * Monotonic Time
 *
 * Clock access and deadline arithmetic for the wait primitives:
 * - `ClockSource`: which kernel clock a condition variable is bound to
 * - `MonotonicTime`: normalized `(seconds, nanoseconds)` reading on that clock
 * - Uptime helpers for passive timers
 *
 * Deadlines are only ever computed from monotonic readings. Wall-clock time
 * (`epoch_nanos`) is exposed for log correlation and nothing else.
 */

mod clock;
mod timestamp;
mod uptime;

pub use clock::ClockSource;
pub use timestamp::MonotonicTime;
pub use uptime::{epoch_nanos, is_expired, uptime_micros};
