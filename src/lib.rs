/*!
 * monosync
 * Condition variables timed on a monotonic clock
 *
 * - `core::sync`: the condition variable primitive and predicate waits
 * - `core::time`: clock sources and deadline arithmetic
 * - `monitoring`: tracing setup and wait spans
 */

pub mod core;
pub mod monitoring;

// Re-exports
pub use crate::core::errors::{ClockError, SyncError, SyncErrorKind, SyncResult};
pub use crate::core::sync::{
    MonotonicCondvar, PredicateWait, SyncConfig, TimedWait, WaitStatus, WakeResult,
};
pub use crate::core::time::{ClockSource, MonotonicTime};
pub use monitoring::{init_tracing, WaitSpan};
