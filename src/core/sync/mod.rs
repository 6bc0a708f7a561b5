/*!
 * Synchronization Primitives
 *
 * Condition variables timed on a monotonic clock, in two layers:
 * - Primitive: `MonotonicCondvar` (signal, broadcast, wait, wait_until, wait_for)
 * - Policy: `PredicateWait` (predicate waits with and without a deadline, and
 *   the debounce-style `defer_for`)
 *
 * # Use Cases
 *
 * - **Work queues**: sleep until items arrive or shutdown is requested
 * - **Batching**: collect a burst of events, act once it goes quiet
 * - **Timers**: periodic work immune to system time changes
 */

mod condvar;
mod config;
mod traits;
mod wait;

pub use condvar::MonotonicCondvar;
pub use config::SyncConfig;
pub use traits::{TimedWait, WaitStatus, WakeResult};
pub use wait::PredicateWait;
