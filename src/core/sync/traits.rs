/*!
 * Synchronization Traits
 *
 * Outcome types and the primitive-layer contract the predicate waits are
 * written against.
 *
 * # Design: Trait Seam Between Layers
 *
 * `PredicateWait` is implemented once over `TimedWait`, so the policy loops
 * never depend on how a primitive blocks. `MonotonicCondvar` is the production
 * implementation; tests drive the same loops with a scripted primitive.
 */

use crate::core::errors::SyncResult;
use crate::core::time::MonotonicTime;
use parking_lot::MutexGuard;
use std::time::Duration;

/// Result of a wake operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WakeResult {
    /// Woke N waiters (N >= 1)
    Woken(usize),
    /// Nobody was blocked; the signal had no effect
    NoWaiters,
}

impl WakeResult {
    #[inline(always)]
    pub(crate) fn from_count(count: usize) -> Self {
        if count == 0 {
            WakeResult::NoWaiters
        } else {
            WakeResult::Woken(count)
        }
    }

    /// Check if any waiters were woken
    #[inline(always)]
    pub fn is_woken(&self) -> bool {
        matches!(self, WakeResult::Woken(_))
    }

    /// Number of woken waiters (0 if none)
    #[inline(always)]
    pub fn count(&self) -> usize {
        match self {
            WakeResult::Woken(n) => *n,
            WakeResult::NoWaiters => 0,
        }
    }
}

/// How a bounded wait ended
///
/// `Signaled` does not mean the caller's condition holds: it also covers
/// spurious wakeups. Always re-check.
#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitStatus {
    /// Woken before the deadline (signal, broadcast or spurious)
    Signaled,
    /// The bound clock reached the deadline
    TimedOut,
}

impl WaitStatus {
    #[inline(always)]
    pub fn timed_out(&self) -> bool {
        matches!(self, WaitStatus::TimedOut)
    }
}

/// Blocking primitive bound to a monotonic clock
///
/// Every method takes the guard of the mutex protecting the waited-on state.
/// The mutex is released while blocked and held again when the call returns,
/// whatever the outcome.
pub trait TimedWait<T: ?Sized> {
    /// Current reading of the bound clock
    fn now(&self) -> SyncResult<MonotonicTime>;

    /// Block until woken. May return spuriously.
    fn wait(&self, guard: &mut MutexGuard<'_, T>) -> SyncResult<()>;

    /// Block until woken or until the bound clock reaches `deadline`
    fn wait_until(
        &self,
        guard: &mut MutexGuard<'_, T>,
        deadline: MonotonicTime,
    ) -> SyncResult<WaitStatus>;

    /// Absolute deadline `interval` from now; saturates for huge intervals
    fn deadline_after(&self, interval: Duration) -> SyncResult<MonotonicTime> {
        Ok(self.now()?.saturating_add(interval))
    }

    /// Block until woken or until `interval` has elapsed on the bound clock
    ///
    /// A zero interval sets the deadline to the current reading.
    fn wait_for(
        &self,
        guard: &mut MutexGuard<'_, T>,
        interval: Duration,
    ) -> SyncResult<WaitStatus> {
        let deadline = self.deadline_after(interval)?;
        self.wait_until(guard, deadline)
    }
}
