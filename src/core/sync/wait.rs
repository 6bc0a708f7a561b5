/*!
 * Predicate Waits
 *
 * Policy layer over any `TimedWait` primitive: block until a caller-supplied
 * predicate over the guarded state holds.
 *
 * Every wakeup, whether signal, broadcast or spurious, is handled the same way:
 * the predicate is evaluated again with the mutex held. A wakeup is never taken
 * as proof that the state changed.
 *
 * # Bounded Variants
 *
 * - `wait_for_pred`: one deadline fixed at entry; extra wakeups do not extend it
 * - `defer_for`: the delay is re-armed after every wakeup, so it only returns
 *   `false` after a full quiet period (debounce)
 */

use super::traits::TimedWait;
use crate::core::errors::SyncResult;
use crate::core::time::MonotonicTime;
use parking_lot::MutexGuard;
use std::time::Duration;

/// Predicate-gated waits, available on every [`TimedWait`] primitive
///
/// Predicates receive the guarded state and run only while the mutex is held.
/// They may be evaluated many times per call and should be cheap.
///
/// # Examples
///
/// ```
/// use monosync::core::sync::{MonotonicCondvar, PredicateWait};
/// use parking_lot::Mutex;
/// use std::sync::Arc;
/// use std::thread;
/// use std::time::Duration;
///
/// let cv = Arc::new(MonotonicCondvar::new().unwrap());
/// let queue = Arc::new(Mutex::new(Vec::<u32>::new()));
///
/// let producer = {
///     let (cv, queue) = (cv.clone(), queue.clone());
///     thread::spawn(move || {
///         queue.lock().push(7);
///         cv.signal();
///     })
/// };
///
/// let mut guard = queue.lock();
/// let ready = cv
///     .wait_for_pred(&mut guard, Duration::from_secs(5), |q| !q.is_empty())
///     .unwrap();
/// assert!(ready);
/// assert_eq!(guard.pop(), Some(7));
/// drop(guard);
/// producer.join().unwrap();
/// ```
pub trait PredicateWait<T: ?Sized>: TimedWait<T> {
    /// Block until `ready` returns true. No timeout.
    fn wait_pred<F>(&self, guard: &mut MutexGuard<'_, T>, mut ready: F) -> SyncResult<()>
    where
        F: FnMut(&mut T) -> bool,
    {
        while !ready(&mut **guard) {
            self.wait(guard)?;
        }
        Ok(())
    }

    /// Block until `ready` returns true or the bound clock reaches `deadline`
    ///
    /// Returns the predicate's value at exit: `false` means the deadline passed
    /// with the condition still unmet.
    fn wait_until_pred<F>(
        &self,
        guard: &mut MutexGuard<'_, T>,
        deadline: MonotonicTime,
        mut ready: F,
    ) -> SyncResult<bool>
    where
        F: FnMut(&mut T) -> bool,
    {
        while !ready(&mut **guard) {
            if self.wait_until(guard, deadline)?.timed_out() {
                // The condition may have become true as the deadline was reached
                return Ok(ready(&mut **guard));
            }
        }
        Ok(true)
    }

    /// Block until `ready` returns true or `timeout` has elapsed
    ///
    /// The deadline is computed once, at entry.
    fn wait_for_pred<F>(
        &self,
        guard: &mut MutexGuard<'_, T>,
        timeout: Duration,
        ready: F,
    ) -> SyncResult<bool>
    where
        F: FnMut(&mut T) -> bool,
    {
        let deadline = self.deadline_after(timeout)?;
        self.wait_until_pred(guard, deadline, ready)
    }

    /// Block until `ready` returns true or `delay` passes with no wakeup
    ///
    /// Each wakeup restarts the delay from that instant. Returns `true` if the
    /// predicate was satisfied, `false` once a full quiet `delay` elapsed.
    fn defer_for<F>(
        &self,
        guard: &mut MutexGuard<'_, T>,
        delay: Duration,
        mut ready: F,
    ) -> SyncResult<bool>
    where
        F: FnMut(&mut T) -> bool,
    {
        while !ready(&mut **guard) {
            if self.wait_for(guard, delay)?.timed_out() {
                return Ok(false);
            }
        }
        Ok(true)
    }
}

impl<T: ?Sized, W: TimedWait<T> + ?Sized> PredicateWait<T> for W {}
