/*!
 * Monotonic Condition Variable
 *
 * Condition variable whose timed waits are measured on a monotonic clock, so
 * setting the system time (settimeofday, NTP steps) never stretches or cuts
 * short a timeout.
 *
 * # Design
 *
 * Blocking is delegated to `parking_lot::Condvar`, which parks on the
 * monotonic `Instant` clock and retries interrupted futex waits internally.
 * Deadlines are kept on the bound `ClockSource`; each pass converts the
 * remaining time to a relative park and, when the park reports a timeout,
 * the bound clock is read again so `TimedOut` is only reported once the
 * deadline has really been reached on that clock.
 *
 * For clocks other than `CLOCK_MONOTONIC` each park is capped at
 * `BOUND_CLOCK_PARK_SLICE`. The park clock stops during suspend, so without
 * the cap a `CLOCK_BOOTTIME` deadline that expired while suspended would be
 * overshot by whatever park time was left.
 *
 * The mutex offered by the current waiters is tracked so a wait that offers a
 * different mutex fails with `SyncError::MutexMismatch` instead of tripping
 * the panic inside `parking_lot`.
 */

use super::config::SyncConfig;
use super::traits::{TimedWait, WaitStatus, WakeResult};
use crate::core::errors::{SyncError, SyncResult};
use crate::core::limits::{BOUND_CLOCK_PARK_SLICE, CLOCK_SKEW_RETRIES};
use crate::core::time::{ClockSource, MonotonicTime};
use parking_lot::{Condvar, Mutex, MutexGuard};
use std::time::Duration;
use tracing::{debug, trace, warn};

/// Mutex currently associated with the waiters
#[derive(Debug, Default)]
struct MutexBinding {
    /// Address of the bound mutex, 0 when nobody waits
    mutex: usize,
    waiters: usize,
}

/// Waiter slot held for the duration of one wait call
struct Registration<'a> {
    binding: &'a Mutex<MutexBinding>,
}

impl Drop for Registration<'_> {
    fn drop(&mut self) {
        let mut binding = self.binding.lock();
        binding.waiters -= 1;
        if binding.waiters == 0 {
            binding.mutex = 0;
        }
    }
}

/// Relative park for one pass of a timed wait, and whether it was capped
fn park_slice(clock: ClockSource, remaining: Duration) -> (Duration, bool) {
    match clock {
        ClockSource::Monotonic => (remaining, false),
        _ if remaining > BOUND_CLOCK_PARK_SLICE => (BOUND_CLOCK_PARK_SLICE, true),
        _ => (remaining, false),
    }
}

/// Condition variable bound to a monotonic clock
///
/// Used together with a `parking_lot::Mutex` guarding the state waiters care
/// about. The guard is passed to every wait; the mutex is released while the
/// thread is blocked and held again when the wait returns.
///
/// # Examples
///
/// ```
/// use monosync::core::sync::{MonotonicCondvar, TimedWait};
/// use parking_lot::Mutex;
/// use std::time::Duration;
///
/// let cv = MonotonicCondvar::new().unwrap();
/// let state = Mutex::new(false);
///
/// let mut guard = state.lock();
/// let status = cv.wait_for(&mut guard, Duration::from_millis(10)).unwrap();
/// assert!(status.timed_out());
/// ```
#[derive(Debug)]
pub struct MonotonicCondvar {
    inner: Condvar,
    clock: ClockSource,
    binding: Mutex<MutexBinding>,
}

impl MonotonicCondvar {
    /// Create a condition variable bound to `CLOCK_MONOTONIC`
    pub fn new() -> SyncResult<Self> {
        Self::with_config(SyncConfig::default())
    }

    /// Create a condition variable bound to the configured clock
    ///
    /// Fails with [`SyncError::Init`] if the clock is unsupported or cannot be
    /// read. The binding never changes afterwards.
    pub fn with_config(config: SyncConfig) -> SyncResult<Self> {
        let clock = config.clock;
        let now = clock.now().map_err(|err| {
            warn!(%clock, error = %err, "Condition variable clock binding failed");
            SyncError::Init(err)
        })?;

        debug!(%clock, %now, "Condition variable bound to clock");

        Ok(Self {
            inner: Condvar::new(),
            clock,
            binding: Mutex::new(MutexBinding::default()),
        })
    }

    /// Clock domain deadlines are measured on
    #[inline]
    pub fn clock(&self) -> ClockSource {
        self.clock
    }

    /// Current reading of the bound clock
    #[inline]
    pub fn now(&self) -> SyncResult<MonotonicTime> {
        self.clock.now().map_err(SyncError::Clock)
    }

    /// Absolute deadline `interval` from now on the bound clock
    #[inline]
    pub fn deadline_after(&self, interval: Duration) -> SyncResult<MonotonicTime> {
        Ok(self.now()?.saturating_add(interval))
    }

    /// Number of threads currently inside a wait call (for diagnostics)
    pub fn waiter_count(&self) -> usize {
        self.binding.lock().waiters
    }

    /// Wake at most one blocked thread
    ///
    /// Signals sent while nobody is blocked are lost; waiters must re-check
    /// their condition rather than rely on catching every signal.
    #[inline]
    pub fn signal(&self) -> WakeResult {
        let woken = self.inner.notify_one();
        trace!(woken, "Condition variable signaled");
        WakeResult::from_count(usize::from(woken))
    }

    /// Wake every blocked thread
    #[inline]
    pub fn broadcast(&self) -> WakeResult {
        let woken = self.inner.notify_all();
        trace!(woken, "Condition variable broadcast");
        WakeResult::from_count(woken)
    }

    fn register<T: ?Sized>(&self, mutex: &Mutex<T>) -> SyncResult<Registration<'_>> {
        let offered = mutex as *const Mutex<T> as *const () as usize;
        let mut binding = self.binding.lock();

        if binding.waiters > 0 && binding.mutex != offered {
            warn!(
                bound = binding.mutex,
                offered,
                waiters = binding.waiters,
                "Wait offered a different mutex than the current waiters"
            );
            return Err(SyncError::MutexMismatch {
                bound: binding.mutex,
                offered,
                waiters: binding.waiters,
            });
        }

        binding.mutex = offered;
        binding.waiters += 1;

        Ok(Registration {
            binding: &self.binding,
        })
    }
}

impl<T: ?Sized> TimedWait<T> for MonotonicCondvar {
    #[inline]
    fn now(&self) -> SyncResult<MonotonicTime> {
        MonotonicCondvar::now(self)
    }

    fn wait(&self, guard: &mut MutexGuard<'_, T>) -> SyncResult<()> {
        let _registration = self.register(MutexGuard::mutex(guard))?;
        self.inner.wait(guard);
        Ok(())
    }

    fn wait_until(
        &self,
        guard: &mut MutexGuard<'_, T>,
        deadline: MonotonicTime,
    ) -> SyncResult<WaitStatus> {
        let _registration = self.register(MutexGuard::mutex(guard))?;
        let mut retries = 0;

        loop {
            let now = MonotonicCondvar::now(self)?;
            if now >= deadline {
                trace!(%deadline, %now, "Condition variable wait timed out");
                return Ok(WaitStatus::TimedOut);
            }

            if retries > CLOCK_SKEW_RETRIES {
                // Report as a spurious wakeup; the caller re-checks and waits again
                warn!(
                    clock = %self.clock,
                    %deadline,
                    %now,
                    "Park clock keeps expiring ahead of the bound clock"
                );
                return Ok(WaitStatus::Signaled);
            }

            let (park, capped) = park_slice(self.clock, deadline.saturating_duration_since(now));
            if !self.inner.wait_for(guard, park).timed_out() {
                return Ok(WaitStatus::Signaled);
            }

            // A capped park ending early is expected, not clock skew
            if !capped {
                retries += 1;
            }
        }
    }
}
