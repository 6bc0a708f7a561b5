/*!
 * Condition Variable Integration Tests
 *
 * Signal, broadcast and timed waits on the primitive layer
 */

use monosync::{MonotonicCondvar, SyncError, SyncErrorKind, TimedWait, WaitStatus, WakeResult};
use parking_lot::Mutex;
use pretty_assertions::assert_eq;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

fn wait_for_waiters(cv: &MonotonicCondvar, count: usize) {
    while cv.waiter_count() < count {
        thread::sleep(Duration::from_millis(2));
    }
}

#[test]
fn test_signal_before_deadline_reports_signaled() {
    let cv = Arc::new(MonotonicCondvar::new().unwrap());
    let state = Arc::new(Mutex::new(false));

    let handle = {
        let cv = cv.clone();
        let state = state.clone();
        thread::spawn(move || {
            let mut guard = state.lock();
            let deadline = cv.deadline_after(Duration::from_secs(5)).unwrap();
            let start = Instant::now();
            let status = cv.wait_until(&mut guard, deadline).unwrap();
            (status, *guard, start.elapsed())
        })
    };

    wait_for_waiters(&cv, 1);
    // The waiter cannot return before it re-acquires the mutex
    *state.lock() = true;
    cv.signal();

    let (status, observed, elapsed) = handle.join().unwrap();
    assert_eq!(status, WaitStatus::Signaled);
    assert!(observed);
    assert!(elapsed < Duration::from_secs(5));
}

#[test]
fn test_signal_just_before_deadline_is_not_a_timeout() {
    let cv = Arc::new(MonotonicCondvar::new().unwrap());
    let state = Arc::new(Mutex::new(false));
    let deadline = cv.deadline_after(Duration::from_millis(80)).unwrap();

    let handle = {
        let cv = cv.clone();
        let state = state.clone();
        thread::spawn(move || {
            let mut guard = state.lock();
            let status = cv.wait_until(&mut guard, deadline).unwrap();
            (status, *guard)
        })
    };

    wait_for_waiters(&cv, 1);
    let lead = Duration::from_millis(5);
    let remaining = deadline.saturating_duration_since(cv.now().unwrap());
    thread::sleep(remaining.saturating_sub(lead));

    // Holding the mutex here means the waiter is parked, not returned
    *state.lock() = true;
    let woken = cv.signal();
    let signaled_at = cv.now().unwrap();

    let (status, observed) = handle.join().unwrap();
    if signaled_at >= deadline {
        eprintln!("signal landed after the deadline ({signaled_at} >= {deadline}), skipping");
        return;
    }

    assert_eq!(woken, WakeResult::Woken(1));
    assert_eq!(status, WaitStatus::Signaled);
    assert!(observed);
}

#[test]
fn test_timeout_reached_on_bound_clock() {
    let cv = MonotonicCondvar::new().unwrap();
    let state = Mutex::new(());
    let mut guard = state.lock();

    let deadline = cv.deadline_after(Duration::from_millis(80)).unwrap();
    let status = cv.wait_until(&mut guard, deadline).unwrap();

    assert_eq!(status, WaitStatus::TimedOut);
    assert!(cv.now().unwrap() >= deadline);
}

#[test]
fn test_mutex_is_held_after_timeout() {
    let cv = MonotonicCondvar::new().unwrap();
    let state = Mutex::new(0u32);
    let mut guard = state.lock();

    let status = cv.wait_for(&mut guard, Duration::from_millis(10)).unwrap();
    assert!(status.timed_out());

    *guard += 1;
    assert!(state.try_lock().is_none());
    drop(guard);
    assert_eq!(*state.lock(), 1);
}

#[test]
fn test_signals_without_waiters_are_lost() {
    let cv = MonotonicCondvar::new().unwrap();
    let state = Mutex::new(());

    assert_eq!(cv.signal(), WakeResult::NoWaiters);
    assert_eq!(cv.broadcast(), WakeResult::NoWaiters);

    let mut guard = state.lock();
    let start = Instant::now();
    let status = cv.wait_for(&mut guard, Duration::from_millis(50)).unwrap();

    assert_eq!(status, WaitStatus::TimedOut);
    assert!(start.elapsed() >= Duration::from_millis(50));
}

#[test]
fn test_signal_wakes_at_most_one() {
    let cv = Arc::new(MonotonicCondvar::new().unwrap());
    let state = Arc::new(Mutex::new(()));

    let handles: Vec<_> = (0..2)
        .map(|_| {
            let cv = cv.clone();
            let state = state.clone();
            thread::spawn(move || {
                let mut guard = state.lock();
                cv.wait_for(&mut guard, Duration::from_millis(500)).unwrap()
            })
        })
        .collect();

    wait_for_waiters(&cv, 2);
    let guard = state.lock();
    assert_eq!(cv.signal(), WakeResult::Woken(1));
    drop(guard);

    let statuses: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    let signaled = statuses.iter().filter(|s| !s.timed_out()).count();
    assert!(signaled >= 1);
}

#[test]
fn test_broadcast_wakes_every_waiter() {
    let cv = Arc::new(MonotonicCondvar::new().unwrap());
    let state = Arc::new(Mutex::new(false));

    let handles: Vec<_> = (0..5)
        .map(|_| {
            let cv = cv.clone();
            let state = state.clone();
            thread::spawn(move || {
                let mut guard = state.lock();
                while !*guard {
                    let status = cv.wait_for(&mut guard, Duration::from_secs(5)).unwrap();
                    assert!(!status.timed_out());
                }
            })
        })
        .collect();

    wait_for_waiters(&cv, 5);
    *state.lock() = true;
    assert_eq!(cv.broadcast(), WakeResult::Woken(5));

    for handle in handles {
        handle.join().unwrap();
    }
    assert_eq!(cv.waiter_count(), 0);
}

#[test]
fn test_untimed_wait_returns_after_signal() {
    let cv = Arc::new(MonotonicCondvar::new().unwrap());
    let state = Arc::new(Mutex::new(Vec::<u32>::new()));

    let handle = {
        let cv = cv.clone();
        let state = state.clone();
        thread::spawn(move || {
            let mut guard = state.lock();
            while guard.is_empty() {
                cv.wait(&mut guard).unwrap();
            }
            guard.pop()
        })
    };

    wait_for_waiters(&cv, 1);
    state.lock().push(42);
    cv.signal();

    assert_eq!(handle.join().unwrap(), Some(42));
}

#[test]
fn test_mismatched_mutex_is_rejected() {
    let cv = Arc::new(MonotonicCondvar::new().unwrap());
    let bound = Arc::new(Mutex::new(false));
    let other = Mutex::new(false);

    let handle = {
        let cv = cv.clone();
        let bound = bound.clone();
        thread::spawn(move || {
            let mut guard = bound.lock();
            while !*guard {
                cv.wait(&mut guard).unwrap();
            }
        })
    };

    wait_for_waiters(&cv, 1);

    let mut guard = other.lock();
    let err = cv.wait(&mut guard).unwrap_err();
    assert_eq!(err.kind(), SyncErrorKind::Wait);
    match err {
        SyncError::MutexMismatch {
            bound: bound_addr,
            offered,
            waiters,
        } => {
            assert_eq!(waiters, 1);
            assert_ne!(bound_addr, offered);
            assert_eq!(offered, &other as *const Mutex<bool> as usize);
        }
        unexpected => panic!("unexpected error: {unexpected}"),
    }
    drop(guard);

    *bound.lock() = true;
    cv.broadcast();
    handle.join().unwrap();
}
