/*!
 * Error Types
 * Centralized error handling with thiserror and miette
 *
 * Timeouts are never errors: they are reported as `WaitStatus::TimedOut` by
 * the primitive and as a `false` predicate result by the policy layer.
 */

use crate::core::time::ClockSource;
use miette::Diagnostic;
use nix::errno::Errno;
use thiserror::Error;

/// Result type for condition variable operations
pub type SyncResult<T> = Result<T, SyncError>;

/// Clock access errors
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Diagnostic)]
pub enum ClockError {
    #[error("Clock {clock} is not supported on this platform")]
    #[diagnostic(
        code(clock::unsupported),
        help("Use ClockSource::Monotonic, which every supported platform provides.")
    )]
    Unsupported { clock: ClockSource },

    #[error("Failed to read {clock}: {errno}")]
    #[diagnostic(
        code(clock::read_failed),
        help("The kernel rejected clock_gettime. Check seccomp filters or sandbox policy.")
    )]
    Read { clock: ClockSource, errno: Errno },

    #[error("{clock} returned out-of-range nanoseconds: {nanos}")]
    #[diagnostic(code(clock::out_of_range))]
    OutOfRange { clock: ClockSource, nanos: i64 },
}

/// Broad classification of a [`SyncError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SyncErrorKind {
    /// The condition variable could not be constructed
    Initialization,
    /// A wait call failed for a reason other than timeout
    Wait,
}

/// Condition variable errors
#[derive(Error, Debug, Clone, PartialEq, Eq, Diagnostic)]
pub enum SyncError {
    #[error("Condition variable initialization failed: {0}")]
    #[diagnostic(
        code(sync::init_failed),
        help("The monotonic clock could not be bound. This is not retried.")
    )]
    Init(#[source] ClockError),

    #[error("Condition variable wait failed reading the clock: {0}")]
    #[diagnostic(code(sync::clock_failed))]
    Clock(#[source] ClockError),

    #[error(
        "Condition variable is bound to mutex {bound:#x} by {waiters} waiter(s); wait offered mutex {offered:#x}"
    )]
    #[diagnostic(
        code(sync::mutex_mismatch),
        help("Every thread waiting on one condition variable must use the same mutex.")
    )]
    MutexMismatch {
        bound: usize,
        offered: usize,
        waiters: usize,
    },
}

impl SyncError {
    /// Which step of the protocol failed
    pub fn kind(&self) -> SyncErrorKind {
        match self {
            SyncError::Init(_) => SyncErrorKind::Initialization,
            SyncError::Clock(_) | SyncError::MutexMismatch { .. } => SyncErrorKind::Wait,
        }
    }
}
