/*!
 * Synchronization Configuration
 *
 * Runtime configuration for condition variable construction
 */

use crate::core::time::ClockSource;
use serde::{Deserialize, Serialize};

/// Condition variable configuration
///
/// Serializable so hosts can embed it in their own configuration files:
///
/// ```
/// use monosync::core::sync::SyncConfig;
/// use monosync::core::time::ClockSource;
///
/// let config = SyncConfig::from_json(r#"{ "clock": "monotonic_raw" }"#).unwrap();
/// assert_eq!(config.clock, ClockSource::MonotonicRaw);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Clock domain deadlines are measured on
    pub clock: ClockSource,
}

impl SyncConfig {
    /// `CLOCK_MONOTONIC` (the default)
    pub const fn monotonic() -> Self {
        Self {
            clock: ClockSource::Monotonic,
        }
    }

    /// `CLOCK_MONOTONIC_RAW`: timeouts not stretched or shrunk by NTP slewing
    pub const fn raw() -> Self {
        Self {
            clock: ClockSource::MonotonicRaw,
        }
    }

    /// `CLOCK_BOOTTIME`: time spent suspended counts towards timeouts
    ///
    /// Blocking is done in slices of `BOUND_CLOCK_PARK_SLICE`, so a deadline
    /// that passed during suspend is noticed at most one slice after resume.
    pub const fn boottime() -> Self {
        Self {
            clock: ClockSource::Boottime,
        }
    }

    /// Parse from JSON; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
