/*!
 * Structured Tracing
 * Subscriber setup and spans for timing blocking waits
 *
 * Features:
 * - Env-filtered output (`RUST_LOG`)
 * - JSON-formatted logs for structured parsing (`MONOSYNC_TRACE_JSON=1`)
 * - Wait spans that record how long a wait blocked and how it ended
 */

use crate::core::time::ClockSource;
use std::time::Instant;
use tracing::{debug, info, span, Level};
use tracing_subscriber::{
    fmt::format::FmtSpan, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter,
};

/// Initialize structured tracing
///
/// Environment variables:
/// - RUST_LOG: Set log level (default: info)
/// - MONOSYNC_TRACE_JSON: Enable JSON output (default: false)
///
/// Calling it again after a subscriber is installed is a no-op.
pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let use_json = std::env::var("MONOSYNC_TRACE_JSON")
        .map(|v| v == "1" || v == "true")
        .unwrap_or(false);

    let registry = tracing_subscriber::registry().with(env_filter);

    let installed = if use_json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(true)
                    .with_thread_ids(true)
                    .with_thread_names(true)
                    .with_current_span(true)
                    .with_span_list(true)
                    .with_span_events(FmtSpan::CLOSE),
            )
            .try_init()
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(true)
                    .with_thread_ids(true)
                    .with_thread_names(true)
                    .with_span_events(FmtSpan::CLOSE)
                    .compact(),
            )
            .try_init()
    };

    if installed.is_ok() {
        info!(json = use_json, "Structured tracing initialized");
    }
}

/// Span around one blocking wait
///
/// Records the blocked duration and the outcome when finished.
pub struct WaitSpan {
    span: tracing::Span,
    start: Instant,
}

impl WaitSpan {
    pub fn new(operation: &'static str, clock: ClockSource) -> Self {
        let span = span!(
            Level::DEBUG,
            "wait",
            operation,
            clock = %clock,
            waited_us = tracing::field::Empty,
            outcome = tracing::field::Empty,
        );

        Self {
            span,
            start: Instant::now(),
        }
    }

    /// Close the span, recording whether the wait's condition was met
    pub fn finish(self, satisfied: bool) {
        let waited_us = self.start.elapsed().as_micros() as u64;
        let outcome = if satisfied { "satisfied" } else { "expired" };

        self.span.record("waited_us", waited_us);
        self.span.record("outcome", outcome);

        let _entered = self.span.enter();
        debug!(waited_us, outcome, "wait finished");
    }
}
