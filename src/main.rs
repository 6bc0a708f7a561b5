/*!
 * monosync demo - Debounced Batch Consumer
 *
 * A producer thread emits bursts of events. The consumer sleeps until the
 * first event of a burst arrives, then uses `defer_for` to keep collecting
 * until the burst has been quiet for the configured delay, and handles the
 * whole burst as one batch.
 *
 * Environment variables:
 * - MONOSYNC_DEMO_DELAY_MS: quiet period that closes a batch (default: 50)
 * - MONOSYNC_DEMO_EVENTS: events per burst (default: 20)
 * - MONOSYNC_DEMO_SPACING_MS: gap between events inside a burst (default: 5)
 * - MONOSYNC_DEMO_BURSTS: number of bursts (default: 3)
 * - MONOSYNC_DEMO_CLOCK: monotonic | monotonic_raw | boottime (default: monotonic)
 */

use anyhow::{anyhow, Context, Result};
use monosync::core::limits::{DEMO_DEFAULT_DELAY, DEMO_DEFAULT_EVENTS, DEMO_DEFAULT_SPACING};
use monosync::core::time::epoch_nanos;
use monosync::{init_tracing, MonotonicCondvar, PredicateWait, SyncConfig, WaitSpan};
use parking_lot::Mutex;
use std::str::FromStr;
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tracing::{info, warn};

#[derive(Debug, Default)]
struct Inbox {
    pending: Vec<u64>,
    shutdown: bool,
}

fn env_or<T>(name: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(name) {
        Ok(value) => value
            .parse()
            .with_context(|| format!("Invalid {}={}", name, value)),
        Err(_) => Ok(default),
    }
}

fn main() -> Result<()> {
    init_tracing();

    let delay = Duration::from_millis(env_or(
        "MONOSYNC_DEMO_DELAY_MS",
        DEMO_DEFAULT_DELAY.as_millis() as u64,
    )?);
    let spacing = Duration::from_millis(env_or(
        "MONOSYNC_DEMO_SPACING_MS",
        DEMO_DEFAULT_SPACING.as_millis() as u64,
    )?);
    let events: usize = env_or("MONOSYNC_DEMO_EVENTS", DEMO_DEFAULT_EVENTS)?;
    let bursts: usize = env_or("MONOSYNC_DEMO_BURSTS", 3)?;

    let config = match std::env::var("MONOSYNC_DEMO_CLOCK") {
        Ok(clock) => SyncConfig::from_json(&format!(r#"{{ "clock": "{}" }}"#, clock))
            .with_context(|| format!("Unknown clock {}", clock))?,
        Err(_) => SyncConfig::default(),
    };

    if spacing >= delay {
        warn!(
            ?spacing,
            ?delay,
            "Event spacing is not below the delay; every event will close its own batch"
        );
    }

    let cv = Arc::new(MonotonicCondvar::with_config(config).context("Binding condition variable")?);
    let inbox = Arc::new(Mutex::new(Inbox::default()));

    info!(clock = %cv.clock(), ?delay, ?spacing, events, bursts, "Demo starting");

    let producer = {
        let cv = cv.clone();
        let inbox = inbox.clone();
        thread::Builder::new()
            .name("producer".into())
            .spawn(move || {
                for _ in 0..bursts {
                    for _ in 0..events {
                        inbox.lock().pending.push(epoch_nanos() as u64);
                        cv.signal();
                        thread::sleep(spacing);
                    }
                    // Leave a gap well past the delay between bursts
                    thread::sleep(delay * 3);
                }
                inbox.lock().shutdown = true;
                cv.signal();
            })?
    };

    let mut batches = 0usize;
    let mut handled = 0usize;
    let mut guard = inbox.lock();

    loop {
        cv.wait_pred(&mut guard, |inbox| !inbox.pending.is_empty() || inbox.shutdown)?;
        if guard.shutdown && guard.pending.is_empty() {
            break;
        }

        let span = WaitSpan::new("defer_for", cv.clock());
        let shutdown = cv.defer_for(&mut guard, delay, |inbox| inbox.shutdown)?;
        span.finish(shutdown);

        let batch = std::mem::take(&mut guard.pending);
        batches += 1;
        handled += batch.len();
        info!(batch = batches, events = batch.len(), "Burst went quiet, handling batch");
    }

    drop(guard);
    producer
        .join()
        .map_err(|_| anyhow!("Producer thread panicked"))?;

    info!(batches, handled, "Demo finished");
    if handled != events * bursts {
        warn!(expected = events * bursts, handled, "Some events were not handled");
    }

    Ok(())
}
