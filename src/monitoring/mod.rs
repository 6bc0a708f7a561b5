/*!
 * Monitoring
 * Structured logging setup and wait instrumentation
 */

mod tracer;

pub use tracer::{init_tracing, WaitSpan};
