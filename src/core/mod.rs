/*!
 * Core Module
 * Clock arithmetic, condition variables and error handling
 */

pub mod errors;
pub mod limits;
pub mod sync;
pub mod time;

// Re-export for convenience
pub use errors::*;
