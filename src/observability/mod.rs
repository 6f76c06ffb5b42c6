//! Observability module
//!
//! Structured logging for `y1themes` runs.

pub mod logging;

pub use logging::{LogFormat, init_logging};
