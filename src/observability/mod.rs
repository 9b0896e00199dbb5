//! Observability module
//!
//! Structured logging for the typewriter engine and its terminal host.

pub mod logging;

pub use logging::{LogFormat, init_logging};
