//! `typewriter` - Typewriter text animation engine
//!
//! Types and deletes an ordered list of phrases one character at a time,
//! looping forever. The step function is pure and the scheduler owns a
//! single re-armed timer, so engines stay independent of each other and can
//! be tested without real time passing.

pub mod cli;
pub mod config;
pub mod cursor;
pub mod engine;
pub mod error;
pub mod observability;
pub mod render;
