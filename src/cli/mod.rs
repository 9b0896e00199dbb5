//! Command-line interface
//!
//! Argument definitions and command handlers for the `typewriter` binary.

pub mod args;
pub mod commands;
