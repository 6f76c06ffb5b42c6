//! Command-line interface
//!
//! Argument definitions and command handlers for the `y1themes` binary.

pub mod args;
pub mod commands;
