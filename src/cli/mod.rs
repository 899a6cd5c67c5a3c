//! Command-line interface module
//!
//! Argument parsing with clap and the summary printed on success.

pub mod commands;
pub mod presenter;

pub use commands::*;
pub use presenter::*;
