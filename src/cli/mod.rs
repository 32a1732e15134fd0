//! CLI modules for the autoanno binary.
//!
//! Kept in the library so commands can be tested without spawning a process.

pub mod commands;
pub mod output;
pub mod parser;

pub use parser::{Cli, Commands};
