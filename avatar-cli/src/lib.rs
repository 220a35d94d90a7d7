//! Avatar CLI library
//!
//! Command definitions and helpers behind the `avatar` binary.

pub mod cli;
pub mod commands;
pub mod config;
pub mod utils;
