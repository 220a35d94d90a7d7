//! Shared utilities for the avatar CLI

pub mod format;
pub mod table;

pub use format::*;
pub use table::*;
