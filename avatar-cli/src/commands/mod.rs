//! Command implementations

pub mod gesture;
pub mod rig;
