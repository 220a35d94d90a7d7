//! Procedural gestures
//!
//! A gesture is a bounded [`GestureSession`]: a set of sinusoidal joint
//! channels played for a fixed duration under a `sin(progress * π)`
//! envelope. The [`GestureDriver`] steps a session once per frame.

mod driver;
mod envelope;
mod preset;
mod session;

pub use driver::{DriverState, GestureDriver, StepOutcome};
pub use envelope::{intensity, progress};
pub use preset::GesturePreset;
pub use session::{Channel, GestureSession, RootMotion};
