//! Procedural gesture playback for rigged avatars
//!
//! This crate turns a resolved [`avatar_rig::JointSet`] into motion:
//! - [`GestureDriver`] writes sinusoidal joint rotations under a
//!   fade-in/fade-out envelope and resets them when the session ends
//! - [`SpeechOverlay`] times a speech bubble's show/hide transitions
//! - [`AvatarStage`] wires both to a loaded model and the has-played flag
//!
//! # Example
//!
//! ```rust,ignore
//! use avatar_motion::{AvatarStage, StageConfig};
//!
//! let mut stage = AvatarStage::load("avatar.glb", StageConfig::default())?;
//! stage.arm_intro(now_ms);
//!
//! // once per display refresh
//! let report = stage.frame(now_ms, hovered);
//! ```

pub mod error;
pub mod gesture;
pub mod idle;
pub mod overlay;
pub mod stage;

pub use error::{MotionError, Result, StageError};
pub use gesture::{
    Channel, DriverState, GestureDriver, GesturePreset, GestureSession, RootMotion, StepOutcome,
    intensity, progress,
};
pub use idle::IdleMotion;
pub use overlay::{BubbleState, BubbleStyle, BubbleTransform, IntroScript, SpeechOverlay};
pub use stage::{AvatarStage, Cursor, FrameReport, StageConfig, pointer_to_ndc};
