//! Avatar rig support: model loading, joint discovery and pose targets.
//!
//! The crate covers the steps that happen before a gesture can play:
//! - [`load_model`] reads the node hierarchy of a glTF/GLB avatar
//! - [`derive_joints`] classifies bone names into [`JointRole`]s
//! - [`Skeleton`] holds the mutable rotation offsets a driver writes into
//!
//! # Example
//!
//! ```rust,ignore
//! use avatar_rig::{derive_joints, load_model, Skeleton};
//!
//! let model = load_model("avatar.glb")?;
//! let joints = derive_joints(&model);
//! let mut skeleton = Skeleton::from_model(&model, 1.3);
//! ```

pub mod error;
pub mod joint;
pub mod model;
pub mod skeleton;

pub use error::{LoadError, Result};
pub use joint::{JointId, JointRole, JointSet, derive_joints, role_for};
pub use model::{ModelBuilder, ModelHandle, ModelNode, load_model};
pub use skeleton::{Axis, RigTarget, RootLayer, RootOffset, RootTransform, Skeleton};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
