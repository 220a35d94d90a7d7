//! Mutable pose of a loaded avatar
//!
//! The renderer owns the scene graph; a [`Skeleton`] mirrors just the fields
//! a procedural gesture writes: per-joint Euler rotation offsets layered on
//! top of the rest pose, and root position/yaw offsets.

use glam::{EulerRot, Mat4, Quat, Vec3};

use crate::joint::JointId;
use crate::model::ModelHandle;

/// Rotation axis of a joint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde-support", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde-support", serde(rename_all = "lowercase"))]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    /// All axes in Euler order
    pub const ALL: [Self; 3] = [Self::X, Self::Y, Self::Z];

    fn component(self) -> usize {
        match self {
            Self::X => 0,
            Self::Y => 1,
            Self::Z => 2,
        }
    }
}

/// Writer of a root offset
///
/// Gestures and idle motion keep separate offsets so neither can leave the
/// other's contribution behind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RootLayer {
    Gesture,
    Idle,
}

/// Offset applied to the avatar root on top of its base transform
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde-support", derive(serde::Serialize, serde::Deserialize))]
pub struct RootOffset {
    /// Vertical bob (position.y)
    pub bob: f32,
    /// Yaw sway (rotation.y, radians)
    pub sway: f32,
}

impl RootOffset {
    /// No offset
    pub const ZERO: Self = Self { bob: 0.0, sway: 0.0 };
}

/// Avatar root transform
#[derive(Debug, Clone, PartialEq)]
pub struct RootTransform {
    /// Position the avatar was placed at
    pub base_position: Vec3,
    /// Uniform scale
    pub scale: f32,
    gesture: RootOffset,
    idle: RootOffset,
}

impl RootTransform {
    /// Create a root at the origin with the given uniform scale
    pub fn new(scale: f32) -> Self {
        Self {
            base_position: Vec3::ZERO,
            scale,
            gesture: RootOffset::ZERO,
            idle: RootOffset::ZERO,
        }
    }

    /// Offset currently written by a layer
    pub fn offset(&self, layer: RootLayer) -> RootOffset {
        match layer {
            RootLayer::Gesture => self.gesture,
            RootLayer::Idle => self.idle,
        }
    }

    /// Effective position (base plus all offsets)
    pub fn position(&self) -> Vec3 {
        self.base_position + Vec3::Y * (self.gesture.bob + self.idle.bob)
    }

    /// Effective yaw in radians
    pub fn yaw(&self) -> f32 {
        self.gesture.sway + self.idle.sway
    }

    /// Local transform matrix for the renderer
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(
            Vec3::splat(self.scale),
            Quat::from_rotation_y(self.yaw()),
            self.position(),
        )
    }
}

/// Per-joint pose state
#[derive(Debug, Clone, PartialEq)]
pub struct JointPose {
    /// Joint name from the model
    pub name: String,
    /// Rest rotation from the model
    pub rest: Quat,
    /// Euler offset (XYZ order, radians) written by gestures
    pub offset: Vec3,
}

impl JointPose {
    /// Rest rotation composed with the current offset
    pub fn local_rotation(&self) -> Quat {
        self.rest * Quat::from_euler(EulerRot::XYZ, self.offset.x, self.offset.y, self.offset.z)
    }
}

/// Target of per-frame rotation writes
///
/// Joints that do not exist in the target are ignored.
pub trait RigTarget {
    /// Write a rotation offset component of a joint
    fn set_rotation(&mut self, joint: JointId, axis: Axis, radians: f32);

    /// Read back a rotation offset component of a joint
    fn rotation(&self, joint: JointId, axis: Axis) -> Option<f32>;

    /// Replace the root offset owned by a layer
    fn set_root_offset(&mut self, layer: RootLayer, offset: RootOffset);
}

/// Mutable pose mirror of a loaded model
#[derive(Debug, Clone, PartialEq)]
pub struct Skeleton {
    joints: Vec<Option<JointPose>>,
    root: RootTransform,
}

impl Skeleton {
    /// Create the pose mirror of a model, with the root scaled uniformly
    pub fn from_model(model: &ModelHandle, scale: f32) -> Self {
        let joints = model
            .nodes()
            .iter()
            .map(|node| {
                node.is_joint.then(|| JointPose {
                    name: node.name.clone(),
                    rest: node.rotation,
                    offset: Vec3::ZERO,
                })
            })
            .collect();

        Self {
            joints,
            root: RootTransform::new(scale),
        }
    }

    /// Pose of a joint
    pub fn joint(&self, joint: JointId) -> Option<&JointPose> {
        self.joints.get(joint.index()).and_then(Option::as_ref)
    }

    /// Euler offset of a joint (zero for unknown joints)
    pub fn offset(&self, joint: JointId) -> Vec3 {
        self.joint(joint).map_or(Vec3::ZERO, |pose| pose.offset)
    }

    /// Number of joints in the pose
    pub fn joint_count(&self) -> usize {
        self.joints.iter().flatten().count()
    }

    /// Root transform
    pub fn root(&self) -> &RootTransform {
        &self.root
    }

    /// Mutable root transform
    pub fn root_mut(&mut self) -> &mut RootTransform {
        &mut self.root
    }

    /// Check that no joint or root offset is applied
    pub fn is_at_rest(&self) -> bool {
        self.joints
            .iter()
            .flatten()
            .all(|pose| pose.offset == Vec3::ZERO)
            && self.root.gesture == RootOffset::ZERO
            && self.root.idle == RootOffset::ZERO
    }
}

impl RigTarget for Skeleton {
    fn set_rotation(&mut self, joint: JointId, axis: Axis, radians: f32) {
        if let Some(Some(pose)) = self.joints.get_mut(joint.index()) {
            pose.offset[axis.component()] = radians;
        }
    }

    fn rotation(&self, joint: JointId, axis: Axis) -> Option<f32> {
        self.joint(joint).map(|pose| pose.offset[axis.component()])
    }

    fn set_root_offset(&mut self, layer: RootLayer, offset: RootOffset) {
        match layer {
            RootLayer::Gesture => self.root.gesture = offset,
            RootLayer::Idle => self.root.idle = offset,
        }
    }
}
