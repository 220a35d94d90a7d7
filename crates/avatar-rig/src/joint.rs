//! Joint roles and heuristic bone name classification
//!
//! Rigs exported from different tools name their arm bones differently
//! (`mixamorig:RightArm`, `upperarm_r`, `forearm.L`, ...). Discovery is a
//! case-insensitive substring match against a fixed vocabulary per role.

use std::fmt;

use crate::model::ModelHandle;

/// Reference to a joint node owned by a loaded model
///
/// This is the node index inside the [`ModelHandle`] it was derived from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde-support", derive(serde::Serialize, serde::Deserialize))]
pub struct JointId(pub usize);

impl JointId {
    /// Node index of this joint
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for JointId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Joint roles a gesture can animate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde-support", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde-support", serde(rename_all = "kebab-case"))]
pub enum JointRole {
    RightArm,
    LeftArm,
    RightForearm,
    LeftForearm,
}

impl JointRole {
    /// All roles in slot order
    pub const ALL: [Self; 4] = [
        Self::RightArm,
        Self::LeftArm,
        Self::RightForearm,
        Self::LeftForearm,
    ];

    /// Human readable label used in discovery logs
    pub fn label(self) -> &'static str {
        match self {
            Self::RightArm => "Right arm",
            Self::LeftArm => "Left arm",
            Self::RightForearm => "Right forearm",
            Self::LeftForearm => "Left forearm",
        }
    }

    /// Stable kebab-case identifier
    pub fn id(self) -> &'static str {
        match self {
            Self::RightArm => "right-arm",
            Self::LeftArm => "left-arm",
            Self::RightForearm => "right-forearm",
            Self::LeftForearm => "left-forearm",
        }
    }

    /// Parse a kebab-case identifier
    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|role| role.id() == id)
    }

    /// The same role on the other side of the body
    pub fn mirrored(self) -> Self {
        match self {
            Self::RightArm => Self::LeftArm,
            Self::LeftArm => Self::RightArm,
            Self::RightForearm => Self::LeftForearm,
            Self::LeftForearm => Self::RightForearm,
        }
    }

    /// Vocabulary terms for this role, most specific first
    pub fn vocabulary(self) -> &'static [&'static str] {
        VOCABULARY
            .iter()
            .find(|(role, _)| *role == self)
            .map_or(&[], |(_, terms)| *terms)
    }

    fn slot(self) -> usize {
        match self {
            Self::RightArm => 0,
            Self::LeftArm => 1,
            Self::RightForearm => 2,
            Self::LeftForearm => 3,
        }
    }
}

impl fmt::Display for JointRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

// Forearm roles are checked first: "forearm.r" also contains "arm.r".
const VOCABULARY: &[(JointRole, &[&str])] = &[
    (
        JointRole::RightForearm,
        &[
            "rightforearm",
            "right_forearm",
            "forearm.r",
            "lowerarm_r",
            "righthand",
            "right_hand",
        ],
    ),
    (
        JointRole::LeftForearm,
        &[
            "leftforearm",
            "left_forearm",
            "forearm.l",
            "lowerarm_l",
            "lefthand",
            "left_hand",
        ],
    ),
    (
        JointRole::RightArm,
        &[
            "rightarm",
            "right_arm",
            "arm.r",
            "upperarm_r",
            "shoulder_r",
            "rightshoulder",
        ],
    ),
    (
        JointRole::LeftArm,
        &[
            "leftarm",
            "left_arm",
            "arm.l",
            "upperarm_l",
            "shoulder_l",
            "leftshoulder",
        ],
    ),
];

/// Classify a bone name, returning the role and the index of the matching
/// vocabulary term (lower is more specific).
pub fn classify(name: &str) -> Option<(JointRole, usize)> {
    let name = name.to_lowercase();
    VOCABULARY.iter().find_map(|(role, terms)| {
        terms
            .iter()
            .position(|term| name.contains(term))
            .map(|rank| (*role, rank))
    })
}

/// Role a bone name maps to, if any
pub fn role_for(name: &str) -> Option<JointRole> {
    classify(name).map(|(role, _)| role)
}

/// Partial map from joint role to the joint that fills it
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde-support", derive(serde::Serialize, serde::Deserialize))]
pub struct JointSet {
    slots: [Option<JointId>; 4],
}

impl JointSet {
    /// Create an empty joint set (no role resolved)
    pub fn new() -> Self {
        Self::default()
    }

    /// Joint resolved for a role
    pub fn get(&self, role: JointRole) -> Option<JointId> {
        self.slots[role.slot()]
    }

    /// Assign a joint to a role, returning the previous one
    pub fn insert(&mut self, role: JointRole, joint: JointId) -> Option<JointId> {
        self.slots[role.slot()].replace(joint)
    }

    /// Builder-style variant of [`JointSet::insert`]
    #[must_use]
    pub fn with(mut self, role: JointRole, joint: JointId) -> Self {
        self.insert(role, joint);
        self
    }

    /// Resolved roles with their joints
    pub fn iter(&self) -> impl Iterator<Item = (JointRole, JointId)> + '_ {
        JointRole::ALL
            .into_iter()
            .filter_map(|role| self.get(role).map(|joint| (role, joint)))
    }

    /// Number of resolved roles
    pub fn len(&self) -> usize {
        self.slots.iter().flatten().count()
    }

    /// Check if no role was resolved
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Roles that could not be resolved
    pub fn missing(&self) -> Vec<JointRole> {
        JointRole::ALL
            .into_iter()
            .filter(|role| self.get(*role).is_none())
            .collect()
    }
}

/// Discover the joints of a model by name
///
/// Joints are visited in hierarchy order. For each role the joint matching
/// the most specific vocabulary term wins; ties go to the joint closest to
/// the root, so finger bones never shadow the hand or forearm.
pub fn derive_joints(model: &ModelHandle) -> JointSet {
    let mut best: [Option<(usize, JointId)>; 4] = [None; 4];

    for node in model.joints() {
        let Some((role, rank)) = classify(&node.name) else {
            continue;
        };
        let slot = &mut best[role.slot()];
        if slot.is_none_or(|(current, _)| rank < current) {
            *slot = Some((rank, JointId(node.index)));
        }
    }

    let mut set = JointSet::new();
    for role in JointRole::ALL {
        if let Some((_, joint)) = best[role.slot()] {
            set.insert(role, joint);
        }
    }

    for role in JointRole::ALL {
        match set.get(role).and_then(|joint| model.node(joint.index())) {
            Some(node) => log::info!("{} found: {}", role.label(), node.name),
            None => log::info!("{} found: Not found", role.label()),
        }
    }

    set
}
