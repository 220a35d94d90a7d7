//! Avatar model loading
//!
//! Only the node hierarchy of a glTF document is read: names, parent links,
//! rest transforms and which nodes are skin joints. Meshes, materials and
//! buffers stay with the external renderer.

use std::fs;
use std::path::Path;

use glam::{Quat, Vec3};

use crate::error::{LoadError, Result};

/// A node of the loaded model hierarchy
#[derive(Debug, Clone, PartialEq)]
pub struct ModelNode {
    /// Index of the node in the model
    pub index: usize,
    /// Node name (empty if the source had none)
    pub name: String,
    /// Parent node index (None for roots)
    pub parent: Option<usize>,
    /// Child node indices
    pub children: Vec<usize>,
    /// Whether the node is referenced as a joint by any skin
    pub is_joint: bool,
    /// Rest translation
    pub translation: Vec3,
    /// Rest rotation
    pub rotation: Quat,
    /// Rest scale
    pub scale: Vec3,
}

impl ModelNode {
    fn new(index: usize, name: &str, parent: Option<usize>, is_joint: bool) -> Self {
        Self {
            index,
            name: name.to_string(),
            parent,
            children: Vec::new(),
            is_joint,
            translation: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

/// Handle to a loaded avatar model
#[derive(Debug, Clone, Default)]
pub struct ModelHandle {
    nodes: Vec<ModelNode>,
    roots: Vec<usize>,
    /// Depth-first pre-order over the scene, like a scene graph traversal
    traversal: Vec<usize>,
    animations: Vec<String>,
}

impl ModelHandle {
    /// Parse a glTF or GLB document from memory
    pub fn from_slice(data: &[u8]) -> Result<Self> {
        let gltf = gltf::Gltf::from_slice(data)?;
        Ok(Self::from_document(&gltf.document))
    }

    fn from_document(doc: &gltf::Document) -> Self {
        let mut joint_flags = vec![false; doc.nodes().count()];
        for skin in doc.skins() {
            for joint in skin.joints() {
                joint_flags[joint.index()] = true;
            }
        }

        let mut nodes: Vec<ModelNode> = doc
            .nodes()
            .map(|node| {
                let (translation, rotation, scale) = node.transform().decomposed();
                ModelNode {
                    index: node.index(),
                    name: node.name().unwrap_or_default().to_string(),
                    parent: None,
                    children: node.children().map(|child| child.index()).collect(),
                    is_joint: joint_flags[node.index()],
                    translation: Vec3::from_array(translation),
                    rotation: Quat::from_array(rotation),
                    scale: Vec3::from_array(scale),
                }
            })
            .collect();

        for parent in 0..nodes.len() {
            for child in nodes[parent].children.clone() {
                nodes[child].parent = Some(parent);
            }
        }

        let roots: Vec<usize> = match doc.default_scene().or_else(|| doc.scenes().next()) {
            Some(scene) => scene.nodes().map(|node| node.index()).collect(),
            None => nodes
                .iter()
                .filter(|node| node.parent.is_none())
                .map(|node| node.index)
                .collect(),
        };

        let animations = doc
            .animations()
            .map(|anim| {
                anim.name()
                    .map_or_else(|| format!("animation_{}", anim.index()), str::to_string)
            })
            .collect();

        let traversal = preorder(&nodes, &roots);
        log::debug!(
            "Loaded model: {} nodes, {} joints, {} animations",
            nodes.len(),
            nodes.iter().filter(|node| node.is_joint).count(),
            doc.animations().count()
        );

        Self {
            nodes,
            roots,
            traversal,
            animations,
        }
    }

    /// Get a node by index
    pub fn node(&self, index: usize) -> Option<&ModelNode> {
        self.nodes.get(index)
    }

    /// All nodes in document order
    pub fn nodes(&self) -> &[ModelNode] {
        &self.nodes
    }

    /// Root node indices of the instantiated scene
    pub fn roots(&self) -> &[usize] {
        &self.roots
    }

    /// Nodes reachable from the scene roots, parents before children
    pub fn traverse(&self) -> impl Iterator<Item = &ModelNode> + '_ {
        self.traversal.iter().map(|&index| &self.nodes[index])
    }

    /// Joint nodes in traversal order
    pub fn joints(&self) -> impl Iterator<Item = &ModelNode> + '_ {
        self.traverse().filter(|node| node.is_joint)
    }

    /// Depth of a node below its scene root
    pub fn depth(&self, index: usize) -> usize {
        let mut depth = 0;
        let mut current = self.nodes.get(index).and_then(|node| node.parent);
        while let Some(parent) = current {
            // Parent cycles are not rejected by glTF validation
            if depth >= self.nodes.len() {
                break;
            }
            depth += 1;
            current = self.nodes[parent].parent;
        }
        depth
    }

    /// Names of the animation clips stored in the model
    pub fn animations(&self) -> &[String] {
        &self.animations
    }
}

fn preorder(nodes: &[ModelNode], roots: &[usize]) -> Vec<usize> {
    let mut order = Vec::with_capacity(nodes.len());
    let mut visited = vec![false; nodes.len()];
    let mut stack: Vec<usize> = roots.iter().rev().copied().collect();

    while let Some(index) = stack.pop() {
        if index >= nodes.len() || visited[index] {
            continue;
        }
        visited[index] = true;
        order.push(index);
        stack.extend(nodes[index].children.iter().rev());
    }

    order
}

/// Load an avatar model from a `.gltf` or `.glb` file
pub fn load_model<P: AsRef<Path>>(path: P) -> Result<ModelHandle> {
    let path = path.as_ref();
    let data = fs::read(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    ModelHandle::from_slice(&data)
}

/// Builds a [`ModelHandle`] by hand, for hosts that own their own scene graph
#[derive(Debug, Default)]
pub struct ModelBuilder {
    nodes: Vec<ModelNode>,
}

impl ModelBuilder {
    /// Create an empty builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a skin joint, returning its index
    pub fn add_joint(&mut self, name: &str, parent: Option<usize>) -> usize {
        self.push(name, parent, true)
    }

    /// Add a plain (non-joint) node, returning its index
    pub fn add_node(&mut self, name: &str, parent: Option<usize>) -> usize {
        self.push(name, parent, false)
    }

    /// Set the rest rotation of a node
    pub fn set_rotation(&mut self, index: usize, rotation: Quat) -> &mut Self {
        if let Some(node) = self.nodes.get_mut(index) {
            node.rotation = rotation;
        }
        self
    }

    fn push(&mut self, name: &str, parent: Option<usize>, is_joint: bool) -> usize {
        let index = self.nodes.len();
        self.nodes.push(ModelNode::new(index, name, parent, is_joint));
        index
    }

    /// Finish the model, validating parent links
    pub fn try_build(mut self) -> Result<ModelHandle> {
        for index in 0..self.nodes.len() {
            if let Some(parent) = self.nodes[index].parent {
                if parent >= self.nodes.len() || parent == index {
                    return Err(LoadError::InvalidParent {
                        node: index,
                        parent,
                    });
                }
                self.nodes[parent].children.push(index);
            }
        }

        let roots: Vec<usize> = self
            .nodes
            .iter()
            .filter(|node| node.parent.is_none())
            .map(|node| node.index)
            .collect();
        let traversal = preorder(&self.nodes, &roots);

        Ok(ModelHandle {
            nodes: self.nodes,
            roots,
            traversal,
            animations: Vec::new(),
        })
    }

    /// Finish the model
    ///
    /// Nodes with an invalid parent are treated as roots.
    pub fn build(mut self) -> ModelHandle {
        let count = self.nodes.len();
        for node in &mut self.nodes {
            if node.parent.is_some_and(|parent| parent >= count || parent == node.index) {
                node.parent = None;
            }
        }
        match self.try_build() {
            Ok(model) => model,
            Err(_) => ModelHandle::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_hierarchy() {
        let mut builder = ModelBuilder::new();
        let root = builder.add_node("Armature", None);
        let hips = builder.add_joint("Hips", Some(root));
        let spine = builder.add_joint("Spine", Some(hips));
        let leg = builder.add_joint("LeftUpLeg", Some(hips));
        let model = builder.build();

        assert_eq!(model.roots(), &[root]);
        assert_eq!(model.node(hips).map(|n| n.children.clone()), Some(vec![spine, leg]));
        assert_eq!(model.depth(spine), 2);
        let order: Vec<&str> = model.traverse().map(|n| n.name.as_str()).collect();
        assert_eq!(order, vec!["Armature", "Hips", "Spine", "LeftUpLeg"]);
        assert_eq!(model.joints().count(), 3);
    }

    #[test]
    fn test_builder_rejects_bad_parent() {
        let mut builder = ModelBuilder::new();
        builder.add_joint("Hips", Some(7));
        let err = builder.try_build().unwrap_err();
        assert!(matches!(err, LoadError::InvalidParent { node: 0, parent: 7 }));
    }

    #[test]
    fn test_build_repairs_bad_parent() {
        let mut builder = ModelBuilder::new();
        builder.add_joint("Hips", Some(7));
        let model = builder.build();
        assert_eq!(model.roots(), &[0]);
    }

    #[test]
    fn test_from_slice_rejects_garbage() {
        let err = ModelHandle::from_slice(b"not a model").unwrap_err();
        assert!(matches!(err, LoadError::Gltf(_)));
    }

    #[test]
    fn test_load_missing_file() {
        let err = load_model("/definitely/not/here/avatar.glb").unwrap_err();
        match err {
            LoadError::Io { path, .. } => assert!(path.ends_with("avatar.glb")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_from_slice_minimal_document() {
        let json = br#"{
            "asset": { "version": "2.0" },
            "scene": 0,
            "scenes": [{ "nodes": [0] }],
            "nodes": [
                { "name": "Root", "children": [1] },
                { "name": "RightArm", "rotation": [0.0, 0.0, 0.7071068, 0.7071068] }
            ],
            "skins": [{ "joints": [1] }]
        }"#;
        let model = ModelHandle::from_slice(json).unwrap();

        assert_eq!(model.nodes().len(), 2);
        assert_eq!(model.node(1).and_then(|n| n.parent), Some(0));
        assert!(!model.nodes()[0].is_joint);
        assert!(model.nodes()[1].is_joint);
        assert!((model.nodes()[1].rotation.z - 0.707_106_8).abs() < 1e-6);
    }
}
