//! Integration tests for avatar model loading and joint discovery

use std::path::PathBuf;

use avatar_rig::{Axis, JointId, JointRole, LoadError, RigTarget, Skeleton, derive_joints, load_model};
use pretty_assertions::assert_eq;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("data")
        .join(name)
}

#[test]
fn test_load_fixture_hierarchy() {
    let model = load_model(fixture("avatar.gltf")).unwrap();

    assert_eq!(model.nodes().len(), 11);
    assert_eq!(model.roots(), &[0]);
    assert_eq!(model.joints().count(), 9);
    assert!(!model.nodes()[10].is_joint);
    assert_eq!(model.depth(5), 5);

    let names: Vec<&str> = model.traverse().map(|node| node.name.as_str()).collect();
    assert_eq!(names.first(), Some(&"Armature"));
    assert_eq!(names.last(), Some(&"Body"));
}

#[test]
fn test_derive_joints_from_fixture() {
    let _ = env_logger::builder().is_test(true).try_init();
    let model = load_model(fixture("avatar.gltf")).unwrap();
    let joints = derive_joints(&model);

    assert_eq!(joints.get(JointRole::RightArm), Some(JointId(4)));
    assert_eq!(joints.get(JointRole::RightForearm), Some(JointId(5)));
    assert_eq!(joints.get(JointRole::LeftArm), Some(JointId(7)));
    assert_eq!(joints.get(JointRole::LeftForearm), Some(JointId(8)));
    assert!(joints.missing().is_empty());
}

#[test]
fn test_skeleton_keeps_rest_pose() {
    let model = load_model(fixture("avatar.gltf")).unwrap();
    let mut skeleton = Skeleton::from_model(&model, 1.3);

    assert_eq!(skeleton.joint_count(), 9);
    let rest = skeleton.joint(JointId(4)).map(|pose| pose.rest).unwrap();
    assert!((rest.z + 0.382_683_4).abs() < 1e-6);

    skeleton.set_rotation(JointId(4), Axis::Z, 0.25);
    let pose = skeleton.joint(JointId(4)).unwrap();
    assert!(pose.local_rotation().angle_between(pose.rest) > 0.2);
}

#[test]
fn test_load_from_temp_copy() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("copy.gltf");
    std::fs::copy(fixture("avatar.gltf"), &path).unwrap();

    let model = load_model(&path).unwrap();
    assert_eq!(model.nodes().len(), 11);
}

#[test]
fn test_load_truncated_file_fails() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.glb");
    std::fs::write(&path, b"glTF\x02\x00\x00\x00").unwrap();

    let err = load_model(&path).unwrap_err();
    assert!(matches!(err, LoadError::Gltf(_)));
}
