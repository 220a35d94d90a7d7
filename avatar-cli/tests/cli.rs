//! End-to-end tests for the `avatar` binary

use assert_cmd::Command;
use predicates::prelude::*;
use pretty_assertions::assert_eq;
use std::io::Write;

const RIG: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/../crates/avatar-rig/tests/data/avatar.gltf");

fn avatar() -> Command {
    let mut cmd = Command::cargo_bin("avatar").unwrap();
    cmd.env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_classify_names() {
    avatar()
        .args(["rig", "classify", "mixamorig:RightArm", "forearm.l", "Spine"])
        .assert()
        .success()
        .stdout(predicate::str::contains("right-arm"))
        .stdout(predicate::str::contains("left-forearm"));
}

#[test]
fn test_classify_requires_names() {
    avatar().args(["rig", "classify"]).assert().failure();
}

#[test]
fn test_joints_report() {
    avatar()
        .args(["rig", "joints", RIG])
        .assert()
        .success()
        .stdout(predicate::str::contains("Right arm found: mixamorig:RightArm"))
        .stdout(predicate::str::contains("Left forearm found: mixamorig:LeftForeArm"));
}

#[test]
fn test_bones_lists_skin_joints() {
    avatar()
        .args(["rig", "bones", RIG])
        .assert()
        .success()
        .stdout(predicate::str::contains("Joints: 9"))
        .stdout(predicate::str::contains("mixamorig:LeftHand"))
        .stdout(predicate::str::contains("Body").not());

    avatar()
        .args(["rig", "bones", "--all", RIG])
        .assert()
        .success()
        .stdout(predicate::str::contains("Body"));
}

#[test]
fn test_missing_model_fails() {
    avatar()
        .args(["rig", "joints", "does-not-exist.glb"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load model"));

    avatar()
        .args(["gesture", "play", "does-not-exist.glb"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("does-not-exist.glb"));
}

#[test]
fn test_presets_listed() {
    avatar()
        .args(["gesture", "presets"])
        .assert()
        .success()
        .stdout(predicate::str::contains("flap"))
        .stdout(predicate::str::contains("wave"))
        .stdout(predicate::str::contains("greet"));
}

#[test]
fn test_play_json_lines() {
    let output = avatar()
        .args(["gesture", "play", RIG, "--format", "json", "--every", "30"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"state\":\"completed\""))
        .stdout(predicate::str::contains("QUACK QUACK!"))
        .get_output()
        .stdout
        .clone();

    let text = String::from_utf8(output).unwrap();
    let frames: Vec<serde_json::Value> = text
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    assert!(frames.len() > 2);

    // Everything is back at rest once playback settles
    let last = frames.last().unwrap();
    assert_eq!(last["state"], "finished");
    assert_eq!(last["bubble"], serde_json::Value::Null);
    for rotation in last["joints"].as_object().unwrap().values() {
        assert_eq!(rotation, &serde_json::json!([0.0, 0.0, 0.0]));
    }
}

#[test]
fn test_play_table_with_preset() {
    avatar()
        .args(["gesture", "play", RIG, "--preset", "wave", "--every", "60"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Gesture: wave"))
        .stdout(predicate::str::contains("Joints: 4/4"));
}

#[test]
fn test_play_rejects_unknown_preset() {
    avatar()
        .args(["gesture", "play", RIG, "--preset", "moonwalk"])
        .assert()
        .failure();
}

#[test]
fn test_play_with_config_and_click() {
    let mut config = tempfile::NamedTempFile::new().unwrap();
    write!(
        config,
        r#"{{ "intro": {{ "messages": ["Hello there"], "linger_ms": 0 }}, "click_message": "Ouch" }}"#
    )
    .unwrap();

    avatar()
        .args(["gesture", "play", RIG, "--format", "json", "--every", "1"])
        .arg("--config")
        .arg(config.path())
        .args(["--click-at", "6000"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Hello there"))
        .stdout(predicate::str::contains("Ouch"));
}
