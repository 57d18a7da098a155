use assert_cmd::prelude::*;
use predicates::str::contains;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

fn bundled_assets() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("assets")
}

/// Copies the bundled model and shaders into a scratch directory so a test
/// can add or break individual files.
fn scratch_assets() -> TempDir {
    let dir = tempfile::tempdir().expect("temp dir");
    for name in ["model.json", "vertex.wgsl", "fragment.wgsl"] {
        fs::copy(bundled_assets().join(name), dir.path().join(name)).expect("copy asset");
    }
    dir
}

fn showcase() -> Command {
    Command::cargo_bin("showcase").expect("binary exists")
}

#[test]
fn summary_reports_scene_and_frames() {
    let mut cmd = showcase();
    cmd.arg(bundled_assets()).arg("--summary-only");
    cmd.assert()
        .success()
        .stdout(contains("Loaded model with 24 vertices (12 triangles)"))
        .stdout(contains(
            "Material specular=(0.90, 0.90, 0.90) emission=(0.02, 0.02, 0.02) roughness=0.35 metallic=0.10",
        ))
        .stdout(contains("Direction lights (3 lit):"))
        .stdout(contains(
            " - [1] intensity=(0.50, 0.00, 0.00) direction=(1.00, 0.50, 1.50)",
        ))
        .stdout(contains(
            " - [3] intensity=(0.00, 0.00, 0.00) direction=(0.00, 0.00, 0.00)",
        ))
        .stdout(contains("Frame 1 angle=0.0000 flushed=384 bytes"))
        .stdout(contains("Frame 2 angle=0.0105 flushed=64 bytes"))
        .stdout(contains("Rendered 3 frame(s)"));
}

#[test]
fn frame_count_is_configurable() {
    let mut cmd = showcase();
    cmd.arg(bundled_assets())
        .arg("--summary-only")
        .args(["--frames", "10"]);
    cmd.assert()
        .success()
        .stdout(contains("Frame 10 "))
        .stdout(contains("Rendered 10 frame(s)"));
}

#[test]
fn missing_optional_files_fall_back_to_defaults() {
    let assets = scratch_assets();
    let mut cmd = showcase();
    cmd.arg(assets.path()).arg("--summary-only");
    cmd.assert()
        .success()
        .stdout(contains(
            "Material specular=(0.50, 0.50, 0.50) emission=(0.00, 0.00, 0.00) roughness=0.50 metallic=0.00",
        ))
        .stdout(contains(
            " - [0] intensity=(0.00, 0.50, 0.00) direction=(0.00, 0.50, 1.50)",
        ));
}

#[test]
fn lights_and_config_files_override_defaults() {
    let assets = scratch_assets();
    let lights = assets.path().join("white.json");
    fs::write(
        &lights,
        r#"[{"intensity": [1, 1, 1], "direction": [0, 0, 1]}]"#,
    )
    .expect("write lights");
    let config = assets.path().join("close.json");
    fs::write(&config, r#"{"eye": [0, 0, 20]}"#).expect("write config");

    let mut cmd = showcase();
    cmd.arg(assets.path())
        .arg("--summary-only")
        .arg("--lights")
        .arg(&lights)
        .arg("--config")
        .arg(&config);
    cmd.assert()
        .success()
        .stdout(contains("Direction lights (1 lit):"))
        .stdout(contains("-20.0000    1.0000]"));
}

#[test]
fn invalid_model_aborts_startup() {
    let assets = scratch_assets();
    fs::write(
        assets.path().join("model.json"),
        r#"{"meshes": [{"vertices": [0, 0, 0, 1, 0, 0, 0, 1, 0], "faces": [[0, 1, 99]]}]}"#,
    )
    .expect("write model");

    let mut cmd = showcase();
    cmd.arg(assets.path()).arg("--summary-only");
    cmd.assert()
        .failure()
        .stderr(contains("failed to parse model.json"))
        .stderr(contains("face index 99 is out of range for 3 vertices"));
}

#[test]
fn zero_rotation_period_is_rejected() {
    let assets = scratch_assets();
    fs::write(
        assets.path().join("scene.json"),
        r#"{"rotation_period_secs": 0}"#,
    )
    .expect("write config");

    let mut cmd = showcase();
    cmd.arg(assets.path()).arg("--summary-only");
    cmd.assert()
        .failure()
        .stderr(contains("rotation_period_secs must be a positive number of seconds"));
}

#[test]
fn too_many_lights_is_rejected() {
    let assets = scratch_assets();
    let light = r#"{"intensity": [1, 1, 1], "direction": [0, 0, 1]}"#;
    let rig = format!("[{}]", vec![light; 5].join(","));
    fs::write(assets.path().join("lights.json"), rig).expect("write lights");

    let mut cmd = showcase();
    cmd.arg(assets.path()).arg("--summary-only");
    cmd.assert()
        .failure()
        .stderr(contains("5 direction lights given, at most 4 are supported"));
}

#[test]
fn missing_assets_dir_prints_usage() {
    let mut cmd = showcase();
    cmd.assert().failure().stderr(contains("Usage: showcase"));
}
