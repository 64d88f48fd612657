//! CLI command integration tests.
//! Config files live in a temp directory; TFIELD_CONFIG is cleared unless a
//! test sets it.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn tfield() -> Command {
    #[allow(deprecated)]
    let mut cmd = Command::cargo_bin("tfield").unwrap();
    cmd.env_remove("TFIELD_CONFIG");
    cmd
}

fn write_config(dir: &TempDir, body: &str) -> std::path::PathBuf {
    let path = dir.path().join("tfield.toml");
    std::fs::write(&path, body).unwrap();
    path
}

fn stdout_json(output: &std::process::Output) -> serde_json::Value {
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    serde_json::from_slice(&output.stdout).expect("stdout should be JSON")
}

#[test]
fn mount_prints_summary() {
    let output = tfield()
        .args(["mount", "/models/vision/realtime"])
        .output()
        .unwrap();
    let json = stdout_json(&output);
    assert_eq!(json["dtype"], "uint8");
    assert_eq!(json["architecture"]["kind"], "cnn");
    assert_eq!(json["elements"], 64 * 64);
}

#[test]
fn mount_invalid_path_fails() {
    tfield()
        .args(["mount", "/"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid mount path"));
}

#[test]
fn remount_changes_dtype() {
    let output = tfield()
        .args(["remount", "/inference/nlp/precise", "/models/vision/realtime"])
        .output()
        .unwrap();
    let json = stdout_json(&output);
    assert_eq!(json["source"]["dtype"], "float32");
    assert_eq!(json["target"]["dtype"], "uint8");
    assert_eq!(json["source"]["shape"], json["target"]["shape"]);
    assert_ne!(json["source"]["id"], json["target"]["id"]);
}

#[test]
fn intent_creation_spawns() {
    let output = tfield()
        .args(["intent", "Create a todo app", "--context", "likes react"])
        .output()
        .unwrap();
    let json = stdout_json(&output);
    assert_eq!(json["intent"]["task"], "creation");
    assert_eq!(json["spawned"].as_array().unwrap().len(), 1);
    assert!(json["memory"].as_u64().unwrap() >= 3);
}

#[test]
fn config_file_shapes_agent() {
    let dir = TempDir::new().unwrap();
    let path = write_config(
        &dir,
        "[persona]\ncreativity = 0.2\nprecision = 0.2\nbolt_integration = false\n\n\
         [tensor]\nshape = [4, 4]\nseed = 11\n",
    );

    let output = tfield()
        .arg("--config")
        .arg(&path)
        .args(["intent", "Create a todo app"])
        .output()
        .unwrap();
    let json = stdout_json(&output);
    assert!(json["spawned"].as_array().unwrap().is_empty());
    assert!(
        json["response"]
            .as_str()
            .unwrap()
            .starts_with("Here is a direct approach")
    );

    let output = tfield()
        .arg("--config")
        .arg(&path)
        .args(["mount", "/audio/classify"])
        .output()
        .unwrap();
    assert_eq!(stdout_json(&output)["elements"], 16);
}

#[test]
fn config_from_env_var() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "[memory]\nmax_results = 2\n");

    tfield()
        .env("TFIELD_CONFIG", &path)
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("max_results = 2"))
        .stdout(predicate::str::contains("window_capacity = 100"))
        .stdout(predicate::str::contains("retrieval_threshold = 0.7\n"))
        .stdout(predicate::str::contains("creativity = 0.8\n"))
        .stdout(predicate::str::contains("adaptation_rate = 0.1\n"));
}

#[test]
fn invalid_config_fails() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "[memory\nmax_results = ");

    tfield()
        .arg("--config")
        .arg(&path)
        .arg("states")
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid config"));
}

#[test]
fn states_lists_domains() {
    let output = tfield().arg("states").output().unwrap();
    let json = stdout_json(&output);
    for domain in ["general", "multimodal", "nlp", "sequence", "vision"] {
        assert_eq!(json[domain].as_array().unwrap().len(), 3, "{domain}");
    }
}
