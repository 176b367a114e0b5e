//! Integration tests that run the CLI binary.

use std::path::Path;

fn bin(presets_dir: &Path, chats_dir: &Path) -> std::process::Command {
    let mut cmd = std::process::Command::new(env!("CARGO_BIN_EXE_kolosal"));
    cmd.env("KOLOSAL_PRESETS_DIR", presets_dir);
    cmd.env("KOLOSAL_CHATS_DIR", chats_dir);
    cmd
}

fn bin_in(tmp: &tempfile::TempDir) -> std::process::Command {
    bin(&tmp.path().join("presets"), &tmp.path().join("chats"))
}

#[test]
fn cli_help_succeeds_and_outputs_usage() {
    let tmp = tempfile::TempDir::new().expect("temp dir");
    let output = bin_in(&tmp)
        .arg("--help")
        .output()
        .expect("binary not found - run cargo build first");

    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("kolosal"));
    assert!(stdout.contains("preset"));
}

#[test]
fn cli_version_succeeds() {
    let tmp = tempfile::TempDir::new().expect("temp dir");
    let output = bin_in(&tmp)
        .arg("--version")
        .output()
        .expect("binary not found - run cargo build first");

    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("kolosal"));
}

#[test]
fn preset_list_seeds_default_on_first_run() {
    let tmp = tempfile::TempDir::new().expect("temp dir");
    let output = bin_in(&tmp)
        .args(["preset", "list"])
        .output()
        .expect("run binary");

    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert!(String::from_utf8_lossy(&output.stdout).contains("default"));
    assert!(tmp.path().join("presets").join("default.json").exists());
}

#[test]
fn single_prompt_prints_placeholder_reply() {
    let tmp = tempfile::TempDir::new().expect("temp dir");
    let output = bin_in(&tmp)
        .args(["-p", "hello there"])
        .output()
        .expect("run binary");

    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Hello! I am an assistant"));
    assert!(tmp.path().join("chats").join("New Chat.json").exists());
}

#[test]
fn preset_new_with_reserved_char_fails() {
    let tmp = tempfile::TempDir::new().expect("temp dir");
    let output = bin_in(&tmp)
        .args(["preset", "new", "a/b"])
        .output()
        .expect("run binary");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Invalid preset name"), "got: {}", stderr);
}

#[test]
fn preset_export_writes_json_outside_store() {
    let tmp = tempfile::TempDir::new().expect("temp dir");
    let target = tmp.path().join("out").join("default.json");

    let output = bin_in(&tmp)
        .args(["preset", "export", "default"])
        .arg(&target)
        .output()
        .expect("run binary");

    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let data = std::fs::read_to_string(&target).expect("exported file");
    assert!(data.contains("\"systemPrompt\""));
}
