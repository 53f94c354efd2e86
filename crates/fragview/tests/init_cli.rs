use std::process::Command;

use tempfile::TempDir;

#[test]
fn init_writes_a_starter_shader_once() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("default.frag");

    let status = Command::new(env!("CARGO_BIN_EXE_fragview"))
        .arg("init")
        .arg(&path)
        .status()
        .expect("failed to run fragview init");
    assert!(status.success());

    let contents = std::fs::read_to_string(&path).unwrap();
    assert!(contents.contains("uniform ivec2 iResolution"));
    assert!(contents.contains("void main()"));

    let rerun = Command::new(env!("CARGO_BIN_EXE_fragview"))
        .arg("init")
        .arg(&path)
        .status()
        .expect("failed to rerun fragview init");
    assert!(!rerun.success(), "init must not overwrite an existing file");
}

#[test]
fn run_with_a_missing_shader_fails_with_a_diagnostic() {
    let dir = TempDir::new().unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_fragview"))
        .arg(dir.path().join("nonexistent.frag"))
        .output()
        .expect("failed to run fragview");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("nonexistent.frag"), "stderr was: {stderr}");
}
