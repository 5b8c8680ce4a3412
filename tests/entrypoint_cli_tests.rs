use std::process::Command;

#[test]
fn startup_with_missing_configuration_exits_one() {
    // Run from an empty directory so no .env file can fill in the
    // required keys.
    let dir = tempfile::tempdir().expect("tempdir");
    let output = Command::new(env!("CARGO_BIN_EXE_entrykit"))
        .current_dir(dir.path())
        .env_clear()
        .args(["--", "true"])
        .output()
        .expect("entrypoint should spawn");

    assert_eq!(output.status.code(), Some(1));
    let log = String::from_utf8_lossy(&output.stdout);
    assert!(
        log.contains("configuration error"),
        "diagnostic missing from output: {log}"
    );
}

#[test]
fn missing_command_is_a_usage_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let output = Command::new(env!("CARGO_BIN_EXE_entrykit"))
        .current_dir(dir.path())
        .env_clear()
        .output()
        .expect("entrypoint should spawn");

    assert!(!output.status.success());
}
