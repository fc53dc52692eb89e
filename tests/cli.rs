//! CLI tests for the gtkmmcargo binary
//!
//! These run the built executable inside scratch directories and check the
//! template, flag printing, missing-config behavior, and what reaches piped
//! output when the compiler fails.

use gtkmmcargo::config::{BuildSpec, DEFAULT_CONFIG_FILE_NAME};
use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

fn gtkmmcargo(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_gtkmmcargo"))
        .args(args)
        .current_dir(dir)
        .output()
        .expect("Failed to execute gtkmmcargo")
}

#[test]
fn test_template_is_written_with_default_flags() {
    let tmp = TempDir::new().unwrap();

    let output = gtkmmcargo(tmp.path(), &["--config", "template"]);

    assert!(
        output.status.success(),
        "template failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let cfg = tmp.path().join(DEFAULT_CONFIG_FILE_NAME);
    let spec = BuildSpec::try_load(&cfg).expect("template should load");
    assert_eq!(spec.custom_compile_flags, vec!["-Wall", "-std=c++17", "-O3"]);
    assert!(spec.source_files.is_empty());
}

#[test]
fn test_template_does_not_overwrite() {
    let tmp = TempDir::new().unwrap();
    let cfg = tmp.path().join(DEFAULT_CONFIG_FILE_NAME);
    fs::write(&cfg, "{ \"executable_name\": \"keep\" }").unwrap();

    let output = gtkmmcargo(tmp.path(), &["--config", "template"]);

    assert!(!output.status.success());
    assert_eq!(
        fs::read_to_string(&cfg).unwrap(),
        "{ \"executable_name\": \"keep\" }"
    );
}

#[test]
fn test_template_scan_lists_sources() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("main.cc"), "int main() { return 0; }\n").unwrap();
    fs::write(tmp.path().join("notes.txt"), "todo\n").unwrap();

    let output = gtkmmcargo(tmp.path(), &["--config", "template", "--scan"]);

    assert!(output.status.success());
    let text = fs::read_to_string(tmp.path().join(DEFAULT_CONFIG_FILE_NAME)).unwrap();
    assert!(text.contains("main.cc"));
    assert!(!text.contains("notes.txt"));
}

#[test]
fn test_missing_config_is_not_a_crash() {
    let tmp = TempDir::new().unwrap();

    let output = gtkmmcargo(tmp.path(), &[]);

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(output.status.code(), Some(1));
    assert!(
        stdout.contains("Nothing to build"),
        "unexpected output: {}",
        stdout
    );
}

#[test]
fn test_config_without_value_prints_flags() {
    let tmp = TempDir::new().unwrap();

    let output = gtkmmcargo(tmp.path(), &["--config"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("gtkmm compiler flags"));
    assert!(stdout.contains("gtkmm linker flags"));
}

#[cfg(unix)]
fn failing_compiler(dir: &Path) -> std::path::PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let script = dir.join("fake-cxx.sh");
    fs::write(
        &script,
        "#!/bin/sh\necho 'main.cc:1:1: error: unknown type name GtkWidgetz' >&2\nexit 1\n",
    )
    .unwrap();
    fs::set_permissions(&script, fs::Permissions::from_mode(0o755)).unwrap();
    script
}

#[cfg(unix)]
#[test]
fn test_compiler_diagnostics_reach_piped_output() {
    let tmp = TempDir::new().unwrap();
    let compiler = failing_compiler(tmp.path());
    fs::write(tmp.path().join("main.cc"), "GtkWidgetz w;\n").unwrap();
    let spec = BuildSpec {
        project_directory: tmp.path().to_path_buf(),
        executable_name: "app".into(),
        source_files: vec!["main.cc".into(), "absent.cc".into()],
        ..BuildSpec::new()
    };
    spec.save(tmp.path().join(DEFAULT_CONFIG_FILE_NAME)).unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_gtkmmcargo"))
        .current_dir(tmp.path())
        .env("CXX", &compiler)
        .output()
        .expect("Failed to execute gtkmmcargo");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(output.status.code(), Some(1));
    assert!(
        stdout.contains("unknown type name GtkWidgetz"),
        "compiler stderr missing from output: {}",
        stdout
    );
    assert!(
        stdout.contains("File not exists"),
        "missing-file diagnostic absent: {}",
        stdout
    );
    assert!(stdout.contains("Compilation failure"));
}

#[test]
fn test_log_output_has_no_ansi_when_piped() {
    let tmp = TempDir::new().unwrap();

    // pkg-config warnings (if any) land on the piped stderr
    let output = gtkmmcargo(tmp.path(), &["--config"]);

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(!stderr.contains('\x1b'), "escape codes in: {:?}", stderr);
}

#[test]
fn test_scan_without_template_is_rejected() {
    let tmp = TempDir::new().unwrap();

    let output = gtkmmcargo(tmp.path(), &["--scan"]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("--scan"), "unexpected stderr: {}", stderr);
    assert!(!tmp.path().join(DEFAULT_CONFIG_FILE_NAME).exists());
}

#[test]
fn test_config_failure_is_reported_once() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join(DEFAULT_CONFIG_FILE_NAME), "{ not json").unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_gtkmmcargo"))
        .current_dir(tmp.path())
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute gtkmmcargo");

    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert_eq!(output.status.code(), Some(1));
    assert!(stdout.contains("Nothing to build"));
    assert!(
        !stderr.contains("no build specification"),
        "config failure logged at default level: {}",
        stderr
    );
}
