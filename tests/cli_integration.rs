use assert_cmd::Command;
use predicates::prelude::*;
use std::fs::{self, File};
use std::io::Write;
use tempfile::TempDir;

fn deepsweep() -> Command {
    let mut cmd = Command::cargo_bin("deepsweep").unwrap();
    // Keep the user's own config and log filter out of the run.
    cmd.env_remove("DEEPSWEEP_CONFIG").env_remove("RUST_LOG");
    cmd
}

fn create_test_tree() -> TempDir {
    let dir = TempDir::new().unwrap();
    let root = dir.path();

    fs::create_dir_all(root.join("small/node_modules")).unwrap();
    File::create(root.join("small/node_modules/a.js"))
        .unwrap()
        .write_all(b"aaaa")
        .unwrap();

    fs::create_dir_all(root.join("big/node_modules/pkg")).unwrap();
    for i in 0..4 {
        File::create(root.join(format!("big/node_modules/pkg/f{}.js", i)))
            .unwrap()
            .write_all(&[b'x'; 250])
            .unwrap();
    }

    fs::create_dir_all(root.join("crate/target/debug")).unwrap();

    dir
}

#[test]
fn shows_help() {
    deepsweep()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("dependency folders"))
        .stdout(predicate::str::contains("--target"));
}

#[test]
fn shows_version() {
    deepsweep()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn prints_one_line_per_match() {
    let tmp = create_test_tree();

    deepsweep()
        .arg(tmp.path())
        .args(["--target", "node_modules"])
        .assert()
        .success()
        .stdout(predicate::str::contains("small/node_modules"))
        .stdout(predicate::str::contains("big/node_modules"))
        .stdout(predicate::str::contains("crate/target").not());
}

#[test]
fn result_line_has_counts_and_path() {
    let tmp = create_test_tree();

    let output = deepsweep()
        .arg(tmp.path())
        .args(["-t", "node_modules"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    let line = stdout
        .lines()
        .find(|l| l.ends_with("small/node_modules"))
        .unwrap();
    let fields: Vec<&str> = line.split('\t').collect();
    assert_eq!(fields.len(), 3);
    assert_eq!(fields[0].trim(), "2");
    assert!(fields[1].trim().ends_with('B'));
}

#[test]
fn prints_total_to_stderr() {
    let tmp = create_test_tree();

    deepsweep()
        .arg(tmp.path())
        .args(["-t", "node_modules"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Total cleanable discovered: 8 files"));
}

#[test]
fn sort_orders_by_file_count() {
    let tmp = create_test_tree();

    let output = deepsweep()
        .arg(tmp.path())
        .args(["-t", "node_modules", "--sort", "--quiet"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].ends_with("big/node_modules"));
    assert!(lines[1].ends_with("small/node_modules"));
}

#[test]
fn json_output_is_valid() {
    let tmp = create_test_tree();

    let output = deepsweep()
        .arg(tmp.path())
        .args(["-t", "node_modules", "--json", "--quiet"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["results"].as_array().unwrap().len(), 2);
    assert_eq!(report["total"]["files"], 8);
    assert_eq!(report["total"]["bytes"], 1004);
}

#[test]
fn empty_target_list_finds_nothing() {
    let tmp = create_test_tree();

    deepsweep()
        .arg(tmp.path())
        .args(["--target", ""])
        .assert()
        .success()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("0 files"));
}

#[test]
fn config_file_supplies_targets() {
    let tmp = create_test_tree();
    let config = tmp.path().join("deepsweep.toml");
    fs::write(&config, "[scanner]\ntargets = [\"target\"]\n").unwrap();

    deepsweep()
        .arg(tmp.path())
        .arg("--config")
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("crate/target"))
        .stdout(predicate::str::contains("node_modules").not());
}

#[test]
fn command_line_targets_override_config() {
    let tmp = create_test_tree();
    let config = tmp.path().join("deepsweep.toml");
    fs::write(&config, "[scanner]\ntargets = [\"target\"]\n").unwrap();

    deepsweep()
        .arg(tmp.path())
        .args(["-t", "node_modules"])
        .env("DEEPSWEEP_CONFIG", &config)
        .assert()
        .success()
        .stdout(predicate::str::contains("node_modules"))
        .stdout(predicate::str::contains("crate/target").not());
}

#[test]
fn nonexistent_path_fails() {
    let tmp = TempDir::new().unwrap();

    deepsweep()
        .arg(tmp.path().join("nope"))
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Fatal:"))
        .stderr(predicate::str::contains("Total").not());
}

#[test]
fn excessive_jobs_are_rejected() {
    let tmp = TempDir::new().unwrap();

    deepsweep()
        .arg(tmp.path())
        .args(["-j", "1000000"])
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("--jobs"));
}

#[test]
fn missing_config_file_fails() {
    let tmp = TempDir::new().unwrap();

    deepsweep()
        .arg(tmp.path())
        .args(["--config", "/nonexistent/deepsweep.toml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read config file"));
}

#[test]
fn invalid_config_file_fails() {
    let tmp = TempDir::new().unwrap();
    let config = tmp.path().join("bad.toml");
    fs::write(&config, "[scanner]\nworkers = \"many\"\n").unwrap();

    deepsweep()
        .arg(tmp.path())
        .arg("--config")
        .arg(&config)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to parse config file"));
}

#[test]
fn generates_completions() {
    deepsweep()
        .args(["--completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("deepsweep"));
}

#[test]
fn verbose_logs_go_to_stderr() {
    let tmp = create_test_tree();

    deepsweep()
        .arg(tmp.path())
        .args(["-t", "node_modules", "-vv"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Scan").not())
        .stderr(predicate::str::contains("Scanning directory"));
}
