//! Integration tests for the testbed CLI
//!
//! These tests exercise the CLI commands end-to-end using assert_cmd.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Small counts so a run finishes quickly
const SMALL_CONFIG: &str = "\
max_phb_per_test_type: 1
max_data_plots: 1
max_nods: 1
max_photographs: 1
max_test_logs: 1
max_receiving_images: 1
";

/// Helper to get a testbed command isolated from the user's environment
fn testbed(tmp: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("testbed").unwrap();
    cmd.current_dir(tmp.path())
        .env("XDG_CONFIG_HOME", tmp.path().join(".config"))
        .env("HOME", tmp.path())
        .env_remove("TESTBED_SEED")
        .env_remove("TESTBED_FONT")
        .env_remove("RUST_LOG");
    cmd
}

/// Temp dir with a small local config
fn setup() -> TempDir {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("testbed.yaml"), SMALL_CONFIG).unwrap();
    tmp
}

fn projects(dir: &Path) -> Vec<PathBuf> {
    let mut dirs: Vec<PathBuf> = fs::read_dir(dir)
        .unwrap()
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.is_dir())
        .collect();
    dirs.sort();
    dirs
}

fn tree(root: &Path) -> Vec<String> {
    let mut entries: Vec<String> = walkdir::WalkDir::new(root)
        .into_iter()
        .filter_map(|e| e.ok())
        .map(|e| e.path().strip_prefix(root).unwrap().to_string_lossy().to_string())
        .collect();
    entries.sort();
    entries
}

// ============================================================================
// General
// ============================================================================

#[test]
fn test_help() {
    let tmp = setup();
    testbed(&tmp)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("generate"))
        .stdout(predicate::str::contains("audit"));
}

#[test]
fn test_version() {
    let tmp = setup();
    testbed(&tmp)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("testbed"));
}

#[test]
fn test_completions_bash() {
    let tmp = setup();
    testbed(&tmp)
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("testbed"));
}

#[test]
fn test_completions_zsh_and_powershell() {
    let tmp = setup();
    testbed(&tmp)
        .args(["completions", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("#compdef testbed"));
    testbed(&tmp)
        .args(["completions", "powershell"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Register-ArgumentCompleter"));
}

#[test]
fn test_themes_lists_catalog() {
    let tmp = setup();
    testbed(&tmp)
        .arg("themes")
        .assert()
        .success()
        .stdout(predicate::str::contains("Rocket Engine"))
        .stdout(predicate::str::contains("Docking Mechanism"))
        .stdout(predicate::str::contains("EMIEMC"));
}

// ============================================================================
// Generate
// ============================================================================

#[test]
fn test_generate_creates_projects() {
    let tmp = setup();
    testbed(&tmp)
        .args(["generate", "--projects", "2", "--seed", "7", "--output-dir", "out"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Generation Summary"))
        .stdout(predicate::str::contains("Projects attempted"));

    let out = tmp.path().join("out");
    let dirs = projects(&out);
    assert!(!dirs.is_empty() && dirs.len() <= 2);
    for project in dirs {
        let name = project.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("PD"));
        assert!(project.join("admin/PO").is_dir());
        assert!(project.join("testing/Environmental").is_dir());
        assert!(project.join("receiving").is_dir());
    }
}

#[test]
fn test_generate_theme_restriction() {
    let tmp = setup();
    testbed(&tmp)
        .args([
            "generate",
            "--projects",
            "1",
            "--seed",
            "11",
            "--themes",
            "Rocket Engine",
            "--output-dir",
            "out",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("[Rocket Engine]"));
}

#[test]
fn test_generate_seed_from_environment_is_reproducible() {
    let a = setup();
    let b = setup();
    for tmp in [&a, &b] {
        testbed(tmp)
            .env("TESTBED_SEED", "99")
            .args(["generate", "--projects", "1", "--output-format", "png", "--output-dir", "out"])
            .assert()
            .success();
    }
    let tree_a = tree(&a.path().join("out"));
    assert!(tree_a.iter().any(|p| p.contains("receiving")));
    assert_eq!(tree_a, tree(&b.path().join("out")));
}

#[test]
fn test_generate_raster_documents() {
    let tmp = setup();
    fs::write(
        tmp.path().join("always.yaml"),
        "admin_document_chance: 1.0\nmax_phb_per_test_type: 0\n",
    )
    .unwrap();
    testbed(&tmp)
        .args([
            "generate",
            "--projects",
            "1",
            "--seed",
            "5",
            "--output-format",
            "jpg",
            "--config",
            "always.yaml",
            "--output-dir",
            "out",
        ])
        .assert()
        .success();

    let project = &projects(&tmp.path().join("out"))[0];
    let po: Vec<_> = fs::read_dir(project.join("admin/PO")).unwrap().collect();
    assert_eq!(po.len(), 1);
    let name = po[0].as_ref().unwrap().file_name().to_string_lossy().to_string();
    assert!(name.starts_with("PO") && name.ends_with(".jpg"));
}

#[test]
fn test_generate_rejects_invalid_config() {
    let tmp = setup();
    fs::write(tmp.path().join("bad.yaml"), "nod_chance: 3.5\n").unwrap();
    testbed(&tmp)
        .args(["generate", "--config", "bad.yaml", "--output-dir", "out"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("nod_chance"));
}

#[test]
fn test_generate_missing_config_file() {
    let tmp = setup();
    testbed(&tmp)
        .args(["generate", "--config", "nope.yaml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn test_generate_writes_log_file() {
    let tmp = setup();
    testbed(&tmp)
        .args([
            "--log-file",
            "run.log",
            "generate",
            "--projects",
            "1",
            "--seed",
            "3",
            "--output-dir",
            "out",
        ])
        .assert()
        .success();
    let log = fs::read_to_string(tmp.path().join("run.log")).unwrap();
    assert!(log.contains("creating project"));
}

// ============================================================================
// Audit
// ============================================================================

#[test]
fn test_audit_missing_directory_fails() {
    let tmp = setup();
    testbed(&tmp)
        .args(["audit", "does-not-exist"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn test_audit_flags_empty_project() {
    let tmp = setup();
    fs::create_dir_all(tmp.path().join("out/PD00000001 Empty Corp")).unwrap();
    testbed(&tmp)
        .args(["audit", "out"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("No files in any subdirectories"))
        .stdout(predicate::str::contains("FAIL"));
}

#[test]
fn test_audit_generated_tree_has_full_schema() {
    let tmp = setup();
    fs::write(
        tmp.path().join("full.yaml"),
        "admin_document_chance: 1.0\nmax_phb_per_test_type: 1\n",
    )
    .unwrap();
    testbed(&tmp)
        .args([
            "generate",
            "--projects",
            "1",
            "--seed",
            "21",
            "--config",
            "full.yaml",
            "--output-dir",
            "out",
        ])
        .assert()
        .success();

    // data folders may legitimately be empty, but no schema folder is ever missing
    testbed(&tmp)
        .args(["audit", "out"])
        .assert()
        .stdout(predicate::str::contains("Missing folder").not())
        .stdout(predicate::str::contains("Projects audited: PD"));
}

#[test]
fn test_audit_single_project() {
    let tmp = setup();
    fs::create_dir_all(tmp.path().join("out/PD11111111 Alpha")).unwrap();
    fs::create_dir_all(tmp.path().join("out/PD22222222 Beta")).unwrap();
    testbed(&tmp)
        .args(["audit", "out", "--project", "22222222"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("PD22222222 Beta"))
        .stdout(predicate::str::contains("PD11111111").not());
}
