/// End-to-end tests for config file discovery, validation and CLI option merging.
///
/// These tests run the binary inside temporary directories so that config
/// auto-discovery only sees the files each test writes.
use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

// ============================================================================
// Helper Functions
// ============================================================================

/// Copy a fixture graph into `dir` and return its path.
fn copy_fixture(dir: &Path, name: &str) -> PathBuf {
    let source = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name);
    let target = dir.join(name);
    fs::copy(source, &target).unwrap();
    target
}

/// Write a config file at the specified path.
fn write_config(path: &Path, content: &str) {
    fs::write(path, content).unwrap();
}

fn stdout_json(output: &std::process::Output) -> serde_json::Value {
    serde_json::from_slice(&output.stdout).unwrap()
}

// ============================================================================
// Auto-discovery
// ============================================================================

#[test]
fn test_discovered_config_changes_ring_geometry() {
    let temp_dir = TempDir::new().unwrap();
    let graph = copy_fixture(temp_dir.path(), "star_graph.json");
    write_config(
        &temp_dir.path().join("career-tree.config.yml"),
        "layout:\n  base_radius: 250\n",
    );

    let assert = cargo_bin_cmd!("career-tree")
        .current_dir(temp_dir.path())
        .args(["layout", "--input"])
        .arg(&graph)
        .assert()
        .success();

    let layout = stdout_json(assert.get_output());
    let child = &layout["nodes"][1]["position"];
    let radius = child["x"].as_f64().unwrap().hypot(child["y"].as_f64().unwrap());
    assert!((radius - 250.0).abs() < 1e-6, "radius {}", radius);
}

#[test]
fn test_without_config_uses_default_ring_geometry() {
    let temp_dir = TempDir::new().unwrap();
    let graph = copy_fixture(temp_dir.path(), "star_graph.json");

    let assert = cargo_bin_cmd!("career-tree")
        .current_dir(temp_dir.path())
        .args(["layout", "--input"])
        .arg(&graph)
        .assert()
        .success();

    let layout = stdout_json(assert.get_output());
    let child = &layout["nodes"][1]["position"];
    let radius = child["x"].as_f64().unwrap().hypot(child["y"].as_f64().unwrap());
    assert!((radius - 400.0).abs() < 1e-6, "radius {}", radius);
}

#[test]
fn test_discovered_invalid_config_is_application_error() {
    let temp_dir = TempDir::new().unwrap();
    let graph = copy_fixture(temp_dir.path(), "star_graph.json");
    write_config(
        &temp_dir.path().join("career-tree.config.yml"),
        "recalculation:\n  max_cache_entries: 0\n",
    );

    cargo_bin_cmd!("career-tree")
        .current_dir(temp_dir.path())
        .args(["layout", "--input"])
        .arg(&graph)
        .assert()
        .code(3)
        .stderr(predicate::str::contains("max_cache_entries"));
}

#[test]
fn test_unknown_config_fields_only_warn() {
    let temp_dir = TempDir::new().unwrap();
    let graph = copy_fixture(temp_dir.path(), "star_graph.json");
    write_config(
        &temp_dir.path().join("career-tree.config.yml"),
        "colour_scheme: dark\nlayout:\n  spiral: true\n",
    );

    cargo_bin_cmd!("career-tree")
        .current_dir(temp_dir.path())
        .args(["layout", "--input"])
        .arg(&graph)
        .assert()
        .success()
        .stderr(predicate::str::contains("colour_scheme"))
        .stderr(predicate::str::contains("layout.spiral"));
}

// ============================================================================
// Explicit --config
// ============================================================================

#[test]
fn test_explicit_config_path() {
    let temp_dir = TempDir::new().unwrap();
    let graph = copy_fixture(temp_dir.path(), "scattered_graph.json");
    let config_path = temp_dir.path().join("custom.yml");
    write_config(&config_path, "grid_size: 2000\n");

    let assert = cargo_bin_cmd!("career-tree")
        .args(["--config"])
        .arg(&config_path)
        .args(["layout", "--bounds", "-10,10,-10,10", "--input"])
        .arg(&graph)
        .assert()
        .success();

    let layout = stdout_json(assert.get_output());
    assert_eq!(layout["index"]["gridSize"], 2000.0);
    assert_eq!(layout["visible"]["count"], 1);
}

#[test]
fn test_cli_grid_size_overrides_config() {
    let temp_dir = TempDir::new().unwrap();
    let graph = copy_fixture(temp_dir.path(), "scattered_graph.json");
    let config_path = temp_dir.path().join("custom.yml");
    write_config(&config_path, "grid_size: 2000\n");

    let assert = cargo_bin_cmd!("career-tree")
        .args(["--config"])
        .arg(&config_path)
        .args(["layout", "--grid-size", "250", "--input"])
        .arg(&graph)
        .assert()
        .success();

    assert_eq!(stdout_json(assert.get_output())["index"]["gridSize"], 250.0);
}

#[test]
fn test_explicit_config_missing_file() {
    let temp_dir = TempDir::new().unwrap();
    let graph = copy_fixture(temp_dir.path(), "star_graph.json");

    cargo_bin_cmd!("career-tree")
        .args(["--config", "/nonexistent/career-tree.yml", "layout", "--input"])
        .arg(&graph)
        .assert()
        .code(3)
        .stderr(predicate::str::contains("Failed to read config file"));
}

#[test]
fn test_config_api_base_must_be_http() {
    let temp_dir = TempDir::new().unwrap();
    let graph = copy_fixture(temp_dir.path(), "star_graph.json");
    write_config(
        &temp_dir.path().join("career-tree.config.yml"),
        "api_base: ftp://careers.example.com\n",
    );

    cargo_bin_cmd!("career-tree")
        .current_dir(temp_dir.path())
        .args(["recalculate", "--input"])
        .arg(&graph)
        .assert()
        .code(3)
        .stderr(predicate::str::contains("scheme must be http or https"));
}

#[test]
fn test_config_api_base_used_without_flag() {
    let temp_dir = TempDir::new().unwrap();
    let graph = copy_fixture(temp_dir.path(), "star_graph.json");
    write_config(
        &temp_dir.path().join("career-tree.config.yml"),
        "api_base: http://127.0.0.1:1/api\nrecalculation:\n  timeout_secs: 2\n",
    );

    cargo_bin_cmd!("career-tree")
        .current_dir(temp_dir.path())
        .env_remove("CAREER_TREE_API_BASE")
        .args(["recalculate", "--input"])
        .arg(&graph)
        .assert()
        .code(3)
        .stderr(predicate::str::contains("Network error during recalculation"));
}
