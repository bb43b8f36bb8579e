use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Word outline on a unit page.
fn word(content: &str, center_x: f64, center_y: f64) -> serde_json::Value {
    let (x1, x2) = (center_x - 0.01, center_x + 0.01);
    let (y1, y2) = (center_y - 0.01, center_y + 0.01);
    serde_json::json!({
        "content": content,
        "polygon": [x1, y1, x2, y1, x2, y2, x1, y2],
    })
}

fn write_layout(dir: &Path, name: &str, pages: serde_json::Value) -> PathBuf {
    let path = dir.join(name);
    let document = serde_json::json!({ "analyzeResult": { "pages": pages } });
    fs::write(&path, document.to_string()).unwrap();
    path
}

fn two_line_page() -> serde_json::Value {
    serde_json::json!([{
        "pageNumber": 1,
        "width": 1.0,
        "height": 1.0,
        "words": [word("bottom", 0.1, 0.5), word("top", 0.1, 0.1)],
    }])
}

/// Empty config file so the user's own config is never read.
fn config_file(dir: &Path) -> String {
    let path = dir.join("config.json");
    fs::write(&path, "{}").unwrap();
    path.display().to_string()
}

fn ocrline(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("ocrline").unwrap();
    cmd.arg("--config").arg(config_file(dir));
    cmd
}

#[test]
fn test_process_prints_lines_in_reading_order() {
    let dir = TempDir::new().unwrap();
    let input = write_layout(dir.path(), "doc.json", two_line_page());

    ocrline(dir.path())
        .arg("process")
        .arg(&input)
        .assert()
        .success()
        .stdout("top\nbottom\n");
}

#[test]
fn test_process_marks_wide_gaps() {
    let dir = TempDir::new().unwrap();
    let pages = serde_json::json!([{
        "width": 1.0,
        "height": 1.0,
        "words": [word("second", 0.2, 0.101), word("first", 0.1, 0.1)],
    }]);
    let input = write_layout(dir.path(), "doc.json", pages);

    ocrline(dir.path())
        .args(["process", "--strategy", "overlap"])
        .arg(&input)
        .assert()
        .success()
        .stdout("first_second\n");
}

#[test]
fn test_process_json_output_file() {
    let dir = TempDir::new().unwrap();
    let input = write_layout(dir.path(), "doc.json", two_line_page());
    let output = dir.path().join("out.json");

    ocrline(dir.path())
        .args(["process", "--format", "json", "--sequential"])
        .arg(&input)
        .arg("--output")
        .arg(&output)
        .assert()
        .success();

    let report: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
    assert_eq!(report["lines"], serde_json::json!(["top", "bottom"]));
    assert_eq!(report["pages"][0]["page_number"], 1);
    assert_eq!(report["errors"], serde_json::json!([]));
}

#[test]
fn test_process_skips_malformed_page() {
    let dir = TempDir::new().unwrap();
    let pages = serde_json::json!([
        { "width": 1.0, "height": 1.0, "words": [{ "content": "bad", "polygon": [0.1, 0.2, 0.3] }] },
        { "width": 1.0, "height": 1.0, "words": [word("kept", 0.1, 0.1)] },
    ]);
    let input = write_layout(dir.path(), "doc.json", pages);

    ocrline(dir.path())
        .arg("process")
        .arg(&input)
        .assert()
        .success()
        .stdout("kept\n")
        .stderr(predicate::str::contains("Skipped"));
}

#[test]
fn test_process_json_lists_skipped_words() {
    let dir = TempDir::new().unwrap();
    let pages = serde_json::json!([{
        "width": 1.0,
        "height": 1.0,
        "words": [word("kept", 0.1, 0.1), { "content": "bad", "polygon": [0.1, 0.2] }],
    }]);
    let input = write_layout(dir.path(), "doc.json", pages);

    let output = ocrline(dir.path())
        .args(["process", "--format", "json", "--skip-bad-words"])
        .arg(&input)
        .output()
        .unwrap();
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["lines"], serde_json::json!(["kept"]));
    assert_eq!(report["errors"], serde_json::json!([]));
    assert_eq!(report["word_issues"][0]["page_index"], 0);
    assert_eq!(report["word_issues"][0]["word_index"], 1);
    assert!(report["word_issues"][0]["message"].as_str().is_some());
}

#[test]
fn test_process_missing_input() {
    let dir = TempDir::new().unwrap();

    ocrline(dir.path())
        .arg("process")
        .arg(dir.path().join("nope.json"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Input file not found"));
}

#[test]
fn test_batch_writes_outputs_and_summary() {
    let dir = TempDir::new().unwrap();
    write_layout(dir.path(), "a.json", two_line_page());
    write_layout(dir.path(), "b.json", two_line_page());
    let out = dir.path().join("out");

    ocrline(dir.path())
        .arg("batch")
        .arg(format!("{}/*.json", dir.path().display()))
        .arg("--output-dir")
        .arg(&out)
        .arg("--summary")
        .assert()
        .success()
        .stdout(predicate::str::contains("Found 3 files"));

    assert_eq!(fs::read_to_string(out.join("a.lines.txt")).unwrap(), "top\nbottom\n");
    assert!(out.join("b.lines.txt").exists());

    // config.json is picked up by the glob and has no pages
    let summary = fs::read_to_string(out.join("summary.csv")).unwrap();
    assert!(summary.starts_with("filename,status,pages,pages_skipped,lines,words"));
    assert!(summary.contains("a.json,success,1,0,2,2,"));
}

#[test]
fn test_batch_stops_on_error() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("broken.json"), "not json").unwrap();

    ocrline(dir.path())
        .arg("batch")
        .arg(format!("{}/broken.json", dir.path().display()))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Processing failed"));
}

#[test]
fn test_tables_render_grid() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("tables.json");
    let document = serde_json::json!({
        "analyzeResult": {
            "pages": [],
            "tables": [{
                "rowCount": 2,
                "columnCount": 2,
                "cells": [
                    { "rowIndex": 0, "columnIndex": 0, "content": "No." },
                    { "rowIndex": 0, "columnIndex": 1, "content": "Item" },
                    { "rowIndex": 1, "columnIndex": 0, "content": "1" },
                ],
            }],
        }
    });
    fs::write(&input, document.to_string()).unwrap();

    ocrline(dir.path())
        .arg("tables")
        .arg(&input)
        .assert()
        .success()
        .stdout("===== Table 1 =====\nNo.\tItem\n1\t\n");
}

#[test]
fn test_eval_reports_wer() {
    let dir = TempDir::new().unwrap();
    let predicted = dir.path().join("predicted.txt");
    let reference = dir.path().join("reference.txt");
    fs::write(&predicted, "this_is_the_prediction\n").unwrap();
    fs::write(&reference, "this is the reference\n").unwrap();

    ocrline(dir.path())
        .arg("eval")
        .arg(&predicted)
        .arg(&reference)
        .assert()
        .success()
        .stdout(predicate::str::contains("WER: 0.2500"));
}

#[test]
fn test_eval_line_count_mismatch() {
    let dir = TempDir::new().unwrap();
    let predicted = dir.path().join("predicted.txt");
    let reference = dir.path().join("reference.txt");
    fs::write(&predicted, "one\n").unwrap();
    fs::write(&reference, "one\ntwo\n").unwrap();

    ocrline(dir.path())
        .arg("eval")
        .arg(&predicted)
        .arg(&reference)
        .assert()
        .failure();
}

#[test]
fn test_config_set_and_get() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("settings.json");
    let config_arg = config.display().to_string();

    Command::cargo_bin("ocrline")
        .unwrap()
        .args(["--config", &config_arg, "config", "set", "grouping.density_eps", "0.03"])
        .assert()
        .success();

    Command::cargo_bin("ocrline")
        .unwrap()
        .args(["--config", &config_arg, "config", "get", "grouping.density_eps"])
        .assert()
        .success()
        .stdout("0.03\n");
}

#[test]
fn test_config_set_rejects_invalid_value() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("settings.json");
    let config_arg = config.display().to_string();

    Command::cargo_bin("ocrline")
        .unwrap()
        .args(["--config", &config_arg, "config", "set", "grouping.density_eps", "-1"])
        .assert()
        .failure();
    assert!(!config.exists());

    Command::cargo_bin("ocrline")
        .unwrap()
        .args(["--config", &config_arg, "config", "get", "grouping.nope"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Configuration key not found"));
}
