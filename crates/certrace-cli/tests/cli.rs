use assert_cmd::Command;
use predicates::prelude::*;

use certrace_testing::{device, fake_operation_records, wait_pi_records, write_report_file};

fn certrace() -> Command {
    Command::cargo_bin("certrace").unwrap()
}

#[test]
fn test_render_two_device_run() {
    let dir = tempfile::tempdir().unwrap();
    let report_a = write_report_file(
        dir.path(),
        "device_a_report.json",
        &device(0),
        &wait_pi_records(),
    );
    let report_b = write_report_file(
        dir.path(),
        "device_b_report.json",
        &device(1),
        &wait_pi_records(),
    );
    let out = dir.path().join("out");

    certrace()
        .arg("render")
        .arg(&report_a)
        .arg(&report_b)
        .arg("--out")
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("Rendered"))
        .stdout(predicate::str::contains("2 per-device section(s)"));

    let summary = std::fs::read_to_string(out.join("summary.md")).unwrap();
    assert!(summary.contains("# WaitForPI"));
    assert!(summary.contains("Pixel 4 (Google, 11)"));
    assert!(summary.contains("Cross-device summary"));
    assert!(summary.contains("16M iterations across 2 device(s)"));

    let images: Vec<_> = std::fs::read_dir(out.join("images"))
        .unwrap()
        .filter_map(|e| e.ok())
        .collect();
    assert!(images.len() >= 2);
}

#[test]
fn test_render_scans_directories_for_reports() {
    let dir = tempfile::tempdir().unwrap();
    write_report_file(dir.path(), "report.json", &device(0), &wait_pi_records());
    write_report_file(dir.path(), "notes.txt", &device(0), &[]);
    let out = dir.path().join("out");

    certrace()
        .arg("render")
        .arg(dir.path())
        .arg("--out")
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("1 report file(s)"));
}

#[test]
fn test_render_with_no_matching_handler_still_produces_document() {
    let dir = tempfile::tempdir().unwrap();
    let report = write_report_file(
        dir.path(),
        "fake_report.json",
        &device(0),
        &fake_operation_records(),
    );
    let out = dir.path().join("out");

    certrace()
        .arg("render")
        .arg(&report)
        .arg("--out")
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("0 per-device section(s)"));

    let summary = std::fs::read_to_string(out.join("summary.md")).unwrap();
    assert!(!summary.contains("# FakeOperation"));
}

#[test]
fn test_suites_lists_contents() {
    let dir = tempfile::tempdir().unwrap();
    let report = write_report_file(
        dir.path(),
        "report.json",
        &device(0),
        &wait_pi_records(),
    );

    certrace()
        .arg("suites")
        .arg(&report)
        .assert()
        .success()
        .stdout(predicate::str::contains("WaitForPI"))
        .stdout(predicate::str::contains("Pixel 4"))
        .stdout(predicate::str::contains("MonitorOperation"));
}

#[test]
fn test_missing_report_file_fails() {
    certrace()
        .arg("render")
        .arg("does_not_exist.json")
        .assert()
        .failure()
        .stderr(predicate::str::contains("report file not found"));
}
