use assert_cmd::prelude::*;
use std::io::Write;
use std::process::{Command, Stdio};

fn docsum() -> Command {
    let mut cmd = Command::cargo_bin("docsum").unwrap();
    cmd.env("SUMMARY_BACKEND", "extractive").env("RUST_LOG", "warn");
    cmd
}

fn article() -> String {
    [
        "Rust is a systems programming language focused on safety and speed.",
        "The borrow checker rejects programs with data races at compile time.",
        "Cargo builds code, fetches dependencies and runs tests.",
        "Many teams adopt Rust for command line tools and network services.",
        "Memory safety without a garbage collector is the headline feature.",
        "The compiler error messages are known for being helpful.",
        "Traits describe shared behaviour across different types.",
        "Pattern matching makes handling enums concise and exhaustive.",
        "Rust programs often compile to a single static binary.",
        "The community maintains thousands of crates on the public registry.",
    ]
    .join(" ")
}

#[test]
fn summarizes_a_text_file_extractively() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("article.txt");
    std::fs::write(&path, article()).unwrap();
    let out_file = dir.path().join("summary.txt");

    let output = docsum()
        .arg("file")
        .arg(&path)
        .arg("--output")
        .arg(&out_file)
        .output()
        .unwrap();
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let stdout = String::from_utf8(output.stdout).unwrap();
    let summary = stdout.trim();
    assert!(!summary.is_empty());
    assert!(summary.len() < article().len());
    for sentence in summary.split_inclusive(". ") {
        assert!(article().contains(sentence.trim()));
    }
    assert_eq!(std::fs::read_to_string(&out_file).unwrap(), summary);
}

#[test]
fn short_text_reports_sentinel() {
    let output = docsum()
        .args(["text", "Just a few words here."])
        .output()
        .unwrap();
    assert!(output.status.success());
    assert_eq!(
        String::from_utf8(output.stdout).unwrap().trim(),
        "Text too short to summarize meaningfully."
    );
}

#[test]
fn reads_text_from_stdin() {
    let mut child = docsum()
        .args(["text", "-", "--stats"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap();
    child
        .stdin
        .take()
        .unwrap()
        .write_all(article().as_bytes())
        .unwrap();
    let output = child.wait_with_output().unwrap();
    assert!(output.status.success());
    assert!(!String::from_utf8(output.stdout).unwrap().trim().is_empty());
    assert!(String::from_utf8(output.stderr).unwrap().contains("reduction"));
}

#[test]
fn unsupported_format_fails() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sheet.xlsx");
    std::fs::write(&path, "cells").unwrap();
    let output = docsum().arg("file").arg(&path).output().unwrap();
    assert!(!output.status.success());
    assert!(String::from_utf8(output.stderr)
        .unwrap()
        .contains("unsupported file format"));
}

#[test]
fn batch_writes_report() {
    let input = tempfile::tempdir().unwrap();
    let output_dir = tempfile::tempdir().unwrap();
    std::fs::write(input.path().join("one.txt"), article()).unwrap();
    std::fs::write(input.path().join("two.md"), article()).unwrap();
    std::fs::write(input.path().join("skip.csv"), "a,b").unwrap();

    let output = docsum()
        .arg("batch")
        .arg(input.path())
        .arg(output_dir.path())
        .output()
        .unwrap();
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_str(
        &std::fs::read_to_string(output_dir.path().join("processing_report.json")).unwrap(),
    )
    .unwrap();
    assert_eq!(report["total_files"], 2);
    assert_eq!(report["successful"], 2);
    assert!(output_dir.path().join("one_summary.txt").exists());
    assert!(output_dir.path().join("two_summary.txt").exists());
}
