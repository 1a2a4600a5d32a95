//! CLI end-to-end tests
//!
//! Every `convert` invocation passes `--no-install` so the tests never reach
//! for the system package manager.

use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::process::Command;
use tempfile::tempdir;

/// Get a command for the docforge binary
#[allow(deprecated)]
fn docforge_cmd() -> Command {
    let mut cmd = Command::cargo_bin("docforge").unwrap();
    // Keep the user's config files out of the tests.
    cmd.env("HOME", std::env::temp_dir());
    cmd
}

#[test]
fn test_cli_no_args_shows_help() {
    docforge_cmd()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn test_cli_help_flag() {
    docforge_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("docforge"))
        .stdout(predicate::str::contains("convert"));
}

#[test]
fn test_cli_version_command() {
    docforge_cmd()
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("docforge "));
}

#[test]
fn test_formats_lists_table() {
    docforge_cmd()
        .arg("formats")
        .assert()
        .success()
        .stdout(predicate::str::contains("docx"))
        .stdout(predicate::str::contains("writer_pdf_Export"));
}

#[test]
fn test_formats_by_category() {
    docforge_cmd()
        .args(["formats", "--category", "Calc"])
        .assert()
        .success()
        .stdout(predicate::str::contains("xlsx"))
        .stdout(predicate::str::contains("docx").not());
}

#[test]
fn test_formats_unknown_category_fails() {
    docforge_cmd()
        .args(["formats", "--category", "spreadsheet"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown document category"));
}

#[test]
fn test_formats_inputs_json() {
    let output = docforge_cmd()
        .args(["formats", "--inputs", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let inputs: Vec<String> = serde_json::from_slice(&output.stdout).unwrap();
    assert!(inputs.contains(&"docx".to_string()));
    assert!(!inputs.contains(&"pdf".to_string()));
}

#[test]
fn test_formats_inputs_and_outputs_conflict() {
    docforge_cmd()
        .args(["formats", "--inputs", "--outputs"])
        .assert()
        .failure();
}

#[test]
fn test_can_convert() {
    docforge_cmd()
        .args(["can-convert", ".DOCX", "pdf"])
        .assert()
        .success()
        .stdout(predicate::str::contains("writer_pdf_Export"));

    docforge_cmd()
        .args(["can-convert", "docx", "nonexistent"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Cannot convert"));
}

#[test]
fn test_check_tools_command() {
    docforge_cmd()
        .arg("check-tools")
        .assert()
        .success()
        .stdout(predicate::str::contains("soffice").or(predicate::str::contains("libreoffice")));
}

#[test]
fn test_convert_requires_target() {
    docforge_cmd()
        .args(["convert", "a.docx", "--no-install"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--to"));
}

#[test]
fn test_convert_missing_file_reports_failure() {
    docforge_cmd()
        .args(["convert", "/tmp/missing.txt", "--to", "pdf", "--no-install"])
        .assert()
        .failure()
        .stdout(predicate::str::contains(r#""status":"failure""#))
        .stdout(predicate::str::contains("File not found"))
        .stderr(predicate::str::contains("1 of 1 conversion(s) failed"));
}

#[test]
fn test_convert_async_missing_file_reports_failure() {
    docforge_cmd()
        .args([
            "convert",
            "/tmp/missing.txt",
            "--to",
            "pdf",
            "--async",
            "--no-install",
        ])
        .assert()
        .failure()
        .stdout(predicate::str::contains("File not found"));
}

#[test]
fn test_convert_length_mismatch() {
    docforge_cmd()
        .args([
            "convert",
            "a.docx",
            "b.docx",
            "c.docx",
            "--to-each",
            "pdf,png",
            "--no-install",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "Length of 'to' (2) must match number of file_paths (3)",
        ));
}

#[test]
fn test_convert_rejects_invalid_settings() {
    docforge_cmd()
        .args(["convert", "a.docx", "--to", "pdf", "--max-concurrency", "0", "--no-install"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("max_concurrency must be >= 1"));

    docforge_cmd()
        .args(["convert", "a.docx", "--to", "pdf", "--timeout", "-1", "--no-install"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("timeout must be > 0"));
}

#[test]
fn test_invalid_config_file() {
    let dir = tempdir().unwrap();
    let config = dir.path().join("docforge.toml");
    fs::write(&config, "[engine]\ntimeout_secs = 0\n").unwrap();

    docforge_cmd()
        .args(["--config", config.to_str().unwrap()])
        .args(["convert", "a.docx", "--to", "pdf", "--no-install"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid engine settings"));
}

#[cfg(unix)]
#[test]
fn test_convert_with_configured_tool() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempdir().unwrap();
    let tool = dir.path().join("soffice");
    fs::write(
        &tool,
        r#"#!/bin/sh
to=""; outdir=""; src=""
while [ $# -gt 0 ]; do
    case "$1" in
        --convert-to) to="$2"; shift 2 ;;
        --outdir) outdir="$2"; shift 2 ;;
        -*) shift ;;
        *) src="$1"; shift ;;
    esac
done
name=$(basename "$src")
printf 'converted' > "$outdir/${name%.*}.$to"
"#,
    )
    .unwrap();
    fs::set_permissions(&tool, fs::Permissions::from_mode(0o755)).unwrap();

    let source = dir.path().join("report.docx");
    fs::write(&source, b"source").unwrap();

    let config = dir.path().join("docforge.toml");
    fs::write(
        &config,
        format!(
            "[engine]\nauto_install = false\nsoffice_path = {:?}\nscratch_root = {:?}\n",
            tool.to_str().unwrap(),
            dir.path().to_str().unwrap()
        ),
    )
    .unwrap();

    for mode in [None, Some("--async")] {
        let mut cmd = docforge_cmd();
        cmd.args(["--config", config.to_str().unwrap()])
            .args(["convert", source.to_str().unwrap(), "--to", "pdf"]);
        if let Some(flag) = mode {
            cmd.arg(flag);
        }
        cmd.assert()
            .success()
            .stdout(predicate::str::contains(r#""status":"success""#))
            .stdout(predicate::str::contains("report.pdf"));
    }

    assert!(dir.path().join("report.pdf").exists());
}
