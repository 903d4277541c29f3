use std::fs;
use std::path::PathBuf;
use std::process::{Command, Output};

fn report_fixture() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("parse")
        .join("tests")
        .join("fixtures")
        .join("breseq-0.27.html")
}

fn gene(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_gene"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to run gene")
}

fn parse_fixture(extra: &[&str]) -> Output {
    let path = report_fixture();
    let mut args = vec!["parse", "-f", path.to_str().unwrap()];
    args.extend_from_slice(extra);
    gene(&args)
}

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

#[test]
fn parse_prints_csv_by_default() {
    let out = parse_fixture(&[]);
    assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));

    let stdout = String::from_utf8(out.stdout).unwrap();
    let lines: Vec<_> = stdout.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].starts_with("collection,index,seq_id,position"));
    assert!(lines[1].starts_with("0,0,AB0123456test_data_0,\"12,345test_data_0\",+Gtest_data_0,"));
    assert!(lines[2].starts_with("0,1,AB0123456test_data_1,"));
    assert!(lines[1].contains("ABC0123\u{a0}\u{2190}\u{a0}/\u{a0}\u{2190}\u{a0}ABC5678test_data_0"));
}

#[test]
fn parse_prints_tsv() {
    let out = parse_fixture(&["--ot", "tsv"]);
    assert!(out.status.success());

    let stdout = String::from_utf8(out.stdout).unwrap();
    let second = stdout.lines().nth(1).unwrap();
    let fields: Vec<_> = second.split('\t').collect();
    assert_eq!(fields.len(), 11);
    assert_eq!(fields[3], "12,345test_data_0");
    assert_eq!(fields[5], "12%test_data_0");
}

#[test]
fn parse_prints_json_collections() {
    let out = parse_fixture(&["--ot", "json"]);
    assert!(out.status.success());

    let value: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    let collections = value.as_array().unwrap();
    assert_eq!(collections.len(), 1);
    let records = collections[0].as_array().unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0]["sequence_id"], "AB0123456test_data_0");
    assert_eq!(records[0]["application"], "breseq");
    assert_eq!(records[0]["app_version"], "0.27");
}

#[test]
fn parse_stamps_generation_and_ids() {
    let out = parse_fixture(&["--ot", "json", "--generation", "run-42", "--assign-ids"]);
    assert!(out.status.success());

    let value: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    let records = value[0].as_array().unwrap();
    assert_eq!(records[0]["generation"], "run-42");
    let first = records[0]["unique_id"].as_str().unwrap();
    let second = records[1]["unique_id"].as_str().unwrap();
    assert_eq!(first.len(), 64);
    assert_ne!(first, second);
}

#[test]
fn parse_accepts_explicit_source_flags() {
    let out = parse_fixture(&["-t", "HTML", "-a", "breseq", "-v", "0.27.1"]);
    assert!(out.status.success());
    assert_eq!(String::from_utf8(out.stdout).unwrap().lines().count(), 3);
}

// ---------------------------------------------------------------------------
// Failures
// ---------------------------------------------------------------------------

#[test]
fn parse_rejects_unsupported_version() {
    let out = parse_fixture(&["-v", "0.28.*"]);
    assert!(!out.status.success());
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("error: unsupported report"), "stderr: {stderr}");
    assert!(out.stdout.is_empty());
}

#[test]
fn parse_rejects_unsupported_application() {
    let out = parse_fixture(&["-a", "gatk"]);
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("application 'gatk'"));
}

#[test]
fn parse_reports_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("absent.html");
    let out = gene(&["parse", "-f", missing.to_str().unwrap()]);
    assert!(!out.status.success());
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("Could not parse"), "stderr: {stderr}");
}

#[test]
fn parse_reports_malformed_document() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.html");
    fs::write(&path, "<table><tr><td>x</td><td>y</tr></table>").unwrap();

    let out = gene(&["parse", "-f", path.to_str().unwrap()]);
    assert!(!out.status.success());
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("mismatched tag"), "stderr: {stderr}");
}

#[test]
fn parse_document_without_report_prints_header_only() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("plain.html");
    fs::write(&path, "<p>nothing to see</p><table><tr><td>x</td></tr></table>").unwrap();

    let out = gene(&["parse", "-f", path.to_str().unwrap()]);
    assert!(out.status.success());
    assert_eq!(String::from_utf8(out.stdout).unwrap().lines().count(), 1);
}

#[test]
fn parse_requires_filepath() {
    let out = gene(&["parse"]);
    assert!(!out.status.success());
}

// ---------------------------------------------------------------------------
// Format registry and logging
// ---------------------------------------------------------------------------

#[test]
fn parse_uses_custom_format_registry() {
    let dir = tempfile::tempdir().unwrap();
    let formats = dir.path().join("formats.yml");
    fs::write(
        &formats,
        "formats:\n  - application: breseq\n    version: \"0.28\"\n    headers: [evidence, \"seq\\u00a0id\", position, mutation, freq, annotation, gene, description]\n",
    )
    .unwrap();

    let out = parse_fixture(&["--formats", formats.to_str().unwrap(), "-v", "0.28"]);
    assert!(out.status.success());
    // The fixture announces 0.27, so a 0.28-only registry finds nothing.
    assert_eq!(String::from_utf8(out.stdout).unwrap().lines().count(), 1);

    let out = parse_fixture(&["--formats", formats.to_str().unwrap()]);
    assert!(!out.status.success());
}

#[test]
fn parse_rejects_invalid_format_registry() {
    let dir = tempfile::tempdir().unwrap();
    let formats = dir.path().join("formats.yml");
    fs::write(&formats, "formats:\n  - application: \"\"\n    version: \"0.27\"\n    headers: [a]\n").unwrap();

    let out = parse_fixture(&["--formats", formats.to_str().unwrap()]);
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("Failed to load report formats"));
}

#[test]
fn status_flag_logs_progress_to_stderr() {
    let quiet = parse_fixture(&[]);
    assert!(quiet.stderr.is_empty());

    let out = parse_fixture(&["--status"]);
    assert!(out.status.success());
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("parse complete"), "stderr: {stderr}");
}
