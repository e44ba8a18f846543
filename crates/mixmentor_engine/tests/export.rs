use std::fs;

use mixmentor_engine::{ensure_output_dir, export_report, report_filename, AtomicFileWriter};
use serde_json::json;
use tempfile::TempDir;

#[test]
fn creates_missing_output_dir() {
    let temp = TempDir::new().unwrap();
    let new_dir = temp.path().join("reports");
    assert!(!new_dir.exists());
    ensure_output_dir(&new_dir).unwrap();
    assert!(new_dir.is_dir());
}

#[test]
fn atomic_write_replaces_existing() {
    let temp = TempDir::new().unwrap();
    let writer = AtomicFileWriter::new(temp.path().to_path_buf());

    let first = writer.write("job.json", "{}").unwrap();
    assert_eq!(fs::read_to_string(&first).unwrap(), "{}");

    let second = writer.write("job.json", "[]").unwrap();
    assert_eq!(first, second);
    assert_eq!(fs::read_to_string(&second).unwrap(), "[]");
}

#[test]
fn report_is_saved_as_pretty_json() {
    let temp = TempDir::new().unwrap();
    let report = json!({ "summary": "ok", "scores": { "noise": 90 } });

    let path = export_report(temp.path(), "4f1c-77", &report).unwrap();
    assert_eq!(path.file_name().unwrap(), "4f1c-77.json");
    let text = fs::read_to_string(&path).unwrap();
    assert!(text.contains('\n'));
    let parsed: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(parsed, report);
}

#[test]
fn report_filename_is_sanitized() {
    assert_eq!(report_filename("../etc/passwd"), "___etc_passwd.json");
    assert_eq!(report_filename("  "), "report.json");
}

#[test]
fn export_into_file_path_fails() {
    let temp = TempDir::new().unwrap();
    let file_path = temp.path().join("not_a_dir");
    fs::write(&file_path, "x").unwrap();

    let result = export_report(&file_path, "job", &json!({}));
    assert!(result.is_err());
}
