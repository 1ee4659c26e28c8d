use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn response(name: &str, mobile: &str, address: &str) -> String {
    serde_json::json!({
        "document": {
            "text": format!("{} {} {}", name, mobile, address),
            "entities": [
                { "type": "Name", "mentionText": name },
                { "type": "mobile", "mentionText": mobile },
                { "type": "address", "mentionText": address },
            ],
        }
    })
    .to_string()
}

/// A `contax` command isolated from the user's configuration.
fn contax(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("contax").unwrap();
    cmd.env("XDG_CONFIG_HOME", home.path().join("config"))
        .env("HOME", home.path());
    cmd
}

fn write(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

#[test]
fn test_help() {
    let home = TempDir::new().unwrap();
    contax(&home)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("batch"))
        .stdout(predicate::str::contains("duplicates"));
}

#[test]
fn test_process_json_response() {
    let home = TempDir::new().unwrap();
    let input = home.path().join("scan.json");
    write(&input, &response("Jane Smith", "0412 345 678", "NSW 2289 12 High St"));

    contax(&home)
        .arg("process")
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"mobile\": \"0412345678\""))
        .stdout(predicate::str::contains("12 High St NSW 2289"));
}

#[test]
fn test_process_csv_with_metadata() {
    let home = TempDir::new().unwrap();
    let input = home.path().join("scan.json");
    write(&input, &response("Jane Smith", "0412345678", "12 High St"));

    contax(&home)
        .args(["process", "--format", "csv", "--include-metadata"])
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::starts_with(
            "first_name,last_name,mobile,address,email,dateofbirth,landline,lastseen,file_name,extraction_date",
        ))
        .stdout(predicate::str::contains("Jane,Smith,0412345678,12 High St,,,,,scan.json"));
}

#[test]
fn test_process_snapshot_uses_processor_config() {
    let home = TempDir::new().unwrap();
    let input = home.path().join("scan.json");
    write(&input, &response("Jane Smith", "0212345678", "12 High St"));
    let config = home.path().join("contax.json");
    write(&config, r#"{"processor": {"processor_id": "proc-7", "project_id": "acme"}}"#);

    contax(&home)
        .arg("--config")
        .arg(&config)
        .args(["process", "--format", "snapshot"])
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"processor_id\": \"proc-7\""))
        .stdout(predicate::str::contains("\"success_rate\": \"0.0%\""))
        .stdout(predicate::str::contains("\"invalid_mobile\": 1"));
}

#[test]
fn test_process_missing_file() {
    let home = TempDir::new().unwrap();
    contax(&home)
        .args(["process", "does-not-exist.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Input file not found"));
}

#[test]
fn test_process_invalid_response() {
    let home = TempDir::new().unwrap();
    let input = home.path().join("broken.json");
    write(&input, "{ not json");

    contax(&home)
        .arg("process")
        .arg(&input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid_response"));
}

#[test]
fn test_batch_writes_outputs() {
    let home = TempDir::new().unwrap();
    let input_dir = home.path().join("in");
    write(&input_dir.join("a.json"), &response("Jane Smith", "0412345678", "12 High St"));
    write(&input_dir.join("b.json"), &response("Janet Smith", "0412345678", "14 High St"));
    write(&input_dir.join("c.json"), "{ not json");
    let output_dir = home.path().join("out");

    contax(&home)
        .arg("batch")
        .arg(input_dir.join("*.json").display().to_string())
        .arg("--output-dir")
        .arg(&output_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("Found 3 files"))
        .stdout(predicate::str::contains("Failed files:"));

    let summary = fs::read_to_string(output_dir.join("summary.csv")).unwrap();
    assert!(summary.starts_with("metric,value\n"));
    assert!(summary.contains("submitted,3\n"));
    assert!(summary.contains("succeeded,2\n"));
    assert!(summary.contains("failed,1\n"));

    let filtered = fs::read_to_string(output_dir.join("filtered_data.csv")).unwrap();
    assert_eq!(filtered.lines().count(), 3);

    let raw = fs::read_to_string(output_dir.join("raw_data.csv")).unwrap();
    assert!(raw.starts_with("first_name,last_name,mobile,address\n"));

    let duplicates = fs::read_to_string(output_dir.join("duplicates.csv")).unwrap();
    assert!(duplicates.lines().next().unwrap().ends_with("duplicate_key,duplicate_count"));
    assert_eq!(duplicates.lines().count(), 3);

    let errors = fs::read_to_string(output_dir.join("errors.csv")).unwrap();
    assert!(errors.contains("c.json,invalid_response"));

    let session: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(output_dir.join("session.json")).unwrap())
            .unwrap();
    assert_eq!(session["total_files"], 3);
    assert!(session["documents"]["a.json"]["pre_processing"].is_object());
}

#[test]
fn test_batch_sequential_per_file_output() {
    let home = TempDir::new().unwrap();
    let input_dir = home.path().join("in");
    write(&input_dir.join("a.json"), &response("Jane Smith", "0412345678", "12 High St"));
    write(&input_dir.join("b.json"), &response("John Citizen", "0498765432", "1 Low Rd"));
    let output_dir = home.path().join("out");

    contax(&home)
        .arg("batch")
        .arg(input_dir.join("*.json").display().to_string())
        .args(["--sequential", "--save-per-file", "--include-metadata", "--no-duplicates"])
        .arg("--output-dir")
        .arg(&output_dir)
        .assert()
        .success();

    let per_file = fs::read_to_string(output_dir.join("a.json.filtered.csv")).unwrap();
    assert!(per_file.contains("Jane,Smith,0412345678"));
    assert!(per_file.lines().next().unwrap().ends_with("file_name,extraction_date"));
    assert!(output_dir.join("b.json.filtered.csv").exists());
    assert!(!output_dir.join("duplicates.csv").exists());
    assert!(!output_dir.join("errors.csv").exists());
}

#[test]
fn test_batch_reports_duplicates_without_retained_records() {
    let home = TempDir::new().unwrap();
    let input_dir = home.path().join("in");
    write(&input_dir.join("a.json"), &response("Jane Smith", "0412345678", "12 High St"));
    write(&input_dir.join("b.json"), &response("Janet Smith", "0412345678", "14 High St"));
    let config = home.path().join("contax.json");
    write(&config, r#"{"batch": {"retain_records": false}}"#);
    let output_dir = home.path().join("out");

    contax(&home)
        .arg("--config")
        .arg(&config)
        .arg("batch")
        .arg(input_dir.join("*.json").display().to_string())
        .arg("--output-dir")
        .arg(&output_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("Records were not retained"));

    let duplicates = fs::read_to_string(output_dir.join("duplicates.csv")).unwrap();
    assert_eq!(duplicates.lines().count(), 3);
    assert!(duplicates.contains("Jane,Smith,0412345678"));

    let summary = fs::read_to_string(output_dir.join("summary.csv")).unwrap();
    assert!(summary.contains("clean_records,2\n"));
    assert!(!output_dir.join("filtered_data.csv").exists());
    assert!(!output_dir.join("session.json").exists());
}

#[test]
fn test_batch_no_matching_files() {
    let home = TempDir::new().unwrap();
    contax(&home)
        .arg("batch")
        .arg(home.path().join("*.pdf").display().to_string())
        .assert()
        .failure()
        .stderr(predicate::str::contains("No matching files found"));
}

#[test]
fn test_duplicates_command() {
    let home = TempDir::new().unwrap();
    let input = home.path().join("filtered.csv");
    write(
        &input,
        "first_name,last_name,mobile,address\n\
         Jane,Smith,0412345678,12 High St\n\
         Bob,Jones,0498765432,3 Low Rd\n\
         Janet,Smith,0412345678,14 High St\n",
    );

    contax(&home)
        .arg("duplicates")
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains("Jane,Smith,0412345678,12 High St,,,,,0412345678,2"))
        .stdout(predicate::str::contains("Janet,Smith,0412345678,14 High St,,,,,0412345678,2"))
        .stdout(predicate::str::contains("Bob").not());

    contax(&home)
        .args(["duplicates", "--key", "last_name"])
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains(",Smith,2"));
}

#[test]
fn test_config_init_get_set() {
    let home = TempDir::new().unwrap();

    contax(&home)
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("not created"));

    contax(&home).args(["config", "init"]).assert().success();
    assert!(home.path().join("config/contax/config.json").exists());

    contax(&home)
        .args(["config", "init"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));

    contax(&home)
        .args(["config", "set", "batch.max_workers", "8"])
        .assert()
        .success();

    contax(&home)
        .args(["config", "get", "batch.max_workers"])
        .assert()
        .success()
        .stdout(predicate::str::diff("8\n"));

    contax(&home)
        .args(["config", "set", "batch.max_workers", "0"])
        .assert()
        .failure();

    contax(&home)
        .args(["config", "get", "batch.unknown"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Configuration key not found"));
}
