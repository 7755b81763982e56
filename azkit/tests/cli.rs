use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::{json, Value};
use std::fs::write;
use std::path::Path;
use tempfile::{tempdir, NamedTempFile};

fn azkit() -> Command {
    Command::cargo_bin("azkit").expect("Binary exists")
}

/// Creates a filter config that hides social security numbers.
fn create_filter_config() -> NamedTempFile {
    let config = NamedTempFile::new().expect("Creating temp config file failed");
    write(
        config.path(),
        b"filter:\n  include_attrs: []\n  exclude_attrs: [ssn]\n",
    )
    .expect("Writing temp config failed");
    config
}

#[test]
fn filter_cli_projects_array_input() {
    let config = create_filter_config();
    let input = NamedTempFile::new().unwrap();
    write(
        input.path(),
        json!([
            {"id": 1, "name": "Ann", "ssn": "111-22-3333"},
            {"id": 2, "name": "Bob"}
        ])
        .to_string(),
    )
    .unwrap();

    let output = azkit()
        .arg("filter")
        .arg("--config")
        .arg(config.path())
        .arg("--input")
        .arg(input.path())
        .output()
        .unwrap();
    assert!(output.status.success());

    let value: Value = serde_json::from_slice(&output.stdout).expect("stdout is JSON");
    assert_eq!(
        value,
        json!([{"id": 1, "name": "Ann"}, {"id": 2, "name": "Bob"}])
    );
}

#[test]
fn filter_cli_rejects_non_document_elements() {
    let config = create_filter_config();
    let input = NamedTempFile::new().unwrap();
    write(input.path(), "[{\"id\": 1}, 42]").unwrap();

    azkit()
        .arg("filter")
        .arg("--config")
        .arg(config.path())
        .arg("--input")
        .arg(input.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("element 1"));
}

#[test]
fn gen_cli_prints_requested_number_of_documents() {
    let output = azkit().args(["gen", "--count", "3"]).output().unwrap();
    assert!(output.status.success());
    let docs: Vec<Value> = serde_json::from_slice(&output.stdout).expect("stdout is JSON");
    assert_eq!(docs.len(), 3);
    assert!(docs.iter().all(|d| d["doctype"] == "sample"));
}

#[test]
fn tz_cli_lists_common_zones() {
    azkit()
        .arg("tz")
        .assert()
        .success()
        .stdout(predicate::str::contains("Europe/Paris"))
        .stdout(predicate::str::contains("EST5EDT").not());
}

#[test]
fn manifest_cli_summarises_pyproject() {
    let manifest = NamedTempFile::new().unwrap();
    write(
        manifest.path(),
        "[project]\nname = \"demo\"\nversion = \"0.2.0\"\ndependencies = [\"pytz>=2024\", \"faker\"]\n",
    )
    .unwrap();

    azkit()
        .arg("manifest")
        .arg("--file")
        .arg(manifest.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("name: demo"))
        .stdout(predicate::str::contains("version: 0.2.0"))
        .stdout(predicate::str::contains("  faker\n  pytz"));
}

#[test]
fn env_cli_lists_standard_variables() {
    azkit()
        .arg("env")
        .env("MONGO_CONN_STR", "emulator")
        .assert()
        .success()
        .stdout(predicate::str::contains("MONGO_CONN_STR (set)"));
}

fn blob_cmd(root: &Path, args: &[&str]) -> Command {
    let mut cmd = azkit();
    cmd.arg("blob").arg("--root").arg(root).args(args);
    cmd
}

#[test]
fn blob_cli_round_trip() {
    let tmp = tempdir().unwrap();
    let root = tmp.path().join("blobs");

    blob_cmd(&root, &["create-container", "docs"]).assert().success();
    blob_cmd(&root, &["create-container", "docs"]).assert().failure();
    blob_cmd(&root, &["put-string", "docs", "hello.txt", "hello world"]).assert().success();
    blob_cmd(&root, &["put-string", "docs", "hello.txt", "changed", "--no-replace"])
        .assert()
        .failure();
    blob_cmd(&root, &["cat", "docs", "hello.txt"])
        .assert()
        .success()
        .stdout("hello world");

    let local = tmp.path().join("notes.md");
    write(&local, "# notes").unwrap();
    blob_cmd(&root, &["upload", "docs", "--as", "notes/today.md", "--meta", "origin=cli"])
        .arg(&local)
        .assert()
        .success();

    let output = blob_cmd(&root, &["list", "docs"]).output().unwrap();
    assert!(output.status.success());
    let names: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(names, json!(["hello.txt", "notes/today.md"]));

    let downloaded = tmp.path().join("copy.md");
    blob_cmd(&root, &["download", "docs", "notes/today.md"])
        .arg(&downloaded)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"origin\": \"cli\""));
    assert_eq!(std::fs::read_to_string(&downloaded).unwrap(), "# notes");

    blob_cmd(&root, &["delete", "docs", "hello.txt"]).assert().success();
    blob_cmd(&root, &["list-containers"])
        .assert()
        .success()
        .stdout("docs\n");
    blob_cmd(&root, &["delete-container", "docs"]).assert().success();
}

#[test]
fn blob_cli_uploads_several_files_under_their_path_names() {
    let tmp = tempdir().unwrap();
    let root = tmp.path().join("blobs");
    let first = tmp.path().join("a.txt");
    let second = tmp.path().join("b.txt");
    write(&first, "alpha").unwrap();
    write(&second, "beta").unwrap();

    blob_cmd(&root, &["create-container", "docs"]).assert().success();
    blob_cmd(&root, &["upload", "docs"])
        .arg(&first)
        .arg(&second)
        .assert()
        .success();

    let output = blob_cmd(&root, &["list", "docs"]).output().unwrap();
    assert!(output.status.success());
    let names: Vec<String> = serde_json::from_slice(&output.stdout).unwrap();
    let expected: Vec<String> = [&first, &second]
        .iter()
        .map(|p| p.to_string_lossy().trim_start_matches('/').to_string())
        .collect();
    assert_eq!(names, expected);

    blob_cmd(&root, &["cat", "docs", &expected[1]])
        .assert()
        .success()
        .stdout("beta");
}

#[tokio::test]
async fn run_entrypoint_is_callable_in_process() {
    let cli = azkit::Cli {
        command: azkit::Commands::Tz { all: true },
    };
    azkit::run(cli).await.expect("tz command should succeed");
}
