//! CLI integration tests
//!
//! Run the `lazycols` binary against a seeded SQLite file.

use rusqlite::Connection;
use std::fs;
use std::path::PathBuf;
use std::process::{Command, Output};
use tempfile::TempDir;

fn setup_test_db(temp_dir: &TempDir) -> PathBuf {
    let db_path = temp_dir.path().join("app.db");
    let conn = Connection::open(&db_path).unwrap();
    conn.execute_batch(
        r#"
        CREATE TABLE documents (
            id INTEGER PRIMARY KEY,
            title TEXT NOT NULL,
            body TEXT,
            thumbnail BLOB
        );

        INSERT INTO documents (id, title, body, thumbnail)
        VALUES (1, 'Quarterly report', 'A very long body', x'89504E47');
        "#,
    )
    .unwrap();
    db_path
}

fn run(temp_dir: &TempDir, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_lazycols"))
        .current_dir(temp_dir.path())
        .args(args)
        .output()
        .expect("Failed to execute CLI")
}

#[test]
fn test_cli_scope_prints_narrowed_projection() {
    // Given: documents with body and thumbnail declared lazy
    let temp_dir = TempDir::new().unwrap();
    let db_path = setup_test_db(&temp_dir);

    // When: `lazycols scope`
    let output = run(
        &temp_dir,
        &[
            "scope",
            "--db",
            db_path.to_str().unwrap(),
            "--table",
            "documents",
            "--lazy",
            "body,thumbnail",
        ],
    );

    // Then: only the eager columns are listed, qualified by table
    assert!(
        output.status.success(),
        "Stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.lines().collect::<Vec<_>>(), ["documents.id", "documents.title"]);
}

#[test]
fn test_cli_scope_without_lazy_columns_selects_all() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = setup_test_db(&temp_dir);

    let output = run(
        &temp_dir,
        &["scope", "--db", db_path.to_str().unwrap(), "--table", "documents"],
    );

    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "documents.*");
}

#[test]
fn test_cli_show_reads_lazy_column_with_one_fetch() {
    // Given: body and thumbnail lazy
    let temp_dir = TempDir::new().unwrap();
    let db_path = setup_test_db(&temp_dir);

    // When: show record 1 and read body
    let output = run(
        &temp_dir,
        &[
            "show",
            "--db",
            db_path.to_str().unwrap(),
            "--table",
            "documents",
            "--model",
            "Document",
            "--lazy",
            "body,thumbnail",
            "--id",
            "1",
            "--read",
            "body",
            "--json",
        ],
    );

    // Then: one secondary fetch loads body and thumbnail together
    assert!(
        output.status.success(),
        "Stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["model"], "Document");
    assert_eq!(json["attributes"]["title"], "Quarterly report");
    assert_eq!(json["attributes"]["body"], "A very long body");
    assert_eq!(json["attributes"]["thumbnail"]["blob_len"], 4);
    assert_eq!(json["not_loaded"], serde_json::json!([]));
    assert_eq!(json["secondary_fetches"], 1);
}

#[test]
fn test_cli_show_reads_eager_column_without_fetch() {
    // Given: body and thumbnail lazy
    let temp_dir = TempDir::new().unwrap();
    let db_path = setup_test_db(&temp_dir);

    // When: only an eager column is read
    let output = run(
        &temp_dir,
        &[
            "show",
            "--db",
            db_path.to_str().unwrap(),
            "--table",
            "documents",
            "--lazy",
            "body,thumbnail",
            "--id",
            "1",
            "--read",
            "title",
            "--json",
        ],
    );

    // Then: both lazy columns stay unloaded and nothing extra is queried
    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["not_loaded"], serde_json::json!(["body", "thumbnail"]));
    assert_eq!(json["secondary_fetches"], 0);
}

#[test]
fn test_cli_logs_json_to_stderr_by_default() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = setup_test_db(&temp_dir);

    let output = run(
        &temp_dir,
        &[
            "scope",
            "--db",
            db_path.to_str().unwrap(),
            "--table",
            "documents",
            "--lazy",
            "body",
        ],
    );

    assert!(output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    let declared = stderr
        .lines()
        .filter_map(|line| serde_json::from_str::<serde_json::Value>(line).ok())
        .any(|line| line["fields"]["op"] == "lazy_load" && line["fields"]["event"] == "end");
    assert!(declared, "Stderr: {}", stderr);
}

#[test]
fn test_cli_show_text_marks_unloaded_columns() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = setup_test_db(&temp_dir);

    let output = run(
        &temp_dir,
        &[
            "show",
            "--db",
            db_path.to_str().unwrap(),
            "--table",
            "documents",
            "--lazy",
            "body",
            "--id",
            "1",
        ],
    );

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("title = Quarterly report"));
    assert!(stdout.contains("body = <not loaded>"));
    assert!(stdout.contains("secondary fetches: 0"));
}

#[test]
fn test_cli_show_from_config_file() {
    // Given: a config declaring thumbnail lazy
    let temp_dir = TempDir::new().unwrap();
    let db_path = setup_test_db(&temp_dir);
    let config_path = temp_dir.path().join("lazycols.toml");
    fs::write(
        &config_path,
        r#"
[[models]]
name = "Document"
table = "documents"
lazy = ["thumbnail"]
"#,
    )
    .unwrap();

    // When: load every lazy column
    let output = run(
        &temp_dir,
        &[
            "show",
            "--db",
            db_path.to_str().unwrap(),
            "--table",
            "documents",
            "--config",
            config_path.to_str().unwrap(),
            "--id",
            "1",
            "--all-lazy",
            "--json",
        ],
    );

    // Then: the blob is summarized and nothing is left unloaded
    assert!(
        output.status.success(),
        "Stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["attributes"]["thumbnail"]["blob_len"], 4);
    assert_eq!(json["not_loaded"], serde_json::json!([]));
    assert_eq!(json["secondary_fetches"], 1);
}

#[test]
fn test_cli_show_missing_record_fails() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = setup_test_db(&temp_dir);

    let output = run(
        &temp_dir,
        &[
            "show",
            "--db",
            db_path.to_str().unwrap(),
            "--table",
            "documents",
            "--id",
            "99",
        ],
    );

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Error:"));
}

#[test]
fn test_cli_rejects_primary_key_declared_lazy() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = setup_test_db(&temp_dir);

    let output = run(
        &temp_dir,
        &[
            "scope",
            "--db",
            db_path.to_str().unwrap(),
            "--table",
            "documents",
            "--lazy",
            "id",
        ],
    );

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("ERR_PRIMARY_KEY_DECLARED_LAZY"), "Stderr: {}", stderr);
    assert!(stderr.contains("Error:"));
}
