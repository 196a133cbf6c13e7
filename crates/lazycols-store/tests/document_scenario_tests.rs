// End-to-end lazy loading against SQLite:
// Document [id, title, body, thumbnail] with body and thumbnail declared lazy

mod common;

use common::{document_schema, installed_registry, setup_documents_db};
use lazycols_core::errors::LazyColumnsError;
use lazycols_core::{LazyLoadable, Value};
use lazycols_store::{ModelRepo, SqliteBackend};

#[test]
fn test_default_load_excludes_lazy_columns() {
    let conn = setup_documents_db();
    let registry = installed_registry();
    registry
        .lazy_load(&SqliteBackend::new(&conn), &document_schema(), ["body", "thumbnail"])
        .unwrap();
    let repo = ModelRepo::new(&conn, &registry);

    let record = repo.find(&document_schema(), 1i64).unwrap();

    assert_eq!(record.attributes().get("id"), Some(&Value::from(1i64)));
    assert_eq!(
        record.attributes().get("title"),
        Some(&Value::from("Quarterly report"))
    );
    assert!(!record.attributes().contains("body"));
    assert!(!record.attributes().contains("thumbnail"));
}

#[test]
fn test_first_lazy_read_fetches_all_missing_once() {
    let conn = setup_documents_db();
    let registry = installed_registry();
    registry
        .lazy_load(&SqliteBackend::new(&conn), &document_schema(), ["body", "thumbnail"])
        .unwrap();
    let repo = ModelRepo::new(&conn, &registry);

    let mut record = repo.find(&document_schema(), 1i64).unwrap();
    assert_eq!(repo.backend().stats().point_queries, 1);

    // When: body is read
    let body = repo.read(&mut record, "body").unwrap().clone();

    // Then: one secondary fetch loaded body and thumbnail together
    assert_eq!(body, Value::from("A very long body"));
    assert_eq!(repo.backend().stats().point_queries, 2);
    assert!(record.attributes().contains("thumbnail"));

    // And: thumbnail needs no further fetch
    let thumbnail = repo.read(&mut record, "thumbnail").unwrap().clone();
    assert_eq!(thumbnail, Value::Blob(vec![0x89, 0x50, 0x4E, 0x47]));
    assert_eq!(repo.backend().stats().point_queries, 2);

    // And: repeated reads stay free
    repo.read(&mut record, "body").unwrap();
    assert_eq!(repo.backend().stats().point_queries, 2);
}

#[test]
fn test_null_lazy_value_is_loaded_not_refetched() {
    let conn = setup_documents_db();
    let registry = installed_registry();
    registry
        .lazy_load(&SqliteBackend::new(&conn), &document_schema(), ["body", "thumbnail"])
        .unwrap();
    let repo = ModelRepo::new(&conn, &registry);

    let mut record = repo.find(&document_schema(), 2i64).unwrap();
    assert_eq!(repo.read(&mut record, "body").unwrap(), &Value::Null);
    assert_eq!(repo.read(&mut record, "body").unwrap(), &Value::Null);
    assert_eq!(repo.read(&mut record, "thumbnail").unwrap(), &Value::Null);

    assert_eq!(repo.backend().stats().point_queries, 2);
}

#[test]
fn test_populated_lazy_column_performs_no_fetch() {
    let conn = setup_documents_db();
    let registry = installed_registry();
    registry
        .lazy_load(&SqliteBackend::new(&conn), &document_schema(), ["body", "thumbnail"])
        .unwrap();
    let repo = ModelRepo::new(&conn, &registry);

    // Loaded without the default scope: every column present
    let mut record = repo.unscoped().find(&document_schema(), 1i64).unwrap();
    let before = repo.backend().stats().point_queries;

    repo.read(&mut record, "body").unwrap();
    repo.read(&mut record, "thumbnail").unwrap();

    assert_eq!(repo.backend().stats().point_queries, before);
}

#[test]
fn test_local_value_survives_secondary_fetch() {
    let conn = setup_documents_db();
    let registry = installed_registry();
    registry
        .lazy_load(&SqliteBackend::new(&conn), &document_schema(), ["body", "thumbnail"])
        .unwrap();
    let repo = ModelRepo::new(&conn, &registry);

    let mut record = repo.find(&document_schema(), 1i64).unwrap();
    record.attributes_mut().insert("title", "Edited locally");
    record.attributes_mut().insert("body", "Edited body");

    repo.read(&mut record, "thumbnail").unwrap();

    assert_eq!(
        record.attributes().get("title"),
        Some(&Value::from("Edited locally"))
    );
    assert_eq!(
        record.attributes().get("body"),
        Some(&Value::from("Edited body"))
    );
}

#[test]
fn test_deleted_record_fails_with_not_found() {
    let conn = setup_documents_db();
    let registry = installed_registry();
    registry
        .lazy_load(&SqliteBackend::new(&conn), &document_schema(), ["body", "thumbnail"])
        .unwrap();
    let repo = ModelRepo::new(&conn, &registry);

    let mut record = repo.find(&document_schema(), 1i64).unwrap();

    // Given: the row is deleted after the initial load
    conn.execute("DELETE FROM documents WHERE id = 1", []).unwrap();

    // Then: the lazy read surfaces not-found unchanged
    let err = repo.read(&mut record, "body").unwrap_err();
    assert_eq!(
        err,
        LazyColumnsError::RecordNotFound {
            model: "Document".to_string(),
            primary_key: "1".to_string(),
        }
    );
    assert!(!record.attributes().contains("body"));
}

#[test]
fn test_all_uses_narrowed_scope() {
    let conn = setup_documents_db();
    let registry = installed_registry();
    registry
        .lazy_load(&SqliteBackend::new(&conn), &document_schema(), ["body"])
        .unwrap();
    let repo = ModelRepo::new(&conn, &registry);

    let records = repo.all(&document_schema()).unwrap();

    assert_eq!(records.len(), 2);
    for record in &records {
        assert!(!record.attributes().contains("body"));
        assert!(record.attributes().contains("thumbnail"));
    }
    assert_eq!(records[0].attributes().get("id"), Some(&Value::from(1i64)));
}

#[test]
fn test_load_lazy_fetches_everything_missing() {
    let conn = setup_documents_db();
    let registry = installed_registry();
    registry
        .lazy_load(&SqliteBackend::new(&conn), &document_schema(), ["body", "thumbnail"])
        .unwrap();
    let repo = ModelRepo::new(&conn, &registry);

    let mut record = repo.find(&document_schema(), 1i64).unwrap();
    assert_eq!(repo.load_lazy(&mut record).unwrap(), 2);
    assert_eq!(repo.load_lazy(&mut record).unwrap(), 0);
    assert_eq!(repo.backend().stats().point_queries, 2);
}
