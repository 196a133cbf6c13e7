use lazycols_core::{Activation, LazyRegistry, ModelSchema};
use rusqlite::Connection;

/// In-memory database with a seeded `documents` table
#[allow(dead_code)]
pub fn setup_documents_db() -> Connection {
    let conn = lazycols_store::db::open_in_memory().expect("Failed to create in-memory database");
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

        INSERT INTO documents (id, title, body, thumbnail)
        VALUES (2, 'Draft', NULL, NULL);
        "#,
    )
    .expect("Failed to seed documents");
    conn
}

/// A registry that has been installed once
#[allow(dead_code)]
pub fn installed_registry() -> LazyRegistry {
    let registry = LazyRegistry::new();
    assert_eq!(registry.install(), Activation::Active);
    registry
}

#[allow(dead_code)]
pub fn document_schema() -> ModelSchema {
    ModelSchema::new("Document", "documents")
}
