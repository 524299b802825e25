use crate::domain::error::DomainError;
use rusqlite::Connection;

pub fn run_migrations(conn: &Connection) -> Result<(), DomainError> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS news_vectors (
            id TEXT PRIMARY KEY,
            title TEXT NOT NULL,
            content TEXT NOT NULL,
            dimension INTEGER NOT NULL,
            vector BLOB NOT NULL,
            stored_at TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_news_vectors_stored ON news_vectors(stored_at);
        ",
    )
    .map_err(|e| DomainError::VectorStore(format!("Migration failed: {e}")))
}
