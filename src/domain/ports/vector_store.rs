use crate::domain::error::DomainError;

/// A news article as kept next to its embedding. `id` is the article URL.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredDocument {
    pub id: String,
    pub title: String,
    pub content: String,
}

#[derive(Debug, Clone)]
pub struct ScoredDocument {
    pub document: StoredDocument,
    /// Lower is closer.
    pub distance: f64,
}

pub trait VectorStore: Send + Sync {
    /// Insert or replace the document and vector stored under `doc.id`.
    fn upsert(&self, doc: &StoredDocument, vector: &[f32]) -> Result<(), DomainError>;
    /// The `limit` closest documents, ordered by ascending distance.
    fn nearest(&self, vector: &[f32], limit: usize) -> Result<Vec<ScoredDocument>, DomainError>;
    fn count(&self) -> Result<usize, DomainError>;
    fn get_stored_dimension(&self) -> Result<Option<usize>, DomainError>;
}
