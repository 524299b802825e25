use crate::config::DistanceMetric;
use crate::domain::error::DomainError;
use crate::domain::ports::vector_store::{ScoredDocument, StoredDocument, VectorStore};
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use std::sync::Mutex;

/// News embeddings in SQLite, searched by brute-force scan.
pub struct SqliteVectorStore {
    conn: Mutex<Connection>,
    metric: DistanceMetric,
}

impl SqliteVectorStore {
    pub fn new(conn: Connection, metric: DistanceMetric) -> Self {
        Self {
            conn: Mutex::new(conn),
            metric,
        }
    }

    fn cosine_similarity(a: &[f32], b: &[f32]) -> f64 {
        if a.len() != b.len() || a.is_empty() {
            return 0.0;
        }
        let mut dot = 0.0_f64;
        let mut norm_a = 0.0_f64;
        let mut norm_b = 0.0_f64;
        for (x, y) in a.iter().zip(b.iter()) {
            let x = *x as f64;
            let y = *y as f64;
            dot += x * y;
            norm_a += x * x;
            norm_b += y * y;
        }
        let denom = norm_a.sqrt() * norm_b.sqrt();
        if denom == 0.0 { 0.0 } else { dot / denom }
    }

    fn squared_l2(a: &[f32], b: &[f32]) -> f64 {
        a.iter()
            .zip(b.iter())
            .map(|(x, y)| {
                let d = *x as f64 - *y as f64;
                d * d
            })
            .sum()
    }

    fn distance(&self, a: &[f32], b: &[f32]) -> f64 {
        match self.metric {
            DistanceMetric::SquaredL2 => Self::squared_l2(a, b),
            DistanceMetric::Cosine => 1.0 - Self::cosine_similarity(a, b),
        }
    }

    fn serialize_vector(v: &[f32]) -> Vec<u8> {
        v.iter().flat_map(|f| f.to_le_bytes()).collect()
    }

    fn deserialize_vector(bytes: &[u8]) -> Vec<f32> {
        bytes
            .chunks_exact(4)
            .map(|chunk| f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
            .collect()
    }
}

impl VectorStore for SqliteVectorStore {
    fn upsert(&self, doc: &StoredDocument, vector: &[f32]) -> Result<(), DomainError> {
        if vector.is_empty() {
            return Err(DomainError::VectorStore(format!("Empty vector for {}", doc.id)));
        }
        let conn = self.conn.lock().map_err(|e| DomainError::VectorStore(e.to_string()))?;
        conn.execute(
            "INSERT OR REPLACE INTO news_vectors (id, title, content, dimension, vector, stored_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                doc.id,
                doc.title,
                doc.content,
                vector.len() as i64,
                Self::serialize_vector(vector),
                Utc::now().to_rfc3339(),
            ],
        )
        .map_err(|e| DomainError::VectorStore(format!("Failed to store vector: {e}")))?;
        Ok(())
    }

    fn nearest(&self, vector: &[f32], limit: usize) -> Result<Vec<ScoredDocument>, DomainError> {
        if vector.is_empty() || limit == 0 {
            return Ok(vec![]);
        }
        let conn = self.conn.lock().map_err(|e| DomainError::VectorStore(e.to_string()))?;
        // Vectors of another dimension come from a different embedding model and are not comparable
        let mut stmt = conn.prepare("SELECT id, title, content, vector FROM news_vectors WHERE dimension = ?1")?;
        let mut results: Vec<ScoredDocument> = stmt
            .query_map(params![vector.len() as i64], |row| {
                let id: String = row.get(0)?;
                let title: String = row.get(1)?;
                let content: String = row.get(2)?;
                let blob: Vec<u8> = row.get(3)?;
                Ok((StoredDocument { id, title, content }, blob))
            })?
            .filter_map(|r| r.ok())
            .map(|(document, blob)| {
                let stored = Self::deserialize_vector(&blob);
                let distance = self.distance(vector, &stored);
                ScoredDocument { document, distance }
            })
            .collect();

        results.sort_by(|a, b| {
            a.distance
                .partial_cmp(&b.distance)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.document.id.cmp(&b.document.id))
        });
        results.truncate(limit);
        Ok(results)
    }

    fn count(&self) -> Result<usize, DomainError> {
        let conn = self.conn.lock().map_err(|e| DomainError::VectorStore(e.to_string()))?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM news_vectors", [], |r| r.get(0))?;
        Ok(count as usize)
    }

    fn get_stored_dimension(&self) -> Result<Option<usize>, DomainError> {
        let conn = self.conn.lock().map_err(|e| DomainError::VectorStore(e.to_string()))?;
        let dim: Option<i64> = conn
            .query_row("SELECT dimension FROM news_vectors ORDER BY stored_at DESC LIMIT 1", [], |r| r.get(0))
            .optional()?;
        Ok(dim.map(|d| d as usize))
    }
}
