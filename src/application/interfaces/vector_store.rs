use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::domain::{DomainError, ScoredPoint, UpsertAck};

/// Collection-scoped vector storage and similarity search.
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Writes one point; an existing point with the same id is overwritten.
    async fn upsert(
        &self,
        collection: &str,
        id: u64,
        vector: Vec<f32>,
        payload: Map<String, Value>,
    ) -> Result<UpsertAck, DomainError>;

    async fn search(
        &self,
        collection: &str,
        vector: Vec<f32>,
        top: usize,
    ) -> Result<Vec<ScoredPoint>, DomainError>;
}
