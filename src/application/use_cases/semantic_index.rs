use std::sync::Arc;
use std::time::Instant;

use serde_json::{Map, Value};
use tracing::info;

use crate::application::{EmbeddingService, VectorStore};
use crate::domain::{DomainError, ScoredPoint, UpsertAck};

pub const DEFAULT_EMBEDDING_MODEL: &str = "text-embedding-3-small";

/// Payload field holding the indexed text.
pub const TEXT_FIELD: &str = "text";

/// Embeds a document and stores it under an explicit id.
pub struct IndexTextUseCase<E: ?Sized = dyn EmbeddingService> {
    embedding_service: Arc<E>,
    vector_store: Arc<dyn VectorStore>,
    model: String,
}

impl<E: EmbeddingService + ?Sized> IndexTextUseCase<E> {
    pub fn new(
        embedding_service: Arc<E>,
        vector_store: Arc<dyn VectorStore>,
    ) -> Self {
        Self {
            embedding_service,
            vector_store,
            model: DEFAULT_EMBEDDING_MODEL.to_string(),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub async fn execute(
        &self,
        collection: &str,
        id: u64,
        text: &str,
    ) -> Result<UpsertAck, DomainError> {
        let start_time = Instant::now();
        let vector = self.embedding_service.embed(text, &self.model).await?;

        let mut payload = Map::new();
        payload.insert(TEXT_FIELD.to_string(), Value::String(text.to_string()));

        let ack = self
            .vector_store
            .upsert(collection, id, vector, payload)
            .await?;

        info!(
            "Indexed point {} into '{}' ({}) in {:.2}s",
            id,
            collection,
            ack.status,
            start_time.elapsed().as_secs_f64()
        );
        Ok(ack)
    }
}

/// Embeds a query and returns the closest stored points, best first.
pub struct SearchTextUseCase<E: ?Sized = dyn EmbeddingService> {
    embedding_service: Arc<E>,
    vector_store: Arc<dyn VectorStore>,
    model: String,
}

impl<E: EmbeddingService + ?Sized> SearchTextUseCase<E> {
    pub fn new(
        embedding_service: Arc<E>,
        vector_store: Arc<dyn VectorStore>,
    ) -> Self {
        Self {
            embedding_service,
            vector_store,
            model: DEFAULT_EMBEDDING_MODEL.to_string(),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub async fn execute(
        &self,
        collection: &str,
        query: &str,
        top: usize,
    ) -> Result<Vec<ScoredPoint>, DomainError> {
        if top == 0 {
            return Err(DomainError::invalid_input("search limit must be positive"));
        }

        let vector = self.embedding_service.embed(query, &self.model).await?;
        let hits = self.vector_store.search(collection, vector, top).await?;
        info!("Found {} points in '{}'", hits.len(), collection);
        Ok(hits)
    }
}
