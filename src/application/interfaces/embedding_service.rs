use async_trait::async_trait;

use crate::domain::DomainError;

/// Generates one vector for one input text.
#[async_trait]
pub trait EmbeddingService: Send + Sync {
    /// Fails with [`DomainError::EmptyResult`] when the provider returns no vector.
    async fn embed(&self, input: &str, model: &str) -> Result<Vec<f32>, DomainError>;
}
