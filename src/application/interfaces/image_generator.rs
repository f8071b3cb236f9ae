use async_trait::async_trait;

use crate::domain::{DomainError, ImageGenerationResult, ImageRequest};

#[async_trait]
pub trait ImageGenerator: Send + Sync {
    async fn generate_image(
        &self,
        request: ImageRequest,
    ) -> Result<ImageGenerationResult, DomainError>;

    async fn generate_image_short(
        &self,
        prompt: &str,
    ) -> Result<ImageGenerationResult, DomainError> {
        self.generate_image(ImageRequest::short(prompt)).await
    }
}
