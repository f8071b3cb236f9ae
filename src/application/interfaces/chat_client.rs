use async_trait::async_trait;

use crate::domain::{
    ChatMessage, CompletionRequest, CompletionResult, DomainError, ImageChatMessage,
    ImageCompletionRequest,
};

/// Text-only chat completion.
///
/// Implementors decode the provider response regardless of HTTP status; an
/// empty [`CompletionResult`] is returned as-is and callers guard it with
/// [`CompletionResult::first_content`].
#[async_trait]
pub trait ChatClient: Send + Sync {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResult, DomainError>;

    async fn complete_short(
        &self,
        messages: Vec<ChatMessage>,
        model: &str,
    ) -> Result<CompletionResult, DomainError> {
        self.complete(CompletionRequest::new(model, messages)).await
    }
}

/// Chat completion whose messages may embed images.
#[async_trait]
pub trait ImageChatClient: Send + Sync {
    async fn complete_images(
        &self,
        request: ImageCompletionRequest,
    ) -> Result<CompletionResult, DomainError>;

    async fn complete_images_short(
        &self,
        messages: Vec<ImageChatMessage>,
        model: &str,
    ) -> Result<CompletionResult, DomainError> {
        self.complete_images(CompletionRequest::new(model, messages))
            .await
    }
}
