use super::{ChatClient, EmbeddingService, ImageChatClient, ImageGenerator, Moderator, Transcriber};

/// Every capability a hosted model provider offers.
pub trait LlmProvider:
    ChatClient + ImageChatClient + Transcriber + ImageGenerator + EmbeddingService + Moderator
{
}

impl<T> LlmProvider for T where
    T: ChatClient + ImageChatClient + Transcriber + ImageGenerator + EmbeddingService + Moderator
{
}
