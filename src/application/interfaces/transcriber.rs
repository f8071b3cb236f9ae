use async_trait::async_trait;

use crate::domain::DomainError;

/// Speech-to-text over a single uploaded file.
#[async_trait]
pub trait Transcriber: Send + Sync {
    /// `format` is the file extension the provider uses to sniff the codec
    /// (`mp3`, `m4a`, ...).
    async fn transcribe(
        &self,
        audio: Vec<u8>,
        model: &str,
        format: &str,
    ) -> Result<String, DomainError>;
}
