use async_trait::async_trait;

use crate::domain::{DomainError, ModerationReport};

#[async_trait]
pub trait Moderator: Send + Sync {
    async fn moderate(&self, input: &str) -> Result<ModerationReport, DomainError>;
}
