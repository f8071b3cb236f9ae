use async_trait::async_trait;
use serde_json::Value;

use crate::domain::DomainError;

/// Delivers a finished task's answer and returns the endpoint's raw reply.
#[async_trait]
pub trait AnswerSubmitter: Send + Sync {
    async fn submit(&self, answer: Value, task: &str) -> Result<String, DomainError>;
}
