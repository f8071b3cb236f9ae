use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, info};

use super::http_transport::{build_client, read_body, send_error};
use crate::application::AnswerSubmitter;
use crate::domain::{AnswerEnvelope, DomainError};

const SERVICE: &str = "ReportSubmitter";

/// Posts `{task, apikey, answer}` to the grading endpoint and returns its
/// reply verbatim.
pub struct ReportSubmitter {
    client: reqwest::Client,
    url: String,
    api_key: String,
}

impl ReportSubmitter {
    pub fn new(
        url: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, DomainError> {
        Ok(Self {
            client: build_client(timeout)?,
            url: url.into(),
            api_key: api_key.into(),
        })
    }

    /// Endpoint under a grading server base URL.
    pub fn report_url(base_url: &str) -> String {
        format!("{}/report", base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl AnswerSubmitter for ReportSubmitter {
    async fn submit(&self, answer: Value, task: &str) -> Result<String, DomainError> {
        let envelope = AnswerEnvelope::new(task, &self.api_key, answer);
        let body = serde_json::to_string(&envelope)
            .map_err(|e| DomainError::serialization(format!("answer for '{task}': {e}")))?;

        debug!("{SERVICE}: POST {} for task '{}'", self.url, task);
        let response = self
            .client
            .post(&self.url)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .map_err(|e| send_error(SERVICE, e))?;

        let reply = read_body(response, SERVICE).await?;
        info!("Grading response for '{}': {}", task, reply);
        Ok(reply)
    }
}
