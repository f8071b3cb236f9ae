//! Submitters for endpoints that take the answer itself rather than the
//! grading envelope.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tracing::info;

use super::http_transport::{build_client, read_body, send_error};
use crate::application::AnswerSubmitter;
use crate::domain::DomainError;

/// POSTs the answer as a raw JSON body.
pub struct JsonPostSubmitter {
    client: reqwest::Client,
    url: String,
}

impl JsonPostSubmitter {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, DomainError> {
        Ok(Self {
            client: build_client(timeout)?,
            url: url.into(),
        })
    }
}

#[async_trait]
impl AnswerSubmitter for JsonPostSubmitter {
    async fn submit(&self, answer: Value, task: &str) -> Result<String, DomainError> {
        let response = self
            .client
            .post(&self.url)
            .json(&answer)
            .send()
            .await
            .map_err(|e| send_error("JsonPostSubmitter", e))?;

        let reply = read_body(response, "JsonPostSubmitter").await?;
        info!("Response for '{}': {}", task, reply);
        Ok(reply)
    }
}

/// POSTs a flat JSON object as an urlencoded form.
pub struct FormPostSubmitter {
    client: reqwest::Client,
    url: String,
}

impl FormPostSubmitter {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, DomainError> {
        Ok(Self {
            client: build_client(timeout)?,
            url: url.into(),
        })
    }

    fn form_fields(answer: &Value) -> Result<Vec<(String, String)>, DomainError> {
        let fields = answer.as_object().ok_or_else(|| {
            DomainError::serialization("form answer must be a JSON object")
        })?;

        Ok(fields
            .iter()
            .map(|(name, value)| {
                let value = match value {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                };
                (name.clone(), value)
            })
            .collect())
    }
}

#[async_trait]
impl AnswerSubmitter for FormPostSubmitter {
    async fn submit(&self, answer: Value, task: &str) -> Result<String, DomainError> {
        let fields = Self::form_fields(&answer)?;
        let response = self
            .client
            .post(&self.url)
            .form(&fields)
            .send()
            .await
            .map_err(|e| send_error("FormPostSubmitter", e))?;

        let reply = read_body(response, "FormPostSubmitter").await?;
        info!("Response for '{}': {} bytes", task, reply.len());
        Ok(reply)
    }
}
