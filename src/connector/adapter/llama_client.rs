use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::http_transport::{build_client, decode_response, send_error};
use crate::application::ChatClient;
use crate::domain::{CompletionRequest, CompletionResult, DomainError, Role};

pub const DEFAULT_LLAMA_URL: &str = "http://localhost:11434/api/generate";
const SERVICE: &str = "LlamaClient";

#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: String,
    stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<String>,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    model: String,
    #[serde(default)]
    response: String,
    #[serde(default)]
    done: bool,
    error: Option<String>,
}

/// [`ChatClient`] over a locally hosted Ollama `generate` endpoint.
///
/// The chat transcript is flattened: system messages become the `system`
/// field and the remaining turns are joined into `prompt`.
pub struct LlamaClient {
    client: reqwest::Client,
    url: String,
}

impl LlamaClient {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, DomainError> {
        Ok(Self {
            client: build_client(timeout)?,
            url: url.into(),
        })
    }

    fn flatten(request: &CompletionRequest) -> (Option<String>, String) {
        let join = |want_system: bool| {
            request
                .messages
                .iter()
                .filter(|m| (m.role == Role::System) == want_system)
                .map(|m| m.content.as_str())
                .collect::<Vec<_>>()
                .join("\n")
        };

        let system = join(true);
        let system = (!system.is_empty()).then_some(system);
        (system, join(false))
    }
}

#[async_trait]
impl ChatClient for LlamaClient {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResult, DomainError> {
        let (system, prompt) = Self::flatten(&request);
        let body = GenerateRequest {
            model: &request.model,
            prompt,
            stream: false,
            system,
        };

        debug!("{SERVICE}: POST {} (model {})", self.url, request.model);
        let response = self
            .client
            .post(&self.url)
            .json(&body)
            .send()
            .await
            .map_err(|e| send_error(SERVICE, e))?;

        let generated: GenerateResponse = decode_response(response, SERVICE).await?;
        if let Some(error) = generated.error {
            return Err(DomainError::empty_result(format!("{SERVICE}: {error}")));
        }
        if generated.response.is_empty() {
            return Err(DomainError::empty_result(format!(
                "{SERVICE}: empty response (done: {})",
                generated.done
            )));
        }

        let mut result = CompletionResult::single(generated.response);
        result.model = generated.model;
        Ok(result)
    }
}
