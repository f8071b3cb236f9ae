use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::http_transport::{build_client, decode_response, send_error, trim_base};
use crate::application::{
    ChatClient, EmbeddingService, ImageChatClient, ImageGenerator, Moderator, Transcriber,
};
use crate::domain::{
    CompletionRequest, CompletionResult, DomainError, ImageCompletionRequest,
    ImageGenerationResult, ImageRequest, ModerationReport,
};

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
const SERVICE: &str = "OpenAiClient";

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    input: &'a str,
    model: &'a str,
    encoding_format: &'a str,
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    #[serde(default)]
    data: Vec<EmbeddingData>,
}

#[derive(Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
}

#[derive(Serialize)]
struct ModerationRequest<'a> {
    input: &'a str,
}

#[derive(Deserialize)]
struct TranscriptionResponse {
    text: String,
}

/// HTTP client for the OpenAI REST API and compatible servers.
///
/// One instance covers every hosted capability: chat (plain and with images),
/// transcription, image generation, embeddings and moderation. Responses are
/// decoded whatever the HTTP status, so an error body that does not match the
/// expected shape surfaces as [`DomainError::Decode`], and a well-formed but
/// empty one as an empty result.
pub struct OpenAiClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl OpenAiClient {
    pub fn new(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, DomainError> {
        Ok(Self {
            client: build_client(timeout)?,
            api_key: api_key.into(),
            base_url: trim_base(base_url),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T, DomainError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.endpoint(path);
        debug!("{SERVICE}: POST {url}");

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| send_error(SERVICE, e))?;

        decode_response(response, SERVICE).await
    }
}

#[async_trait]
impl ChatClient for OpenAiClient {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResult, DomainError> {
        self.post_json("/chat/completions", &request).await
    }
}

#[async_trait]
impl ImageChatClient for OpenAiClient {
    async fn complete_images(
        &self,
        request: ImageCompletionRequest,
    ) -> Result<CompletionResult, DomainError> {
        self.post_json("/chat/completions", &request).await
    }
}

#[async_trait]
impl Transcriber for OpenAiClient {
    async fn transcribe(
        &self,
        audio: Vec<u8>,
        model: &str,
        format: &str,
    ) -> Result<String, DomainError> {
        let url = self.endpoint("/audio/transcriptions");
        debug!("{SERVICE}: POST {url} ({} bytes of {format})", audio.len());

        let form = Form::new()
            .part("file", Part::bytes(audio).file_name(format!("file.{format}")))
            .text("model", model.to_string());

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .multipart(form)
            .send()
            .await
            .map_err(|e| send_error(SERVICE, e))?;

        let transcription: TranscriptionResponse = decode_response(response, SERVICE).await?;
        Ok(transcription.text)
    }
}

#[async_trait]
impl ImageGenerator for OpenAiClient {
    async fn generate_image(
        &self,
        request: ImageRequest,
    ) -> Result<ImageGenerationResult, DomainError> {
        self.post_json("/images/generations", &request).await
    }
}

#[async_trait]
impl EmbeddingService for OpenAiClient {
    async fn embed(&self, input: &str, model: &str) -> Result<Vec<f32>, DomainError> {
        let request = EmbeddingRequest {
            input,
            model,
            encoding_format: "float",
        };
        let response: EmbeddingResponse = self.post_json("/embeddings", &request).await?;

        response
            .data
            .into_iter()
            .next()
            .map(|d| d.embedding)
            .ok_or_else(|| DomainError::empty_result("no embeddings in response"))
    }
}

#[async_trait]
impl Moderator for OpenAiClient {
    async fn moderate(&self, input: &str) -> Result<ModerationReport, DomainError> {
        self.post_json("/moderations", &ModerationRequest { input })
            .await
    }
}
