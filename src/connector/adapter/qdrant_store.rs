use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use super::http_transport::{build_client, decode_response, send_error, trim_base};
use crate::application::VectorStore;
use crate::domain::{DomainError, Point, ScoredPoint, UpsertAck};

pub const DEFAULT_QDRANT_HOST: &str = "http://localhost:6333";
const SERVICE: &str = "QdrantStore";

#[derive(Serialize)]
struct UpsertRequest {
    points: Vec<Point>,
}

#[derive(Serialize)]
struct SearchRequest {
    vector: Vec<f32>,
    top: usize,
    with_payload: bool,
}

#[derive(Deserialize)]
struct QdrantResponse<T> {
    result: Option<T>,
    #[serde(default)]
    status: Value,
}

/// [`VectorStore`] over the Qdrant REST API.
pub struct QdrantStore {
    client: reqwest::Client,
    host: String,
    api_key: Option<String>,
}

impl QdrantStore {
    pub fn new(
        host: impl Into<String>,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self, DomainError> {
        Ok(Self {
            client: build_client(timeout)?,
            host: trim_base(host),
            api_key,
        })
    }

    fn points_url(&self, collection: &str, suffix: &str) -> String {
        format!("{}/collections/{}/points{}", self.host, collection, suffix)
    }

    async fn send<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, DomainError> {
        let request = match &self.api_key {
            Some(key) => request.header("api-key", key),
            None => request,
        };

        let response = request.send().await.map_err(|e| send_error(SERVICE, e))?;
        let decoded: QdrantResponse<T> = decode_response(response, SERVICE).await?;

        decoded.result.ok_or_else(|| {
            DomainError::empty_result(format!("{SERVICE}: no result (status {})", decoded.status))
        })
    }
}

#[async_trait]
impl VectorStore for QdrantStore {
    async fn upsert(
        &self,
        collection: &str,
        id: u64,
        vector: Vec<f32>,
        payload: Map<String, Value>,
    ) -> Result<UpsertAck, DomainError> {
        let url = self.points_url(collection, "?wait=true");
        debug!("{SERVICE}: PUT {url} (id {id}, dim {})", vector.len());

        let body = UpsertRequest {
            points: vec![Point::new(id, vector, payload)],
        };
        self.send(self.client.put(&url).json(&body)).await
    }

    async fn search(
        &self,
        collection: &str,
        vector: Vec<f32>,
        top: usize,
    ) -> Result<Vec<ScoredPoint>, DomainError> {
        let url = self.points_url(collection, "/search");
        debug!("{SERVICE}: POST {url} (top {top})");

        let body = SearchRequest {
            vector,
            top,
            with_payload: true,
        };
        self.send(self.client.post(&url).json(&body)).await
    }
}
