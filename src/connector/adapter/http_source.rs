use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use super::http_transport::{build_client, decode_body, read_body, read_bytes, send_error};
use crate::domain::DomainError;

const SERVICE: &str = "HttpSource";

/// Plain HTTP access to task inputs.
#[derive(Clone)]
pub struct HttpSource {
    client: reqwest::Client,
}

impl HttpSource {
    pub fn new(timeout: Duration) -> Result<Self, DomainError> {
        Ok(Self {
            client: build_client(timeout)?,
        })
    }

    pub async fn fetch_text(&self, url: &str) -> Result<String, DomainError> {
        debug!("{SERVICE}: GET {url}");
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| send_error(SERVICE, e))?;
        read_body(response, SERVICE).await
    }

    pub async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, DomainError> {
        debug!("{SERVICE}: GET {url}");
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| send_error(SERVICE, e))?;
        read_bytes(response, SERVICE).await
    }

    pub async fn fetch_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, DomainError> {
        let body = self.fetch_text(url).await?;
        decode_body(&body, SERVICE)
    }

    pub async fn post_json<B, T>(&self, url: &str, body: &B) -> Result<T, DomainError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        debug!("{SERVICE}: POST {url}");
        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|e| send_error(SERVICE, e))?;
        let body = read_body(response, SERVICE).await?;
        decode_body(&body, SERVICE)
    }
}
