use std::time::Duration;

use serde::de::DeserializeOwned;
use tracing::warn;

use crate::domain::DomainError;

/// Client shared by every HTTP adapter: one overall timeout per request.
pub(crate) fn build_client(timeout: Duration) -> Result<reqwest::Client, DomainError> {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| DomainError::configuration(format!("failed to build HTTP client: {e}")))
}

pub(crate) fn send_error(service: &str, e: reqwest::Error) -> DomainError {
    DomainError::transport(format!("{service}: request failed: {e}"))
}

/// Reads the whole body. A non-2xx status is only logged; callers decide
/// whether the body is usable.
pub(crate) async fn read_body(
    response: reqwest::Response,
    service: &str,
) -> Result<String, DomainError> {
    let status = response.status();
    let body = response.text().await.map_err(|e| {
        DomainError::transport(format!("{service}: failed to read response body: {e}"))
    })?;

    if !status.is_success() {
        warn!("{service}: API returned {status}: {body}");
    }

    Ok(body)
}

pub(crate) async fn read_bytes(
    response: reqwest::Response,
    service: &str,
) -> Result<Vec<u8>, DomainError> {
    let status = response.status();
    if !status.is_success() {
        warn!("{service}: API returned {status} for {}", response.url());
    }

    let bytes = response.bytes().await.map_err(|e| {
        DomainError::transport(format!("{service}: failed to read response body: {e}"))
    })?;
    Ok(bytes.to_vec())
}

pub(crate) fn decode_body<T: DeserializeOwned>(
    body: &str,
    service: &str,
) -> Result<T, DomainError> {
    serde_json::from_str(body)
        .map_err(|e| DomainError::decode(format!("{service}: failed to parse response: {e}")))
}

/// [`read_body`] then JSON-decode, regardless of status.
pub(crate) async fn decode_response<T: DeserializeOwned>(
    response: reqwest::Response,
    service: &str,
) -> Result<T, DomainError> {
    let body = read_body(response, service).await?;
    decode_body(&body, service)
}

pub(crate) fn trim_base(url: impl Into<String>) -> String {
    url.into().trim_end_matches('/').to_string()
}
