use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

pub const DEFAULT_IMAGE_MODEL: &str = "dall-e-3";
pub const DEFAULT_IMAGE_SIZE: &str = "1024x1024";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImageRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    pub prompt: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub n: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quality: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_format: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
}

impl ImageRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            model: None,
            prompt: prompt.into(),
            n: None,
            quality: None,
            response_format: None,
            size: None,
        }
    }

    /// One square `dall-e-3` image.
    pub fn short(prompt: impl Into<String>) -> Self {
        Self {
            model: Some(DEFAULT_IMAGE_MODEL.to_string()),
            n: Some(1),
            size: Some(DEFAULT_IMAGE_SIZE.to_string()),
            ..Self::new(prompt)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedImage {
    #[serde(default)]
    pub url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImageGenerationResult {
    #[serde(default)]
    pub created: i64,
    #[serde(default)]
    pub data: Vec<GeneratedImage>,
}

impl ImageGenerationResult {
    pub fn first_url(&self) -> Result<&str, DomainError> {
        self.data
            .first()
            .map(|image| image.url.as_str())
            .ok_or_else(|| DomainError::empty_result("no images generated"))
    }
}

/// What a page scraper should return.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrapeOptions {
    pub formats: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub include_tags: Vec<String>,
}

impl Default for ScrapeOptions {
    fn default() -> Self {
        Self {
            formats: vec!["html".to_string(), "markdown".to_string()],
            include_tags: Vec::new(),
        }
    }
}

impl ScrapeOptions {
    pub fn with_include_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.include_tags = tags.into_iter().map(Into::into).collect();
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScrapedPage {
    #[serde(default)]
    pub html: Option<String>,
    #[serde(default)]
    pub markdown: Option<String>,
}

impl ScrapedPage {
    pub fn html(&self) -> Result<&str, DomainError> {
        self.html
            .as_deref()
            .ok_or_else(|| DomainError::empty_result("scraped page has no html"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn short_request_uses_fixed_defaults() {
        let value = serde_json::to_value(ImageRequest::short("a red robot")).unwrap();
        assert_eq!(
            value,
            json!({ "model": "dall-e-3", "prompt": "a red robot", "n": 1, "size": "1024x1024" })
        );
    }

    #[test]
    fn no_images_is_empty_result() {
        let result: ImageGenerationResult =
            serde_json::from_value(json!({ "created": 1, "data": [] })).unwrap();
        assert!(result.first_url().unwrap_err().is_empty_result());
    }

    #[test]
    fn scrape_options_serialize_camel_case() {
        let options = ScrapeOptions::default().with_include_tags(["p"]);
        let value = serde_json::to_value(options).unwrap();
        assert_eq!(
            value,
            json!({ "formats": ["html", "markdown"], "includeTags": ["p"] })
        );
    }
}
