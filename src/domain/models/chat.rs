use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Deserializer, Serialize};

use crate::domain::DomainError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
    Tool,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
            Role::Tool => "tool",
        }
    }
}

/// One text-only turn of a conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub content: String,
}

impl ChatMessage {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageUrl {
    pub url: String,
}

/// A typed fragment of an [`ImageChatMessage`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart {
    Text { text: String },
    ImageUrl { image_url: ImageUrl },
}

impl ContentPart {
    pub fn text(text: impl Into<String>) -> Self {
        ContentPart::Text { text: text.into() }
    }

    /// Inline PNG bytes as a `data:` URI.
    pub fn png(bytes: &[u8]) -> Self {
        ContentPart::ImageUrl {
            image_url: ImageUrl {
                url: format!("data:image/png;base64,{}", STANDARD.encode(bytes)),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageChatMessage {
    pub role: Role,
    pub content: Vec<ContentPart>,
}

impl ImageChatMessage {
    pub fn new(role: Role, content: Vec<ContentPart>) -> Self {
        Self { role, content }
    }

    pub fn system(text: impl Into<String>) -> Self {
        Self::new(Role::System, vec![ContentPart::text(text)])
    }

    pub fn user(content: Vec<ContentPart>) -> Self {
        Self::new(Role::User, content)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionSpec {
    pub name: String,
    pub description: String,
    pub parameters: serde_json::Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tool {
    #[serde(rename = "type")]
    pub kind: String,
    pub function: FunctionSpec,
}

/// Chat completion request body. `M` is the message shape: [`ChatMessage`]
/// for text, [`ImageChatMessage`] for image-aware completions.
#[derive(Debug, Clone, Serialize)]
pub struct CompletionRequest<M = ChatMessage> {
    pub model: String,
    pub messages: Vec<M>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<Tool>,
}

pub type ImageCompletionRequest = CompletionRequest<ImageChatMessage>;

impl<M> CompletionRequest<M> {
    pub fn new(model: impl Into<String>, messages: Vec<M>) -> Self {
        Self {
            model: model.into(),
            messages,
            tools: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Usage {
    #[serde(default)]
    pub prompt_tokens: u32,
    #[serde(default)]
    pub completion_tokens: u32,
    #[serde(default)]
    pub total_tokens: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Choice {
    #[serde(default)]
    pub index: u32,
    pub message: ChatMessage,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

/// Decoded completion response. An empty `choices` list is a valid wire
/// response; use [`CompletionResult::first_content`] instead of indexing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompletionResult {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub model: String,
    #[serde(default)]
    pub choices: Vec<Choice>,
    #[serde(default)]
    pub usage: Option<Usage>,
}

impl CompletionResult {
    pub fn single(content: impl Into<String>) -> Self {
        Self {
            choices: vec![Choice {
                index: 0,
                message: ChatMessage::new(Role::Assistant, content),
                finish_reason: Some("stop".to_string()),
            }],
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.choices.is_empty()
    }

    pub fn first_content(&self) -> Result<&str, DomainError> {
        self.choices
            .first()
            .map(|choice| choice.message.content.as_str())
            .ok_or_else(|| DomainError::empty_result("no choices in completion response"))
    }

    pub fn into_first_content(self) -> Result<String, DomainError> {
        self.choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| DomainError::empty_result("no choices in completion response"))
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_choices_is_empty_result() {
        let result: CompletionResult = serde_json::from_value(json!({ "choices": [] })).unwrap();
        let err = result.first_content().unwrap_err();
        assert!(err.is_empty_result());
    }

    #[test]
    fn missing_choices_field_decodes_as_empty() {
        let result: CompletionResult =
            serde_json::from_value(json!({ "error": { "message": "quota" } })).unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn null_content_decodes_as_empty_string() {
        let result: CompletionResult = serde_json::from_value(json!({
            "choices": [{ "index": 0, "message": { "role": "assistant", "content": null } }]
        }))
        .unwrap();
        assert_eq!(result.first_content().unwrap(), "");
    }

    #[test]
    fn image_parts_serialize_with_type_tag() {
        let message = ImageChatMessage::user(vec![
            ContentPart::png(b"\x89PNG"),
            ContentPart::text("caption"),
        ]);
        let value = serde_json::to_value(&message).unwrap();
        assert_eq!(value["role"], "user");
        assert_eq!(value["content"][0]["type"], "image_url");
        assert_eq!(
            value["content"][0]["image_url"]["url"],
            "data:image/png;base64,iVBORw=="
        );
        assert_eq!(value["content"][1], json!({ "type": "text", "text": "caption" }));
    }

    #[test]
    fn request_omits_unset_optional_fields() {
        let request = CompletionRequest::new("gpt-4o", vec![ChatMessage::user("hi")]);
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value,
            json!({ "model": "gpt-4o", "messages": [{ "role": "user", "content": "hi" }] })
        );
    }
}
