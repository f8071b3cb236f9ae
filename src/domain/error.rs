use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Unknown service: {0}")]
    UnknownService(String),

    #[error("Service '{key}' resolved to {found}, expected {expected}")]
    ServiceMismatch {
        key: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Empty result: {0}")]
    EmptyResult(String),

    #[error("Cache error: {0}")]
    Cache(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Archive error: {0}")]
    Archive(String),
}

impl DomainError {
    pub fn unknown_service(key: impl Into<String>) -> Self {
        Self::UnknownService(key.into())
    }

    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }

    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    pub fn empty_result(msg: impl Into<String>) -> Self {
        Self::EmptyResult(msg.into())
    }

    pub fn cache(msg: impl Into<String>) -> Self {
        Self::Cache(msg.into())
    }

    pub fn serialization(msg: impl Into<String>) -> Self {
        Self::Serialization(msg.into())
    }

    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    pub fn archive(msg: impl Into<String>) -> Self {
        Self::Archive(msg.into())
    }

    /// Wiring mistakes: unknown keys, wrong handle types, missing settings.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::UnknownService(_) | Self::ServiceMismatch { .. } | Self::Configuration(_)
        )
    }

    pub fn is_unknown_service(&self) -> bool {
        matches!(self, Self::UnknownService(_))
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }

    pub fn is_empty_result(&self) -> bool {
        matches!(self, Self::EmptyResult(_))
    }
}
