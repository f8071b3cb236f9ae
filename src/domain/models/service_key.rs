use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

/// Identifies one wired service in a [`crate::application::Container`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceKey {
    OpenAi,
    Llama,
    Qdrant,
    Redis,
    Scraper,
    Responder,
}

impl ServiceKey {
    pub const ALL: [ServiceKey; 6] = [
        ServiceKey::OpenAi,
        ServiceKey::Llama,
        ServiceKey::Qdrant,
        ServiceKey::Redis,
        ServiceKey::Scraper,
        ServiceKey::Responder,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceKey::OpenAi => "openai",
            ServiceKey::Llama => "llama",
            ServiceKey::Qdrant => "qdrant",
            ServiceKey::Redis => "redis",
            ServiceKey::Scraper => "scraper",
            ServiceKey::Responder => "responder",
        }
    }

    pub fn parse(name: &str) -> Result<Self, DomainError> {
        Self::ALL
            .into_iter()
            .find(|key| key.as_str() == name)
            .ok_or_else(|| DomainError::unknown_service(name))
    }
}

impl std::fmt::Display for ServiceKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ServiceKey {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_round_trips_every_key() {
        for key in ServiceKey::ALL {
            assert_eq!(ServiceKey::parse(key.as_str()).unwrap(), key);
        }
    }

    #[test]
    fn parse_is_case_sensitive() {
        let err = ServiceKey::parse("OpenAI").unwrap_err();
        assert!(err.is_unknown_service());
    }

    #[test]
    fn unknown_name_is_unknown_service() {
        let err = "postgres".parse::<ServiceKey>().unwrap_err();
        assert!(matches!(err, DomainError::UnknownService(name) if name == "postgres"));
    }
}
