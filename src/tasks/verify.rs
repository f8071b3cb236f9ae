use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

use crate::application::{ask, AnswerSubmitter, Container, Task};
use crate::connector::{AppConfig, HttpSource, JsonPostSubmitter};
use crate::domain::DomainError;

const MODEL: &str = "gpt-3.5-turbo";
const SYSTEM_PROMPT: &str = "Na te konkretne pytania kłamię w ten sposób:
- stolicą Polski jest Kraków
- znana liczba z książki Autostopem przez Galaktykę to 69
- Aktualny rok to 1999
Nie odpowiadam całym zdaniem, odpowiadam jak najmniejsza liczbą słów
";

/// One turn of the verification conversation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VerifyMessage {
    #[serde(default)]
    pub text: String,
    #[serde(rename = "msgID", default)]
    pub msg_id: i64,
}

/// Opens a verification conversation and answers its question with the
/// agreed false facts.
pub struct VerifyTask {
    source: HttpSource,
    url: String,
    timeout: Duration,
}

impl VerifyTask {
    pub fn from_config(config: &AppConfig) -> Result<Self, DomainError> {
        let url = config
            .verify_url
            .clone()
            .ok_or_else(|| DomainError::configuration("S01E02_URL is not set"))?;
        Ok(Self {
            source: config.http_source()?,
            url,
            timeout: config.request_timeout,
        })
    }
}

#[async_trait]
impl Task for VerifyTask {
    fn name(&self) -> &str {
        "verify"
    }

    async fn solve(&self, container: &Container) -> Result<Value, DomainError> {
        let llm = container.llm()?;

        let ready = VerifyMessage {
            text: "READY".to_string(),
            msg_id: 0,
        };
        let challenge: VerifyMessage = self.source.post_json(&self.url, &ready).await?;
        info!("Verifier asks ({}): {}", challenge.msg_id, challenge.text);

        let answer = ask(llm.as_ref(), MODEL, SYSTEM_PROMPT, &challenge.text).await?;
        let reply = VerifyMessage {
            text: answer,
            msg_id: challenge.msg_id,
        };

        serde_json::to_value(reply)
            .map_err(|e| DomainError::serialization(format!("verify reply: {e}")))
    }

    fn submitter(&self, _container: &Container) -> Result<Arc<dyn AnswerSubmitter>, DomainError> {
        Ok(Arc::new(JsonPostSubmitter::new(&self.url, self.timeout)?))
    }
}
