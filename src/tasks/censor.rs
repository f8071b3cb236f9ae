use async_trait::async_trait;
use serde_json::Value;
use tracing::info;

use crate::application::{ask, collapse_repeated, Container, Task};
use crate::connector::{AppConfig, HttpSource};
use crate::domain::DomainError;

const MODEL: &str = "llama3:8b";
pub const MARKER: &str = "CENZURA";
const SYSTEM_PROMPT: &str = "In order to prevent disclosing sensitive information I list all sensitive information.
I will use this information to replace it with this exact string: CENZURA.
I don't change the formatting of the text in any way. I do not add any new text.
Information considered sensitive:
- firstname
- surname
- city
- street name with a number
- person's age
I always include the resulting text only
";

/// Redacts personal data from a text with the local model.
pub struct CensorTask {
    source: HttpSource,
    input_url: String,
}

impl CensorTask {
    pub fn from_config(config: &AppConfig) -> Result<Self, DomainError> {
        Ok(Self {
            source: config.http_source()?,
            input_url: config.data_url("cenzura.txt")?,
        })
    }
}

#[async_trait]
impl Task for CensorTask {
    fn name(&self) -> &str {
        MARKER
    }

    async fn solve(&self, container: &Container) -> Result<Value, DomainError> {
        let llm = container.local_llm()?;

        let text = self.source.fetch_text(&self.input_url).await?;
        info!("Text to censor: {}", text.trim());

        let censored = ask(llm.as_ref(), MODEL, SYSTEM_PROMPT, &text).await?;
        Ok(Value::String(collapse_repeated(&censored, MARKER)))
    }
}
