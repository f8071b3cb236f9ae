use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use tracing::info;

use crate::application::{ask, Container, ImageGenerator, Task};
use crate::connector::{AppConfig, HttpSource};
use crate::domain::DomainError;

const MODEL: &str = "gpt-4";
const SYSTEM_PROMPT: &str = "Wyciągam opis przedmiotu z podanego tekstu";

#[derive(Debug, Deserialize)]
struct RobotReport {
    description: String,
}

/// Draws the robot a witness described and submits the image URL.
pub struct RobotImageTask {
    source: HttpSource,
    input_url: String,
}

impl RobotImageTask {
    pub fn from_config(config: &AppConfig) -> Result<Self, DomainError> {
        Ok(Self {
            source: config.http_source()?,
            input_url: config.data_url("robotid.json")?,
        })
    }
}

#[async_trait]
impl Task for RobotImageTask {
    fn name(&self) -> &str {
        "robotid"
    }

    async fn solve(&self, container: &Container) -> Result<Value, DomainError> {
        let llm = container.llm()?;

        let report: RobotReport = self.source.fetch_json(&self.input_url).await?;
        let description = ask(llm.as_ref(), MODEL, SYSTEM_PROMPT, &report.description).await?;
        info!("Robot description: {}", description);

        let images = llm.generate_image_short(&description).await?;
        let url = images.first_url()?;
        info!("Generated image: {}", url);

        Ok(Value::String(url.to_string()))
    }
}
