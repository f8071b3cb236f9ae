use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{json, Value};
use tracing::info;

use super::html::last_text_node;
use crate::application::{ask, AnswerSubmitter, Container, Task};
use crate::connector::{AppConfig, FormPostSubmitter};
use crate::domain::{DomainError, ScrapeOptions};

const MODEL: &str = "gpt-3.5-turbo";
const SYSTEM_PROMPT: &str = "I search for a question in given text and answer it. I disregard all other text. I return only the answer to the question, nothing else. My answers are always an integer";

static HUMAN_QUESTION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?is)<p\b[^>]*\bid\s*=\s*["']human-question["'][^>]*>(.*?)</p>"#)
        .expect("Invalid regex")
});

/// Finds the anti-bot question on the login page.
pub fn extract_human_question(html: &str) -> Option<String> {
    HUMAN_QUESTION
        .captures(html)
        .and_then(|c| last_text_node(&c[1]))
}

/// Answers the login page's question and posts the credentials form.
pub struct LoginTask {
    url: String,
    username: String,
    password: String,
    timeout: Duration,
}

impl LoginTask {
    pub fn from_config(config: &AppConfig) -> Result<Self, DomainError> {
        let require = |value: &Option<String>, name: &str| {
            value
                .clone()
                .ok_or_else(|| DomainError::configuration(format!("{name} is not set")))
        };

        Ok(Self {
            url: require(&config.login_url, "S01E01_URL")?,
            username: require(&config.login_username, "S01E01_USERNAME")?,
            password: require(&config.login_password, "S01E01_PASSWORD")?,
            timeout: config.request_timeout,
        })
    }
}

#[async_trait]
impl Task for LoginTask {
    fn name(&self) -> &str {
        "login"
    }

    async fn solve(&self, container: &Container) -> Result<Value, DomainError> {
        let scraper = container.scraper()?;
        let llm = container.llm()?;

        let page = scraper
            .scrape(&self.url, ScrapeOptions::default().with_include_tags(["p"]))
            .await?;
        let question = extract_human_question(page.html()?).ok_or_else(|| {
            DomainError::empty_result(format!("no human-question paragraph on {}", self.url))
        })?;
        info!("Login question: {}", question);

        let answer = ask(llm.as_ref(), MODEL, SYSTEM_PROMPT, &question).await?;

        Ok(json!({
            "username": self.username,
            "password": self.password,
            "answer": answer.trim(),
        }))
    }

    fn submitter(&self, _container: &Container) -> Result<Arc<dyn AnswerSubmitter>, DomainError> {
        Ok(Arc::new(FormPostSubmitter::new(&self.url, self.timeout)?))
    }
}
