use anyhow::Result;

use crate::application::{RunTaskUseCase, Task, TaskOutcome};
use crate::connector::api::container::AppConfig;
use crate::domain::DomainError;

use super::super::Container;

pub struct TaskController<'a> {
    container: &'a Container,
    config: &'a AppConfig,
}

impl<'a> TaskController<'a> {
    pub fn new(container: &'a Container, config: &'a AppConfig) -> Self {
        Self { container, config }
    }

    /// Builds a task from the configuration and runs it.
    pub async fn execute<T, F>(&self, build: F) -> Result<String>
    where
        T: Task,
        F: FnOnce(&AppConfig) -> Result<T, DomainError>,
    {
        let task = build(self.config)?;
        self.run(&task).await
    }

    pub async fn run(&self, task: &dyn Task) -> Result<String> {
        let outcome = RunTaskUseCase::new(self.container).execute(task).await?;
        Ok(self.format_outcome(&outcome))
    }

    fn format_outcome(&self, outcome: &TaskOutcome) -> String {
        format!(
            "Task: {}\nAnswer: {}\nResponse: {}",
            outcome.task,
            outcome.answer,
            outcome.response.trim()
        )
    }
}
