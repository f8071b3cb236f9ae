use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use serde_json::Value;
use tracing::info;

use crate::application::{AnswerSubmitter, Container};
use crate::domain::DomainError;

/// One grading task: produce an answer from remote services, then hand it to
/// a submitter.
#[async_trait]
pub trait Task: Send + Sync {
    /// Name the grading endpoint knows this task by.
    fn name(&self) -> &str;

    async fn solve(&self, container: &Container) -> Result<Value, DomainError>;

    /// Where the answer goes. Defaults to the container's `responder`.
    fn submitter(&self, container: &Container) -> Result<Arc<dyn AnswerSubmitter>, DomainError> {
        container.submitter()
    }
}

#[derive(Debug, Clone)]
pub struct TaskOutcome {
    pub task: String,
    pub answer: Value,
    pub response: String,
}

/// Runs a [`Task`] end to end: the submitter is resolved before any remote
/// work, the task is solved, and the answer is submitted exactly once. Any
/// failure before submission aborts without submitting.
pub struct RunTaskUseCase<'a> {
    container: &'a Container,
}

impl<'a> RunTaskUseCase<'a> {
    pub fn new(container: &'a Container) -> Self {
        Self { container }
    }

    pub async fn execute(&self, task: &dyn Task) -> Result<TaskOutcome, DomainError> {
        info!("Running task '{}'", task.name());
        let start_time = Instant::now();

        let submitter = task.submitter(self.container)?;
        let answer = task.solve(self.container).await?;
        info!("Submitting answer for '{}': {}", task.name(), answer);

        let response = submitter.submit(answer.clone(), task.name()).await?;

        info!(
            "Task '{}' finished in {:.2}s",
            task.name(),
            start_time.elapsed().as_secs_f64()
        );

        Ok(TaskOutcome {
            task: task.name().to_string(),
            answer,
            response,
        })
    }
}
