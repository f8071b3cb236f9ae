use anyhow::Result;

use crate::tasks::{
    ArxivTask, CalibrationTask, CategoriesTask, CensorTask, InterrogationsTask, KeywordsTask,
    LoginTask, RobotImageTask, VerifyTask,
};
use crate::Commands;

use super::container::AppConfig;
use super::controller::{CheckController, ModerationController, TaskController, VectorController};
use super::Container;

pub struct Router<'a> {
    task_controller: TaskController<'a>,
    moderation_controller: ModerationController<'a>,
    vector_controller: VectorController<'a>,
    check_controller: CheckController<'a>,
}

impl<'a> Router<'a> {
    pub fn new(container: &'a Container, config: &'a AppConfig) -> Self {
        Self {
            task_controller: TaskController::new(container, config),
            moderation_controller: ModerationController::new(container),
            vector_controller: VectorController::new(container),
            check_controller: CheckController::new(container),
        }
    }

    pub async fn route(&self, command: Commands) -> Result<String> {
        match command {
            Commands::Login => self.task_controller.execute(LoginTask::from_config).await,
            Commands::Verify => self.task_controller.execute(VerifyTask::from_config).await,
            Commands::Calibration => {
                self.task_controller
                    .execute(CalibrationTask::from_config)
                    .await
            }
            Commands::Censor => self.task_controller.execute(CensorTask::from_config).await,
            Commands::Interrogations => {
                self.task_controller
                    .execute(InterrogationsTask::from_config)
                    .await
            }
            Commands::RobotImage => {
                self.task_controller
                    .execute(RobotImageTask::from_config)
                    .await
            }
            Commands::Categories => {
                self.task_controller
                    .execute(CategoriesTask::from_config)
                    .await
            }
            Commands::Arxiv => self.task_controller.execute(ArxivTask::from_config).await,
            Commands::Keywords => self.task_controller.execute(KeywordsTask::from_config).await,
            Commands::Moderate { text } => self.moderation_controller.moderate(text).await,
            Commands::Index {
                collection,
                id,
                text,
            } => self.vector_controller.index(collection, id, text).await,
            Commands::Search {
                collection,
                query,
                top,
            } => self.vector_controller.search(collection, query, top).await,
            Commands::Check { names } => self.check_controller.check(names),
        }
    }
}
