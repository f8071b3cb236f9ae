use anyhow::Result;

use crate::application::Moderator;
use crate::domain::ModerationReport;

use super::super::Container;

pub struct ModerationController<'a> {
    container: &'a Container,
}

impl<'a> ModerationController<'a> {
    pub fn new(container: &'a Container) -> Self {
        Self { container }
    }

    pub async fn moderate(&self, text: String) -> Result<String> {
        let llm = self.container.llm()?;
        let report = llm.moderate(&text).await?;
        Ok(format_report(&report))
    }
}

fn format_report(report: &ModerationReport) -> String {
    if !report.flagged() {
        return "Not flagged.".to_string();
    }

    let categories: Vec<&str> = report
        .results
        .iter()
        .flat_map(|result| result.flagged_categories())
        .collect();
    format!("Flagged: {}", categories.join(", "))
}
