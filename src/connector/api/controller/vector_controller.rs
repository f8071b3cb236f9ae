use anyhow::Result;

use crate::application::{IndexTextUseCase, SearchTextUseCase, TEXT_FIELD};
use crate::domain::ScoredPoint;

use super::super::Container;

pub struct VectorController<'a> {
    container: &'a Container,
}

impl<'a> VectorController<'a> {
    pub fn new(container: &'a Container) -> Self {
        Self { container }
    }

    pub async fn index(&self, collection: String, id: u64, text: String) -> Result<String> {
        let use_case = IndexTextUseCase::new(self.container.llm()?, self.container.vector_store()?);
        let ack = use_case.execute(&collection, id, &text).await?;
        Ok(format!(
            "Indexed point {} into '{}' (operation {}, {})",
            id, collection, ack.operation_id, ack.status
        ))
    }

    pub async fn search(&self, collection: String, query: String, top: usize) -> Result<String> {
        let use_case =
            SearchTextUseCase::new(self.container.llm()?, self.container.vector_store()?);
        let hits = use_case.execute(&collection, &query, top).await?;
        Ok(format_hits(&hits))
    }
}

fn format_hits(hits: &[ScoredPoint]) -> String {
    if hits.is_empty() {
        return "No results found.".to_string();
    }

    let mut output = format!("Found {} results:\n\n", hits.len());
    for (i, hit) in hits.iter().enumerate() {
        output.push_str(&format!(
            "{}. #{} (score: {:.3})\n   | {}\n",
            i + 1,
            hit.id,
            hit.score,
            hit.payload_str(TEXT_FIELD).unwrap_or("")
        ));
    }
    output
}
