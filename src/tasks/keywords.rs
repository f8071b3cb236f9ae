use std::collections::BTreeMap;

use async_trait::async_trait;
use serde_json::Value;
use tracing::info;

use crate::application::{converse, keyword_list, Container, EntryFilter, Task};
use crate::connector::{read_matching, AppConfig, ArchiveEntry, HttpSource};
use crate::domain::{ChatMessage, DomainError};

const MODEL: &str = "gpt-4o-mini";
const DELETED_MARKER: &str = "entry deleted";
const KEYWORDS_PROMPT: &str = r#"Generuję listę słów kluczowych w formie mianownika (czyli np. "sportowiec", a nie "sportowcem", "sportowców" itp.).
Dodaję dodatkowe słowa kluczowe na podstawie swojej wiedzy.
Zwracam tylko te słowa kluczowe, nic więcej.
Każde słowo kluczowe w osobnej linii, bez myślników i numerów linii."#;

/// Text files that are reports or background facts.
pub fn document_filter() -> EntryFilter {
    EntryFilter::new()
        .require_any([".txt"])
        .require_any(["report", "facts/"])
}

/// Reports to index and the facts used as shared context. A file whose
/// name matches both lands in both lists; deleted entries in neither.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Documents {
    pub reports: Vec<ArchiveEntry>,
    pub facts: Vec<ArchiveEntry>,
}

impl Documents {
    pub fn split(entries: Vec<ArchiveEntry>) -> Self {
        let mut documents = Self::default();
        for entry in entries {
            if entry.text().trim_matches([' ', '\n']) == DELETED_MARKER {
                continue;
            }
            if entry.name.contains("facts/") {
                documents.facts.push(entry.clone());
            }
            if entry.name.contains("report") {
                documents.reports.push(entry);
            }
        }
        documents
    }

    pub fn facts_context(&self) -> String {
        self.facts
            .iter()
            .map(ArchiveEntry::text)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Produces comma-separated keywords for every factory report.
pub struct KeywordsTask {
    source: HttpSource,
    archive_url: String,
}

impl KeywordsTask {
    pub fn from_config(config: &AppConfig) -> Result<Self, DomainError> {
        Ok(Self {
            source: config.http_source()?,
            archive_url: format!("{}/dane/pliki_z_fabryki.zip", config.centrala()?),
        })
    }
}

#[async_trait]
impl Task for KeywordsTask {
    fn name(&self) -> &str {
        "dokumenty"
    }

    async fn solve(&self, container: &Container) -> Result<Value, DomainError> {
        let llm = container.llm()?;

        let archive = self.source.fetch_bytes(&self.archive_url).await?;
        let documents = Documents::split(read_matching(&archive, &document_filter())?);
        info!(
            "{} reports, {} fact files",
            documents.reports.len(),
            documents.facts.len()
        );

        let context = documents.facts_context();
        let mut answer = BTreeMap::new();
        for report in &documents.reports {
            let messages = vec![
                ChatMessage::system(context.as_str()),
                ChatMessage::system(KEYWORDS_PROMPT),
                ChatMessage::user(report.text()),
            ];
            let reply = converse(llm.as_ref(), MODEL, messages).await?;
            let keywords = keyword_list(&reply).join(", ");
            info!("{}: {}", report.name, keywords);
            answer.insert(report.name.clone(), keywords);
        }

        serde_json::to_value(answer)
            .map_err(|e| DomainError::serialization(format!("keywords: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(name: &str, text: &str) -> ArchiveEntry {
        ArchiveEntry {
            name: name.to_string(),
            data: text.as_bytes().to_vec(),
        }
    }

    #[test]
    fn deleted_entries_are_dropped() {
        let documents = Documents::split(vec![
            entry("2024-11-12_report-00-sektor_C4.txt", "Alarm w sektorze C4."),
            entry("facts/f01.txt", "Adam Gospodarczyk, programista JavaScript."),
            entry("facts/f02.txt", " entry deleted\n"),
        ]);

        assert_eq!(documents.reports.len(), 1);
        assert_eq!(documents.facts.len(), 1);
        assert_eq!(
            documents.facts_context(),
            "Adam Gospodarczyk, programista JavaScript."
        );
    }

    #[test]
    fn name_matching_both_lands_in_both() {
        let documents = Documents::split(vec![entry("facts/report-summary.txt", "x")]);
        assert_eq!(documents.reports.len(), 1);
        assert_eq!(documents.facts.len(), 1);
    }

    #[test]
    fn filter_needs_text_and_kind() {
        let filter = document_filter();
        assert!(filter.accepts("2024-11-12_report-00-sektor_C4.txt"));
        assert!(filter.accepts("facts/f01.txt"));
        assert!(!filter.accepts("2024-11-12_report-13.png"));
        assert!(!filter.accepts("notes.txt"));
    }
}
