use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};

use crate::application::{
    ask, read_through_json, Container, EntryFilter, ImageChatClient, LlmProvider, NoteCategory,
    Task, Transcriber, DEFAULT_CACHE_TTL,
};
use crate::connector::{read_matching, AppConfig, ArchiveEntry, HttpSource};
use crate::domain::{ContentPart, DomainError, ImageChatMessage};

const CACHE_KEY: &str = "notes_json3";
const TRANSCRIPTION_MODEL: &str = "whisper-1";
const VISION_MODEL: &str = "gpt-4o";
const CLASSIFIER_MODEL: &str = "gpt-4o";
const OCR_PROMPT: &str = "I return text from given images. Nothing else.";
const CLASSIFIER_PROMPT: &str = "Jestem klasyfikatorem notatek
Zwracam w odpowiedzi konkretne słowo jeśli notatka zawiera informację o:
- schwytanych ludziach: LUDZIE
- śladach obecności ludzi: LUDZIE
- naprawionych usterkach hardwarowych: HARDWARE
W pozostałych przypadkach zwracam słowo NIEISTOTNE
";

/// A factory note reduced to text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    #[serde(rename = "fileName")]
    pub file_name: String,
    pub contents: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NoteKind {
    Text,
    Audio,
    Image,
}

impl NoteKind {
    fn of(entry: &ArchiveEntry) -> Option<Self> {
        match entry.extension()?.as_str() {
            "txt" => Some(NoteKind::Text),
            "mp3" => Some(NoteKind::Audio),
            "png" => Some(NoteKind::Image),
            _ => None,
        }
    }
}

/// Which archive entries count as notes.
pub fn note_filter() -> EntryFilter {
    EntryFilter::new()
        .require_any([".txt", ".mp3", ".png"])
        .exclude("facts/")
}

/// The graded answer: file names per category, each list sorted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CategorizedNotes {
    pub people: Vec<String>,
    pub hardware: Vec<String>,
}

impl CategorizedNotes {
    pub fn from_classified<I>(classified: I) -> Self
    where
        I: IntoIterator<Item = (String, NoteCategory)>,
    {
        let mut result = Self::default();
        for (file_name, category) in classified {
            match category {
                NoteCategory::People => result.people.push(file_name),
                NoteCategory::Hardware => result.hardware.push(file_name),
                NoteCategory::Irrelevant => {}
            }
        }
        result.people.sort();
        result.hardware.sort();
        result
    }
}

/// Sorts factory notes of any media type into people and hardware reports.
pub struct CategoriesTask {
    source: HttpSource,
    archive_url: String,
}

impl CategoriesTask {
    pub fn from_config(config: &AppConfig) -> Result<Self, DomainError> {
        Ok(Self {
            source: config.http_source()?,
            archive_url: format!("{}/dane/pliki_z_fabryki.zip", config.centrala()?),
        })
    }

    async fn collect_notes(&self, llm: &dyn LlmProvider) -> Result<Vec<Note>, DomainError> {
        let archive = self.source.fetch_bytes(&self.archive_url).await?;
        let entries = read_matching(&archive, &note_filter())?;

        let mut notes = Vec::with_capacity(entries.len());
        for entry in entries {
            if let Some(note) = Self::read_note(llm, entry).await? {
                notes.push(note);
            }
        }
        Ok(notes)
    }

    async fn read_note(
        llm: &dyn LlmProvider,
        entry: ArchiveEntry,
    ) -> Result<Option<Note>, DomainError> {
        let Some(kind) = NoteKind::of(&entry) else {
            return Ok(None);
        };
        debug!("Reading {:?} note {}", kind, entry.name);

        let contents = match kind {
            NoteKind::Text => entry.text(),
            NoteKind::Audio => {
                llm.transcribe(entry.data, TRANSCRIPTION_MODEL, "mp3")
                    .await?
            }
            NoteKind::Image => {
                let messages = vec![
                    ImageChatMessage::system(OCR_PROMPT),
                    ImageChatMessage::user(vec![ContentPart::png(&entry.data)]),
                ];
                llm.complete_images_short(messages, VISION_MODEL)
                    .await?
                    .into_first_content()?
            }
        };

        Ok(Some(Note {
            file_name: entry.name,
            contents,
        }))
    }
}

#[async_trait]
impl Task for CategoriesTask {
    fn name(&self) -> &str {
        "kategorie"
    }

    async fn solve(&self, container: &Container) -> Result<Value, DomainError> {
        let cache = container.cache()?;
        let llm = container.llm()?;

        let notes: Vec<Note> =
            read_through_json(cache.as_ref(), CACHE_KEY, DEFAULT_CACHE_TTL, || {
                self.collect_notes(llm.as_ref())
            })
            .await?;
        info!("Classifying {} notes", notes.len());

        let mut classified = Vec::with_capacity(notes.len());
        for note in notes {
            let reply =
                ask(llm.as_ref(), CLASSIFIER_MODEL, CLASSIFIER_PROMPT, &note.contents).await?;
            let category = NoteCategory::from_reply(&reply);
            debug!("{} -> {:?}", note.file_name, category);
            classified.push((note.file_name, category));
        }

        let answer = CategorizedNotes::from_classified(classified);
        info!("People: {:?}; hardware: {:?}", answer.people, answer.hardware);

        serde_json::to_value(answer)
            .map_err(|e| DomainError::serialization(format!("categories: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kind_of(name: &str) -> Option<NoteKind> {
        NoteKind::of(&ArchiveEntry {
            name: name.to_string(),
            data: Vec::new(),
        })
    }

    #[test]
    fn kind_follows_extension() {
        assert_eq!(kind_of("2024-11-12_report-00-sektor_C4.txt"), Some(NoteKind::Text));
        assert_eq!(kind_of("2024-11-12_report-10-sektor-C1.MP3"), Some(NoteKind::Audio));
        assert_eq!(kind_of("2024-11-12_report-13.png"), Some(NoteKind::Image));
        assert_eq!(kind_of("weapons_tests.zip"), None);
        assert_eq!(kind_of("facts.txt/readme"), None);
    }

    #[test]
    fn filter_skips_fact_files() {
        let filter = note_filter();
        assert!(filter.accepts("report-01.txt"));
        assert!(!filter.accepts("facts/f01.txt"));
        assert!(!filter.accepts("weapons_tests.zip"));
    }

    #[test]
    fn answer_lists_are_sorted_and_drop_irrelevant() {
        let answer = CategorizedNotes::from_classified(vec![
            ("c.txt".to_string(), NoteCategory::People),
            ("a.mp3".to_string(), NoteCategory::People),
            ("b.png".to_string(), NoteCategory::Hardware),
            ("d.txt".to_string(), NoteCategory::Irrelevant),
        ]);

        assert_eq!(
            serde_json::to_string(&answer).unwrap(),
            r#"{"people":["a.mp3","c.txt"],"hardware":["b.png"]}"#
        );
    }

    #[test]
    fn notes_cache_with_camel_case_file_name() {
        let note = Note {
            file_name: "a.txt".to_string(),
            contents: "x".to_string(),
        };
        assert_eq!(
            serde_json::to_string(&note).unwrap(),
            r#"{"fileName":"a.txt","contents":"x"}"#
        );
    }
}
