use async_trait::async_trait;
use futures_util::future::try_join_all;
use serde_json::Value;
use tracing::info;

use crate::application::{ask, read_through, Container, Task, Transcriber, DEFAULT_CACHE_TTL};
use crate::connector::{read_entries, AppConfig, HttpSource};
use crate::domain::DomainError;

const CACHE_KEY: &str = "interrogations";
const TRANSCRIPTION_MODEL: &str = "whisper-1";
const RECORDING_FORMAT: &str = "m4a";
const DEDUCTION_MODEL: &str = "gpt-4o";
const EXTRACTION_MODEL: &str = "gpt-3.5-turbo";

const DETECTIVE_PROMPT: &str = "Jestem detektywem, prowadzę dochodzenie w sprawie Andrzeja Maja.\nAnalizuję fakty krok po kroku, używam dedukcji, żeby wyciągnąć wnioski.";
const ADDRESS_QUESTION: &str = "Wywnioskuj z treści przesłuchań na jakiej uczelni pracował Andrzej Maj, a potem daj mi adres wydziału tej uczelni, w którym pracował. Zwróć tylko adres, nic więcej.";
const STREET_PROMPT: &str = "Wyciągam nazwę ulicy z adresu. Zwracam tylko i wyłącznie nazwę ulicy.";

/// Deduces a street name from transcribed witness interrogations.
pub struct InterrogationsTask {
    source: HttpSource,
    archive_url: String,
}

impl InterrogationsTask {
    pub fn from_config(config: &AppConfig) -> Result<Self, DomainError> {
        let archive_url = config
            .interrogations_url
            .clone()
            .ok_or_else(|| DomainError::configuration("S02E01_URL is not set"))?;
        Ok(Self {
            source: config.http_source()?,
            archive_url,
        })
    }

    async fn transcribe_archive(&self, container: &Container) -> Result<String, DomainError> {
        let llm = container.llm()?;

        let archive = self.source.fetch_bytes(&self.archive_url).await?;
        let recordings = read_entries(&archive)?;
        info!("Transcribing {} recordings", recordings.len());

        let transcripts = try_join_all(recordings.into_iter().map(|recording| {
            let llm = llm.clone();
            async move {
                info!("Transcribing {}", recording.name);
                llm.transcribe(recording.data, TRANSCRIPTION_MODEL, RECORDING_FORMAT)
                    .await
            }
        }))
        .await?;

        Ok(transcripts.join("\n"))
    }
}

pub fn detective_context(transcripts: &str) -> String {
    format!("{DETECTIVE_PROMPT}\n\nTreści przesłuchań świadków:\n{transcripts}")
}

#[async_trait]
impl Task for InterrogationsTask {
    fn name(&self) -> &str {
        "mp3"
    }

    async fn solve(&self, container: &Container) -> Result<Value, DomainError> {
        let cache = container.cache()?;
        let llm = container.llm()?;

        let transcripts = read_through(cache.as_ref(), CACHE_KEY, DEFAULT_CACHE_TTL, || {
            self.transcribe_archive(container)
        })
        .await?;

        let address = ask(
            llm.as_ref(),
            DEDUCTION_MODEL,
            &detective_context(&transcripts),
            ADDRESS_QUESTION,
        )
        .await?;
        info!("Deduced address: {}", address);

        let street = ask(llm.as_ref(), EXTRACTION_MODEL, STREET_PROMPT, &address).await?;
        Ok(Value::String(street))
    }
}
