use std::collections::BTreeMap;

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use tracing::{debug, info};

use super::html::{attribute, inner_text};
use crate::application::{
    converse, read_through, CacheStore, Container, ImageChatClient, LlmProvider, Task,
    Transcriber, DEFAULT_CACHE_TTL,
};
use crate::connector::{AppConfig, HttpSource};
use crate::domain::{ChatMessage, ContentPart, DomainError, ImageChatMessage};

const TRANSCRIPTION_MODEL: &str = "whisper-1";
const VISION_MODEL: &str = "gpt-4o";
const ANSWER_MODEL: &str = "gpt-4-turbo";
const DESCRIBE_PROMPT: &str =
    "I describe what's on the image. I include the city name of where the photo it was taken, if I can.";
const ANSWER_STYLE_PROMPT: &str = "I always answer with one sentence.";

static ELEMENT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?is)<h2\b[^>]*>(?P<h2>.*?)</h2>|<figure\b[^>]*>(?P<figure>.*?)</figure>|<p\b[^>]*>(?P<p>.*?)</p>|(?P<a><a\b[^>]*>)",
    )
    .expect("Invalid regex")
});
static IMG: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?is)<img\b[^>]*>").expect("Invalid regex"));
static FIGCAPTION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)<figcaption\b[^>]*>(.*?)</figcaption>").expect("Invalid regex")
});
static LINK: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?is)<a\b[^>]*>").expect("Invalid regex"));

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Figure {
    pub src: String,
    pub caption: String,
}

/// Everything under one `h2` heading, in page order per kind.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Section {
    pub title: String,
    pub paragraphs: Vec<String>,
    pub figures: Vec<Figure>,
    pub audio: Vec<String>,
}

fn audio_href(tag: &str) -> Option<String> {
    attribute(tag, "href").filter(|href| href.contains(".mp3"))
}

/// Splits an article into sections. Content before the first `h2` is ignored.
pub fn parse_article(html: &str) -> Vec<Section> {
    let mut sections: Vec<Section> = Vec::new();

    for element in ELEMENT.captures_iter(html) {
        if let Some(title) = element.name("h2") {
            sections.push(Section {
                title: inner_text(title.as_str()),
                ..Section::default()
            });
            continue;
        }

        let Some(section) = sections.last_mut() else {
            continue;
        };

        if let Some(figure) = element.name("figure") {
            let figure = figure.as_str();
            let src = IMG
                .find(figure)
                .and_then(|img| attribute(img.as_str(), "src"))
                .unwrap_or_default();
            let caption = FIGCAPTION
                .captures(figure)
                .map(|c| inner_text(&c[1]))
                .unwrap_or_default();
            section.figures.push(Figure { src, caption });
        } else if let Some(paragraph) = element.name("p") {
            let paragraph = paragraph.as_str();
            section.paragraphs.push(inner_text(paragraph));
            section
                .audio
                .extend(LINK.find_iter(paragraph).filter_map(|a| audio_href(a.as_str())));
        } else if let Some(link) = element.name("a") {
            section.audio.extend(audio_href(link.as_str()));
        }
    }

    sections
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleQuestion {
    pub index: u32,
    pub text: String,
}

impl ArticleQuestion {
    /// Answer key, zero-padded to two digits.
    pub fn key(&self) -> String {
        format!("{:02}", self.index)
    }
}

/// Reads `NN=question` lines. Lines without exactly one `=` are skipped.
pub fn parse_questions(text: &str) -> Result<Vec<ArticleQuestion>, DomainError> {
    let mut questions = Vec::new();
    for line in text.lines() {
        let parts: Vec<&str> = line.split('=').collect();
        let [index, question] = parts.as_slice() else {
            continue;
        };

        let index = index.trim().parse::<u32>().map_err(|e| {
            DomainError::invalid_input(format!("bad question number in '{line}': {e}"))
        })?;
        questions.push(ArticleQuestion {
            index,
            text: question.trim().to_string(),
        });
    }
    Ok(questions)
}

/// Title, paragraphs, transcripts and image descriptions, one per line.
pub fn section_text(section: &Section, transcripts: &[String], descriptions: &[String]) -> String {
    std::iter::once(section.title.as_str())
        .chain(section.paragraphs.iter().map(String::as_str))
        .chain(transcripts.iter().map(String::as_str))
        .chain(descriptions.iter().map(String::as_str))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Answers questions about an article whose facts are partly in its
/// recordings and figures.
pub struct ArxivTask {
    source: HttpSource,
    article_url: String,
    questions_url: String,
    media_base: String,
}

impl ArxivTask {
    pub fn from_config(config: &AppConfig) -> Result<Self, DomainError> {
        let media_base = format!("{}/dane", config.centrala()?);
        Ok(Self {
            source: config.http_source()?,
            article_url: format!("{media_base}/arxiv-draft.html"),
            questions_url: config.data_url("arxiv.txt")?,
            media_base,
        })
    }

    fn media_url(&self, src: &str) -> String {
        format!("{}/{}", self.media_base, src.trim_start_matches('/'))
    }

    async fn transcribe(
        &self,
        llm: &dyn LlmProvider,
        cache: &dyn CacheStore,
        src: &str,
    ) -> Result<String, DomainError> {
        let url = self.media_url(src);
        read_through(cache, &url, DEFAULT_CACHE_TTL, || async {
            let audio = self.source.fetch_bytes(&url).await?;
            llm.transcribe(audio, TRANSCRIPTION_MODEL, "mp3").await
        })
        .await
    }

    async fn describe(
        &self,
        llm: &dyn LlmProvider,
        cache: &dyn CacheStore,
        figure: &Figure,
    ) -> Result<String, DomainError> {
        let url = self.media_url(&figure.src);
        read_through(cache, &url, DEFAULT_CACHE_TTL, || async {
            let image = self.source.fetch_bytes(&url).await?;
            let messages = vec![
                ImageChatMessage::system(DESCRIBE_PROMPT),
                ImageChatMessage::user(vec![
                    ContentPart::png(&image),
                    ContentPart::text(figure.caption.clone()),
                ]),
            ];
            llm.complete_images_short(messages, VISION_MODEL)
                .await?
                .into_first_content()
        })
        .await
    }

    async fn article_context(
        &self,
        llm: &dyn LlmProvider,
        cache: &dyn CacheStore,
    ) -> Result<String, DomainError> {
        let html = self.source.fetch_text(&self.article_url).await?;
        let sections = parse_article(&html);
        info!("Article has {} sections", sections.len());

        let mut texts = Vec::with_capacity(sections.len());
        for section in &sections {
            debug!(
                "Section '{}': {} paragraphs, {} recordings, {} figures",
                section.title,
                section.paragraphs.len(),
                section.audio.len(),
                section.figures.len()
            );

            let mut transcripts = Vec::with_capacity(section.audio.len());
            for src in &section.audio {
                transcripts.push(self.transcribe(llm, cache, src).await?);
            }

            let mut descriptions = Vec::with_capacity(section.figures.len());
            for figure in &section.figures {
                descriptions.push(self.describe(llm, cache, figure).await?);
            }

            texts.push(section_text(section, &transcripts, &descriptions));
        }

        Ok(texts.join("\n\n"))
    }
}

#[async_trait]
impl Task for ArxivTask {
    fn name(&self) -> &str {
        "arxiv"
    }

    async fn solve(&self, container: &Container) -> Result<Value, DomainError> {
        let cache = container.cache()?;
        let llm = container.llm()?;

        let context = self.article_context(llm.as_ref(), cache.as_ref()).await?;
        let questions = parse_questions(&self.source.fetch_text(&self.questions_url).await?)?;

        let mut answers = BTreeMap::new();
        for question in &questions {
            let messages = vec![
                ChatMessage::system(context.as_str()),
                ChatMessage::system(ANSWER_STYLE_PROMPT),
                ChatMessage::user(question.text.as_str()),
            ];
            let answer = converse(llm.as_ref(), ANSWER_MODEL, messages).await?;
            info!("{}: {} -> {}", question.key(), question.text, answer);
            answers.insert(question.key(), answer);
        }

        serde_json::to_value(answers)
            .map_err(|e| DomainError::serialization(format!("arxiv answers: {e}")))
    }
}
