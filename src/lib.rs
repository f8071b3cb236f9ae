pub mod application;
pub mod cli;
pub mod connector;
pub mod domain;
pub mod tasks;

pub use cli::Commands;

pub use application::{
    AnswerSubmitter, CacheStore, ChatClient, Container, EmbeddingService, ImageChatClient,
    ImageGenerator, LlmProvider, Moderator, PageScraper, RunTaskUseCase, ServiceFactories,
    ServiceHandle, Task, TaskOutcome, Transcriber, VectorStore,
};

pub use connector::{
    build_container, default_factories, AppConfig, FirecrawlScraper, HttpSource, InMemoryCache,
    LlamaClient, OpenAiClient, QdrantStore, RedisCache, ReportSubmitter, Router,
};

pub use domain::{
    AnswerEnvelope, ChatMessage, CompletionRequest, CompletionResult, DomainError, Role,
    ServiceKey,
};
