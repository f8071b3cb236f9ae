mod answer_submitter;
mod cache_store;
mod chat_client;
mod embedding_service;
mod image_generator;
mod llm_provider;
mod moderator;
mod page_scraper;
mod transcriber;
mod vector_store;

pub use answer_submitter::*;
pub use cache_store::*;
pub use chat_client::*;
pub use embedding_service::*;
pub use image_generator::*;
pub use llm_provider::*;
pub use moderator::*;
pub use page_scraper::*;
pub use transcriber::*;
pub use vector_store::*;
