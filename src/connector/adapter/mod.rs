mod direct_submitter;
mod firecrawl_scraper;
mod http_source;
pub(crate) mod http_transport;
mod in_memory_cache;
mod llama_client;
mod openai_client;
mod qdrant_store;
mod redis_cache;
mod report_submitter;
mod zip_archive;

pub use direct_submitter::*;
pub use firecrawl_scraper::*;
pub use http_source::*;
pub use in_memory_cache::*;
pub use llama_client::*;
pub use openai_client::*;
pub use qdrant_store::*;
pub use redis_cache::*;
pub use report_submitter::*;
pub use zip_archive::*;
