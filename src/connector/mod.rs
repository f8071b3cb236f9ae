//! # Connector Layer
//!
//! External integrations implementing application interfaces:
//! - Hosted and local model clients (OpenAI, Ollama)
//! - Vector storage (Qdrant) and caching (Redis, in-memory)
//! - Page scraping, grading submission and plain HTTP inputs
//! - Service wiring and command routing for the CLI

pub mod adapter;
pub mod api;

pub use adapter::*;
pub use api::*;
