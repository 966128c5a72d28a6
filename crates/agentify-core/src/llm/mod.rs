//! LLM integration
//!
//! Provides traits and HTTP implementations for:
//! - Embedding generation via external services (TEI, OpenAI, etc.)
//! - Answer generation via chat completions (Gemini, vLLM, etc.)

mod client;
mod http_embedder;
mod http_generator;
mod traits;

pub use client::{ChatMessage, LLMClient, OpenAICompatClient};
pub use http_embedder::HttpEmbedder;
pub use http_generator::HttpGenerator;
pub use traits::*;
