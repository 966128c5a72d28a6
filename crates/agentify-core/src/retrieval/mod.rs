//! Retrieval sources feeding the answer context
//!
//! Two sources exist:
//! - Vector retrieval over the private knowledge corpus (must succeed)
//! - Live web search (best effort)
//!
//! Both implement [`ContextSource`]; the pipeline decides how to treat a
//! failure from [`ContextSource::may_fail`].

mod vector;
mod web;

pub use vector::{PineconeIndex, VectorIndex, VectorRetriever};
pub use web::{TavilySearch, WebRetriever, WebSearch, WebSnippet};

use crate::error::Result;
use async_trait::async_trait;
use serde::Serialize;
use std::fmt;

/// Where a retrieved passage came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentSource {
    VectorIndex,
    WebSearch,
}

impl fmt::Display for DocumentSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::VectorIndex => f.write_str("vector_index"),
            Self::WebSearch => f.write_str("web_search"),
        }
    }
}

/// A passage retrieved for one request
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RetrievedDocument {
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f32>,
    pub source: DocumentSource,
}

impl RetrievedDocument {
    pub fn from_index(content: impl Into<String>, score: Option<f32>) -> Self {
        Self {
            content: content.into(),
            score,
            source: DocumentSource::VectorIndex,
        }
    }

    pub fn from_web(content: impl Into<String>, score: Option<f32>) -> Self {
        Self {
            content: content.into(),
            score,
            source: DocumentSource::WebSearch,
        }
    }
}

/// A capability that turns a question into ranked passages
#[async_trait]
pub trait ContextSource: Send + Sync {
    /// Name used in logs
    fn name(&self) -> &str;

    /// Context slot this source fills
    fn source(&self) -> DocumentSource;

    /// Whether an answer may still be produced when this source fails
    fn may_fail(&self) -> bool;

    /// Retrieve passages for the user's question, best first
    async fn retrieve(&self, question: &str) -> Result<Vec<RetrievedDocument>>;
}
