//! HTTP-based embedder using external embedding service

use super::{Embedder, LLMClient, OpenAICompatClient};
use crate::config::EmbeddingConfig;
use crate::error::{AgentifyError, Result};
use async_trait::async_trait;
use std::sync::Arc;

/// Embedder that uses external HTTP service
pub struct HttpEmbedder {
    client: Arc<dyn LLMClient>,
    dimensions: usize,
}

impl HttpEmbedder {
    /// Create from LLM client
    pub fn new(client: Arc<dyn LLMClient>, dimensions: usize) -> Self {
        Self { client, dimensions }
    }

    /// Create from configuration
    pub fn from_config(config: &EmbeddingConfig) -> Result<Self> {
        let client = OpenAICompatClient::for_embeddings(config)?;
        Ok(Self::new(Arc::new(client), config.dimensions))
    }
}

#[async_trait]
impl Embedder for HttpEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let vector = self.client.embed(text).await?;

        // Index queries must match the configured dimensionality
        if vector.len() != self.dimensions {
            return Err(AgentifyError::ExternalError(format!(
                "expected {}-dimensional embedding from {}, got {}",
                self.dimensions,
                self.client.model_name(),
                vector.len()
            )));
        }
        Ok(vector)
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn model_name(&self) -> &str {
        self.client.model_name()
    }
}
