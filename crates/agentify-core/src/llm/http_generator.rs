//! Chat-completion backed generator

use super::{ChatMessage, Generator, LLMClient, OpenAICompatClient};
use crate::config::GenerationConfig;
use crate::error::{AgentifyError, Result};
use async_trait::async_trait;
use std::sync::Arc;

/// Generator that sends the whole prompt as a single user message
pub struct HttpGenerator {
    client: Arc<dyn LLMClient>,
}

impl HttpGenerator {
    /// Create from LLM client
    pub fn new(client: Arc<dyn LLMClient>) -> Self {
        Self { client }
    }

    /// Create from configuration
    pub fn from_config(config: &GenerationConfig) -> Result<Self> {
        let client = OpenAICompatClient::for_generation(config)?;
        Ok(Self::new(Arc::new(client)))
    }
}

#[async_trait]
impl Generator for HttpGenerator {
    async fn generate(&self, prompt: &str) -> Result<String> {
        let content = self
            .client
            .chat_completion(vec![ChatMessage::user(prompt)])
            .await?;

        if content.trim().is_empty() {
            return Err(AgentifyError::ExternalError(format!(
                "{} returned an empty completion",
                self.client.model_name()
            )));
        }
        Ok(content)
    }

    fn model_name(&self) -> &str {
        self.client.model_name()
    }
}
