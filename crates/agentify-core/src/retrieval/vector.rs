//! Vector retrieval over a pre-built similarity index

use super::{ContextSource, DocumentSource, RetrievedDocument};
use crate::config::VectorIndexConfig;
use crate::error::{AgentifyError, Result};
use crate::llm::Embedder;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

/// Nearest-neighbor lookup against a populated index
#[async_trait]
pub trait VectorIndex: Send + Sync {
    /// Return up to `top_k` documents, most similar first
    async fn query(&self, vector: &[f32], top_k: usize) -> Result<Vec<RetrievedDocument>>;
}

/// Client for a Pinecone serverless index data plane
pub struct PineconeIndex {
    http_client: reqwest::Client,
    host: String,
    api_key: String,
    namespace: Option<String>,
    text_field: String,
}

const PINECONE_API_VERSION: &str = "2024-07";

impl PineconeIndex {
    pub fn new(
        host: &str,
        api_key: impl Into<String>,
        namespace: Option<String>,
        text_field: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .user_agent(concat!("agentify/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()?;

        // Consoles display the host without a scheme
        let host = if host.starts_with("http://") || host.starts_with("https://") {
            host.trim_end_matches('/').to_string()
        } else {
            format!("https://{}", host.trim_end_matches('/'))
        };

        Ok(Self {
            http_client,
            host,
            api_key: api_key.into(),
            namespace,
            text_field: text_field.into(),
        })
    }

    pub fn from_config(config: &VectorIndexConfig) -> Result<Self> {
        let host = config
            .host
            .as_deref()
            .ok_or_else(|| AgentifyError::Config("vector_index.host is not set".to_string()))?;
        let api_key = config
            .api_key
            .clone()
            .ok_or_else(|| AgentifyError::Config("vector_index.api_key is not set".to_string()))?;

        Self::new(
            host,
            api_key,
            config.namespace.clone(),
            &config.text_field,
            Duration::from_secs(config.timeout_secs),
        )
    }
}

#[async_trait]
impl VectorIndex for PineconeIndex {
    async fn query(&self, vector: &[f32], top_k: usize) -> Result<Vec<RetrievedDocument>> {
        #[derive(Serialize)]
        #[serde(rename_all = "camelCase")]
        struct QueryRequest<'a> {
            vector: &'a [f32],
            top_k: usize,
            include_metadata: bool,
            include_values: bool,
            #[serde(skip_serializing_if = "Option::is_none")]
            namespace: Option<&'a str>,
        }

        #[derive(Deserialize)]
        struct QueryResponse {
            #[serde(default)]
            matches: Vec<QueryMatch>,
        }

        #[derive(Deserialize)]
        struct QueryMatch {
            id: String,
            #[serde(default)]
            score: Option<f32>,
            #[serde(default)]
            metadata: Option<serde_json::Map<String, serde_json::Value>>,
        }

        let request = QueryRequest {
            vector,
            top_k,
            include_metadata: true,
            include_values: false,
            namespace: self.namespace.as_deref(),
        };

        let response = self
            .http_client
            .post(format!("{}/query", self.host))
            .header("Api-Key", &self.api_key)
            .header("X-Pinecone-API-Version", PINECONE_API_VERSION)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AgentifyError::ExternalError(format!(
                "Vector index error (HTTP {}): {}",
                status, body
            )));
        }

        let query_response: QueryResponse = response.json().await?;

        let mut documents = Vec::with_capacity(query_response.matches.len());
        for m in query_response.matches {
            let text = m
                .metadata
                .as_ref()
                .and_then(|meta| meta.get(&self.text_field))
                .and_then(|v| v.as_str());

            match text {
                Some(text) => documents.push(RetrievedDocument::from_index(text, m.score)),
                None => tracing::warn!(
                    id = %m.id,
                    field = %self.text_field,
                    "Index match has no text metadata, skipping"
                ),
            }
        }

        Ok(documents)
    }
}

/// Embeds the question and queries the index
pub struct VectorRetriever {
    embedder: Arc<dyn Embedder>,
    index: Arc<dyn VectorIndex>,
    top_k: usize,
}

impl VectorRetriever {
    pub fn new(embedder: Arc<dyn Embedder>, index: Arc<dyn VectorIndex>, top_k: usize) -> Self {
        Self {
            embedder,
            index,
            top_k,
        }
    }

    /// Embed `query` and return up to `k` documents by descending similarity
    pub async fn search(&self, query: &str, k: usize) -> Result<Vec<RetrievedDocument>> {
        let embedding = self.embedder.embed(query).await.map_err(|e| {
            AgentifyError::Retrieval(format!(
                "embedding with {} failed: {}",
                self.embedder.model_name(),
                e
            ))
        })?;

        let mut documents = self
            .index
            .query(&embedding, k)
            .await
            .map_err(|e| AgentifyError::Retrieval(format!("vector index query failed: {}", e)))?;

        // Index order is kept; only the length is enforced
        documents.truncate(k);
        Ok(documents)
    }
}

#[async_trait]
impl ContextSource for VectorRetriever {
    fn name(&self) -> &str {
        "vector_index"
    }

    fn source(&self) -> DocumentSource {
        DocumentSource::VectorIndex
    }

    fn may_fail(&self) -> bool {
        false
    }

    async fn retrieve(&self, question: &str) -> Result<Vec<RetrievedDocument>> {
        self.search(question, self.top_k).await
    }
}
