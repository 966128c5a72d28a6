//! Live web search used to augment the private corpus

use super::{ContextSource, DocumentSource, RetrievedDocument};
use crate::config::WebSearchConfig;
use crate::error::{AgentifyError, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

/// One ranked search hit
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct WebSnippet {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub score: Option<f32>,
}

/// Search provider capability
#[async_trait]
pub trait WebSearch: Send + Sync {
    /// Return up to `max_results` snippets in provider-ranked order. Zero
    /// hits is an empty vector, not an error.
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<WebSnippet>>;
}

/// Tavily search API client
pub struct TavilySearch {
    http_client: reqwest::Client,
    base_url: String,
    api_key: String,
    search_depth: String,
}

impl TavilySearch {
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        search_depth: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .user_agent(concat!("agentify/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()?;

        Ok(Self {
            http_client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            search_depth: search_depth.into(),
        })
    }

    pub fn from_config(config: &WebSearchConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .ok_or_else(|| AgentifyError::Config("web_search.api_key is not set".to_string()))?;

        Self::new(
            &config.url,
            api_key,
            &config.search_depth,
            Duration::from_secs(config.timeout_secs),
        )
    }
}

#[async_trait]
impl WebSearch for TavilySearch {
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<WebSnippet>> {
        #[derive(Serialize)]
        struct SearchRequest<'a> {
            query: &'a str,
            max_results: usize,
            search_depth: &'a str,
        }

        #[derive(Deserialize)]
        struct SearchResponse {
            #[serde(default)]
            results: Vec<WebSnippet>,
        }

        let request = SearchRequest {
            query,
            max_results,
            search_depth: &self.search_depth,
        };

        let response = self
            .http_client
            .post(format!("{}/search", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AgentifyError::ExternalError(format!(
                "Web search error (HTTP {}): {}",
                status, body
            )));
        }

        let search_response: SearchResponse = response.json().await?;

        Ok(search_response
            .results
            .into_iter()
            .filter(|r| !r.content.trim().is_empty())
            .take(max_results)
            .collect())
    }
}

/// Prefixes the question and runs a web search
pub struct WebRetriever {
    search: Arc<dyn WebSearch>,
    query_prefix: String,
    max_results: usize,
}

impl WebRetriever {
    pub fn new(
        search: Arc<dyn WebSearch>,
        query_prefix: impl Into<String>,
        max_results: usize,
    ) -> Self {
        Self {
            search,
            query_prefix: query_prefix.into(),
            max_results,
        }
    }

    /// Prefix and question are concatenated verbatim
    pub fn build_query(&self, question: &str) -> String {
        format!("{}{}", self.query_prefix, question)
    }
}

#[async_trait]
impl ContextSource for WebRetriever {
    fn name(&self) -> &str {
        "web_search"
    }

    fn source(&self) -> DocumentSource {
        DocumentSource::WebSearch
    }

    fn may_fail(&self) -> bool {
        true
    }

    async fn retrieve(&self, question: &str) -> Result<Vec<RetrievedDocument>> {
        let query = self.build_query(question);
        let snippets = self
            .search
            .search(&query, self.max_results)
            .await
            .map_err(|e| AgentifyError::WebSearch(e.to_string()))?;

        Ok(snippets
            .into_iter()
            .take(self.max_results)
            .map(|s| RetrievedDocument::from_web(s.content, s.score))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn tavily(server: &MockServer) -> TavilySearch {
        TavilySearch::new(server.uri(), "tv-key", "basic", Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn test_query_prefix_is_verbatim() {
        let retriever = WebRetriever::new(
            Arc::new(
                TavilySearch::new("http://localhost", "k", "basic", Duration::from_secs(1))
                    .unwrap(),
            ),
            "HDFC",
            2,
        );
        assert_eq!(
            retriever.build_query("Which card has no annual fee?"),
            "HDFCWhich card has no annual fee?"
        );
    }

    #[tokio::test]
    async fn test_search_returns_ranked_snippets() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/search"))
            .and(header("authorization", "Bearer tv-key"))
            .and(body_partial_json(serde_json::json!({
                "query": "HDFC savings",
                "max_results": 2
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "query": "HDFC savings",
                "results": [
                    {"title": "A", "url": "https://a.example", "content": "first", "score": 0.9},
                    {"title": "B", "url": "https://b.example", "content": "", "score": 0.8},
                    {"title": "C", "url": "https://c.example", "content": "second", "score": 0.7},
                    {"title": "D", "url": "https://d.example", "content": "third", "score": 0.6}
                ]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let snippets = tavily(&server).search("HDFC savings", 2).await.unwrap();
        let contents: Vec<&str> = snippets.iter().map(|s| s.content.as_str()).collect();
        assert_eq!(contents, vec!["first", "second"]);
    }

    #[tokio::test]
    async fn test_zero_results_is_empty() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/search"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({ "results": [] })),
            )
            .mount(&server)
            .await;

        let snippets = tavily(&server).search("nothing", 2).await.unwrap();
        assert!(snippets.is_empty());
    }

    #[tokio::test]
    async fn test_retriever_marks_failures_as_web_search() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/search"))
            .respond_with(ResponseTemplate::new(429).set_body_string("rate limited"))
            .mount(&server)
            .await;

        let retriever = WebRetriever::new(Arc::new(tavily(&server)), "HDFC", 2);
        assert!(retriever.may_fail());

        let err = retriever.retrieve("question").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::WebSearch);
        assert!(err.to_string().contains("429"));
    }
}
