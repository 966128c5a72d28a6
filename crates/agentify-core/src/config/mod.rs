//! Configuration management
//!
//! Settings are read once at startup from `config.yml` and overlaid with
//! environment variables. The resulting [`Config`] is immutable and handed
//! by reference to every client and pipeline built from it.

use crate::error::{AgentifyError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable pointing at an explicit config file
pub const CONFIG_PATH_ENV: &str = "AGENTIFY_CONFIG";

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Embedding service used to vectorize questions
    pub embedding: EmbeddingConfig,

    /// Pre-built similarity index holding the knowledge corpus
    pub vector_index: VectorIndexConfig,

    /// Live web search provider
    pub web_search: WebSearchConfig,

    /// Generative model that writes the answer
    pub generation: GenerationConfig,

    /// Market data provider for stock analysis
    pub market_data: MarketDataConfig,

    /// Hosted loan approval model
    pub loan_model: LoanModelConfig,

    /// Answer pipeline tuning
    pub pipeline: PipelineConfig,
}

/// OpenAI-compatible embeddings endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    /// Base URL; requests go to `{url}/embeddings`
    pub url: String,
    pub model: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    pub dimensions: usize,
    pub timeout_secs: u64,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:8080/v1".to_string(),
            model: "sentence-transformers/all-MiniLM-L12-v2".to_string(),
            api_key: None,
            dimensions: 384,
            timeout_secs: default_timeout(),
        }
    }
}

/// Pinecone-style vector index
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VectorIndexConfig {
    /// Index host, e.g. `https://multiagentic-abc123.svc.pinecone.io`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    /// Metadata field holding the passage text
    pub text_field: String,
    pub timeout_secs: u64,
}

impl Default for VectorIndexConfig {
    fn default() -> Self {
        Self {
            host: None,
            api_key: None,
            namespace: None,
            text_field: "text".to_string(),
            timeout_secs: default_timeout(),
        }
    }
}

/// Tavily-style web search
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WebSearchConfig {
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    pub search_depth: String,
    pub timeout_secs: u64,
}

impl Default for WebSearchConfig {
    fn default() -> Self {
        Self {
            url: "https://api.tavily.com".to_string(),
            api_key: None,
            search_depth: "basic".to_string(),
            timeout_secs: default_timeout(),
        }
    }
}

/// OpenAI-compatible chat completions endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// Base URL; requests go to `{url}/chat/completions`
    pub url: String,
    pub model: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    pub temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    pub timeout_secs: u64,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            url: "https://generativelanguage.googleapis.com/v1beta/openai".to_string(),
            model: "gemini-pro".to_string(),
            api_key: None,
            temperature: 0.7,
            max_tokens: None,
            timeout_secs: 60,
        }
    }
}

/// Alpha Vantage market data
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MarketDataConfig {
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Listing CSV used to resolve company names to ticker symbols
    pub listing_path: PathBuf,
    pub timeout_secs: u64,
}

impl Default for MarketDataConfig {
    fn default() -> Self {
        Self {
            url: "https://www.alphavantage.co".to_string(),
            api_key: None,
            listing_path: PathBuf::from("listing_status.csv"),
            timeout_secs: default_timeout(),
        }
    }
}

/// Model-serving endpoint for loan approval predictions
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoanModelConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    pub timeout_secs: u64,
}

impl Default for LoanModelConfig {
    fn default() -> Self {
        Self {
            url: None,
            api_key: None,
            timeout_secs: default_timeout(),
        }
    }
}

/// Answer pipeline settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Passages requested from the vector index
    pub top_k: usize,
    /// Snippets requested from web search
    pub web_max_results: usize,
    /// Prepended verbatim to the question before web search
    pub web_query_prefix: String,
    /// Upper bound for each external call
    pub step_timeout_secs: u64,
    /// Optional cap on assembled context length, in characters
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_context_chars: Option<usize>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            top_k: 5,
            web_max_results: 2,
            web_query_prefix: "HDFC".to_string(),
            step_timeout_secs: 30,
            max_context_chars: None,
        }
    }
}

impl PipelineConfig {
    pub fn step_timeout(&self) -> Duration {
        Duration::from_secs(self.step_timeout_secs)
    }
}

fn default_timeout() -> u64 {
    30
}

impl Config {
    /// Load config from `AGENTIFY_CONFIG` or the default path, then apply
    /// environment overrides
    pub fn load() -> Result<Self> {
        let mut config = match std::env::var(CONFIG_PATH_ENV) {
            Ok(path) => Self::from_file(Path::new(&path))?,
            Err(_) => {
                let path = Self::default_path();
                if path.exists() {
                    Self::from_file(&path)?
                } else {
                    Config::default()
                }
            }
        };
        config.apply_env();
        Ok(config)
    }

    /// Read a YAML config file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            AgentifyError::Config(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::from_yaml_str(&content)
    }

    /// Parse YAML; an empty document yields defaults
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Config::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }

    /// Get default config path
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(crate::CONFIG_DIR_NAME)
            .join("config.yml")
    }

    /// Overlay values from the process environment
    pub fn apply_env(&mut self) {
        self.apply_env_with(|key| std::env::var(key).ok());
    }

    /// Overlay values from an arbitrary variable lookup. Blank values are
    /// ignored.
    pub fn apply_env_with<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(v) = var("AGENTIFY_EMBEDDING_URL") {
            self.embedding.url = v;
        }
        if let Some(v) = var("AGENTIFY_EMBEDDING_MODEL") {
            self.embedding.model = v;
        }
        if let Some(v) = var("AGENTIFY_EMBEDDING_API_KEY") {
            self.embedding.api_key = Some(v);
        }
        if let Some(v) = var("AGENTIFY_EMBEDDING_DIMS").and_then(|s| s.parse().ok()) {
            self.embedding.dimensions = v;
        }

        if let Some(v) = var("AGENTIFY_PINECONE_HOST") {
            self.vector_index.host = Some(v);
        }
        if let Some(v) = var("PINECONE_API_KEY") {
            self.vector_index.api_key = Some(v);
        }
        if let Some(v) = var("AGENTIFY_PINECONE_NAMESPACE") {
            self.vector_index.namespace = Some(v);
        }

        if let Some(v) = var("AGENTIFY_WEB_SEARCH_URL") {
            self.web_search.url = v;
        }
        if let Some(v) = var("TAVILY_API_KEY") {
            self.web_search.api_key = Some(v);
        }

        if let Some(v) = var("AGENTIFY_GENERATION_URL") {
            self.generation.url = v;
        }
        if let Some(v) = var("AGENTIFY_GENERATION_MODEL") {
            self.generation.model = v;
        }
        if let Some(v) = var("GOOGLE_API_KEY") {
            self.generation.api_key = Some(v);
        }

        if let Some(v) = var("AGENTIFY_MARKET_DATA_URL") {
            self.market_data.url = v;
        }
        if let Some(v) = var("ALPHA_VANTAGE_API_KEY") {
            self.market_data.api_key = Some(v);
        }
        if let Some(v) = var("AGENTIFY_LISTING_PATH") {
            self.market_data.listing_path = PathBuf::from(v);
        }

        if let Some(v) = var("AGENTIFY_LOAN_MODEL_URL") {
            self.loan_model.url = Some(v);
        }
        if let Some(v) = var("AGENTIFY_LOAN_MODEL_API_KEY") {
            self.loan_model.api_key = Some(v);
        }

        if let Some(v) = var("AGENTIFY_TOP_K").and_then(|s| s.parse().ok()) {
            self.pipeline.top_k = v;
        }
        if let Some(v) = var("AGENTIFY_STEP_TIMEOUT_SECS").and_then(|s| s.parse().ok()) {
            self.pipeline.step_timeout_secs = v;
        }
        if let Some(v) = var("AGENTIFY_MAX_CONTEXT_CHARS").and_then(|s| s.parse().ok()) {
            self.pipeline.max_context_chars = Some(v);
        }
    }

    /// Check every setting the answer pipeline needs. All missing settings
    /// are reported together.
    pub fn validate_for_answering(&self) -> Result<()> {
        let mut missing = Vec::new();
        require(
            &mut missing,
            Some(&self.embedding.url),
            "embedding.url (AGENTIFY_EMBEDDING_URL)",
        );
        require(
            &mut missing,
            Some(&self.embedding.model),
            "embedding.model (AGENTIFY_EMBEDDING_MODEL)",
        );
        require(
            &mut missing,
            self.vector_index.host.as_ref(),
            "vector_index.host (AGENTIFY_PINECONE_HOST)",
        );
        require(
            &mut missing,
            self.vector_index.api_key.as_ref(),
            "vector_index.api_key (PINECONE_API_KEY)",
        );
        require(
            &mut missing,
            self.web_search.api_key.as_ref(),
            "web_search.api_key (TAVILY_API_KEY)",
        );
        require(
            &mut missing,
            Some(&self.generation.model),
            "generation.model (AGENTIFY_GENERATION_MODEL)",
        );
        require(
            &mut missing,
            self.generation.api_key.as_ref(),
            "generation.api_key (GOOGLE_API_KEY)",
        );
        report_missing(missing)?;

        if self.pipeline.top_k == 0 {
            return Err(AgentifyError::Config(
                "pipeline.top_k must be at least 1".to_string(),
            ));
        }
        if self.pipeline.web_max_results == 0 {
            return Err(AgentifyError::Config(
                "pipeline.web_max_results must be at least 1".to_string(),
            ));
        }
        if self.pipeline.step_timeout_secs == 0 {
            return Err(AgentifyError::Config(
                "pipeline.step_timeout_secs must be at least 1".to_string(),
            ));
        }
        if self.pipeline.max_context_chars == Some(0) {
            return Err(AgentifyError::Config(
                "pipeline.max_context_chars must be at least 1 when set".to_string(),
            ));
        }
        Ok(())
    }

    /// Check the settings needed to fetch market data
    pub fn validate_for_market_data(&self) -> Result<()> {
        let mut missing = Vec::new();
        require(&mut missing, self.market_data.api_key.as_ref(), MARKET_DATA_KEY);
        report_missing(missing)
    }

    /// Check the settings needed for LLM stock analysis
    pub fn validate_for_stock_analysis(&self) -> Result<()> {
        let mut missing = Vec::new();
        require(&mut missing, self.market_data.api_key.as_ref(), MARKET_DATA_KEY);
        require(
            &mut missing,
            Some(&self.generation.model),
            "generation.model (AGENTIFY_GENERATION_MODEL)",
        );
        require(
            &mut missing,
            self.generation.api_key.as_ref(),
            "generation.api_key (GOOGLE_API_KEY)",
        );
        report_missing(missing)
    }

    /// Check the settings needed for loan approval predictions
    pub fn validate_for_loans(&self) -> Result<()> {
        let mut missing = Vec::new();
        require(
            &mut missing,
            self.loan_model.url.as_ref(),
            "loan_model.url (AGENTIFY_LOAN_MODEL_URL)",
        );
        report_missing(missing)
    }
}

const MARKET_DATA_KEY: &str = "market_data.api_key (ALPHA_VANTAGE_API_KEY)";

fn require(missing: &mut Vec<&'static str>, value: Option<&String>, label: &'static str) {
    if value.map_or(true, |v| v.trim().is_empty()) {
        missing.push(label);
    }
}

fn report_missing(missing: Vec<&'static str>) -> Result<()> {
    if missing.is_empty() {
        Ok(())
    } else {
        Err(AgentifyError::Config(format!(
            "missing required settings: {}",
            missing.join(", ")
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn complete_env() -> HashMap<String, String> {
        env(&[
            ("AGENTIFY_PINECONE_HOST", "https://idx.example.io"),
            ("PINECONE_API_KEY", "pc-key"),
            ("TAVILY_API_KEY", "tv-key"),
            ("GOOGLE_API_KEY", "g-key"),
        ])
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.pipeline.top_k, 5);
        assert_eq!(config.pipeline.web_max_results, 2);
        assert_eq!(config.pipeline.web_query_prefix, "HDFC");
        assert_eq!(config.embedding.dimensions, 384);
        assert!(config.pipeline.max_context_chars.is_none());
    }

    #[test]
    fn test_empty_yaml_is_default() {
        let config = Config::from_yaml_str("  \n").unwrap();
        assert_eq!(config.generation.model, "gemini-pro");
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let yaml = r#"
pipeline:
  top_k: 8
generation:
  model: gemini-1.5-pro
"#;
        let config = Config::from_yaml_str(yaml).unwrap();
        assert_eq!(config.pipeline.top_k, 8);
        assert_eq!(config.pipeline.web_max_results, 2);
        assert_eq!(config.generation.model, "gemini-1.5-pro");
        assert_eq!(config.web_search.url, "https://api.tavily.com");
    }

    #[test]
    fn test_env_overrides_file() {
        let mut config = Config::from_yaml_str("generation:\n  api_key: from-file\n").unwrap();
        let vars = env(&[("GOOGLE_API_KEY", "from-env"), ("AGENTIFY_TOP_K", "3")]);
        config.apply_env_with(|k| vars.get(k).cloned());
        assert_eq!(config.generation.api_key.as_deref(), Some("from-env"));
        assert_eq!(config.pipeline.top_k, 3);
    }

    #[test]
    fn test_blank_env_values_ignored() {
        let mut config = Config::default();
        let vars = env(&[("TAVILY_API_KEY", "   ")]);
        config.apply_env_with(|k| vars.get(k).cloned());
        assert!(config.web_search.api_key.is_none());
    }

    #[test]
    fn test_validate_reports_all_missing_credentials() {
        let err = Config::default().validate_for_answering().unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("PINECONE_API_KEY"));
        assert!(msg.contains("AGENTIFY_PINECONE_HOST"));
        assert!(msg.contains("TAVILY_API_KEY"));
        assert!(msg.contains("GOOGLE_API_KEY"));
        assert!(!msg.contains("AGENTIFY_EMBEDDING_URL"));
    }

    #[test]
    fn test_validate_complete_config() {
        let mut config = Config::default();
        let vars = complete_env();
        config.apply_env_with(|k| vars.get(k).cloned());
        assert!(config.validate_for_answering().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_top_k() {
        let mut config = Config::default();
        let vars = complete_env();
        config.apply_env_with(|k| vars.get(k).cloned());
        config.pipeline.top_k = 0;
        let err = config.validate_for_answering().unwrap_err();
        assert!(err.to_string().contains("top_k"));
    }

    #[test]
    fn test_validate_loans_and_market() {
        let config = Config::default();
        assert!(config.validate_for_loans().is_err());
        assert!(config.validate_for_market_data().is_err());
        let err = config.validate_for_stock_analysis().unwrap_err();
        assert!(err.to_string().contains("ALPHA_VANTAGE_API_KEY"));
        assert!(err.to_string().contains("GOOGLE_API_KEY"));
    }

    #[test]
    fn test_validate_rejects_zero_context_cap() {
        let mut config = Config::from_yaml_str("pipeline:\n  max_context_chars: 0\n").unwrap();
        let vars = complete_env();
        config.apply_env_with(|k| vars.get(k).cloned());
        let err = config.validate_for_answering().unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::Config);
        assert!(err.to_string().contains("max_context_chars"));

        config.pipeline.max_context_chars = Some(1);
        assert!(config.validate_for_answering().is_ok());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.yml");
        std::fs::write(&path, "pipeline:\n  max_context_chars: 4000\n").unwrap();

        let loaded = Config::from_file(&path).unwrap();
        assert_eq!(loaded.pipeline.max_context_chars, Some(4000));
        assert!(loaded.generation.api_key.is_none());
    }

    #[test]
    fn test_missing_file_is_config_error() {
        let err = Config::from_file(Path::new("/definitely/not/here.yml")).unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::Config);
    }
}
