//! Question answering orchestration
//!
//! One call runs: validate, retrieve (vector and web concurrently),
//! assemble, render, generate. Nothing is carried between calls, so a
//! single pipeline can serve any number of concurrent requests.

use super::{assemble_bounded, Context, PromptTemplate};
use crate::config::{Config, PipelineConfig};
use crate::error::{AgentifyError, ErrorKind, Result};
use crate::llm::{Generator, HttpEmbedder, HttpGenerator};
use crate::retrieval::{
    ContextSource, DocumentSource, PineconeIndex, RetrievedDocument, TavilySearch,
    VectorRetriever, WebRetriever,
};
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Steps of one pipeline run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    VectorSearch,
    WebSearch,
    Generate,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::VectorSearch => "vector search",
            Self::WebSearch => "web search",
            Self::Generate => "generate",
        };
        f.write_str(name)
    }
}

impl From<DocumentSource> for Stage {
    fn from(source: DocumentSource) -> Self {
        match source {
            DocumentSource::VectorIndex => Self::VectorSearch,
            DocumentSource::WebSearch => Self::WebSearch,
        }
    }
}

/// Result of answering one question
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Answer {
    pub question: String,
    pub answer: String,
}

/// Tunables applied to every run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineOptions {
    /// Upper bound on each external step
    pub step_timeout: Duration,
    /// Character cap on the assembled context; `None` disables it
    pub max_context_chars: Option<usize>,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            step_timeout: Duration::from_secs(30),
            max_context_chars: None,
        }
    }
}

impl From<&PipelineConfig> for PipelineOptions {
    fn from(config: &PipelineConfig) -> Self {
        Self {
            step_timeout: config.step_timeout(),
            max_context_chars: config.max_context_chars,
        }
    }
}

/// Context and prompt produced before generation
#[derive(Debug, Clone)]
pub struct RenderedPrompt {
    pub context: Context,
    pub prompt: String,
}

/// Retrieval-augmented answer pipeline
pub struct AnswerPipeline {
    vector: Arc<dyn ContextSource>,
    web: Arc<dyn ContextSource>,
    generator: Arc<dyn Generator>,
    template: PromptTemplate,
    options: PipelineOptions,
}

impl AnswerPipeline {
    pub fn new(
        vector: Arc<dyn ContextSource>,
        web: Arc<dyn ContextSource>,
        generator: Arc<dyn Generator>,
        options: PipelineOptions,
    ) -> Self {
        Self {
            vector,
            web,
            generator,
            template: PromptTemplate::financial_advisor(),
            options,
        }
    }

    /// Build the production pipeline, failing on missing credentials
    pub fn from_config(config: &Config) -> Result<Self> {
        config.validate_for_answering()?;

        let embedder = Arc::new(HttpEmbedder::from_config(&config.embedding)?);
        let index = Arc::new(PineconeIndex::from_config(&config.vector_index)?);
        let vector = VectorRetriever::new(embedder, index, config.pipeline.top_k);

        let search = Arc::new(TavilySearch::from_config(&config.web_search)?);
        let web = WebRetriever::new(
            search,
            config.pipeline.web_query_prefix.clone(),
            config.pipeline.web_max_results,
        );

        let generator = HttpGenerator::from_config(&config.generation)?;

        tracing::debug!(
            embedding_model = %config.embedding.model,
            generation_model = %config.generation.model,
            top_k = config.pipeline.top_k,
            "Answer pipeline configured"
        );

        Ok(Self::new(
            Arc::new(vector),
            Arc::new(web),
            Arc::new(generator),
            PipelineOptions::from(&config.pipeline),
        ))
    }

    /// Retrieve, assemble and render without calling the model
    pub async fn build_prompt(&self, question: &str) -> Result<RenderedPrompt> {
        validate_question(question)?;

        // Fixed merge order regardless of which finishes first
        let (vector_docs, web_docs) = tokio::join!(
            self.gather(self.vector.as_ref(), question),
            self.gather(self.web.as_ref(), question),
        );
        let vector_docs = vector_docs?;
        let web_docs = web_docs?;

        let web_snippets: Vec<&str> = web_docs.iter().map(|d| d.content.as_str()).collect();
        let context = assemble_bounded(
            &vector_docs,
            web_snippets.as_slice(),
            self.options.max_context_chars,
        );

        if context.truncated() {
            tracing::debug!(
                kept = context.vector_documents(),
                retrieved = vector_docs.len(),
                cap = ?self.options.max_context_chars,
                "Context truncated to cap"
            );
        }

        let prompt = self.template.render(&context, question);
        Ok(RenderedPrompt { context, prompt })
    }

    /// Answer a question grounded in retrieved context
    pub async fn answer(&self, question: &str) -> Result<Answer> {
        let start = Instant::now();
        let rendered = self.build_prompt(question).await?;

        let completion = tokio::time::timeout(
            self.options.step_timeout,
            self.generator.generate(&rendered.prompt),
        )
        .await
        .map_err(|_| timed_out(Stage::Generate, self.options.step_timeout))?
        .map_err(|e| match e.kind() {
            ErrorKind::Generation => e,
            _ => AgentifyError::Generation(format!("{}: {}", self.generator.model_name(), e)),
        })?;

        if completion.trim().is_empty() {
            return Err(AgentifyError::Generation(format!(
                "{} returned an empty answer",
                self.generator.model_name()
            )));
        }

        tracing::info!(
            context_chars = rendered.context.as_str().chars().count(),
            vector_documents = rendered.context.vector_documents(),
            web = rendered.context.web_included(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Answered question"
        );

        Ok(Answer {
            question: question.to_string(),
            answer: completion,
        })
    }

    /// Run one source under the step timeout and apply its failure policy
    async fn gather(
        &self,
        source: &dyn ContextSource,
        question: &str,
    ) -> Result<Vec<RetrievedDocument>> {
        let stage = Stage::from(source.source());
        let retrieval = tokio::time::timeout(self.options.step_timeout, source.retrieve(question));
        let outcome = match retrieval.await {
            Ok(result) => result.map_err(|e| classify(source.source(), e)),
            Err(_) => Err(timed_out(stage, self.options.step_timeout)),
        };

        match outcome {
            Ok(docs) => {
                tracing::debug!(source = source.name(), count = docs.len(), "Retrieved context");
                Ok(docs)
            }
            Err(e) if source.may_fail() => {
                tracing::warn!(
                    source = source.name(),
                    error = %e,
                    "Context source failed, continuing without it"
                );
                Ok(Vec::new())
            }
            Err(e) => Err(e),
        }
    }
}

fn validate_question(question: &str) -> Result<()> {
    if question.trim().is_empty() {
        return Err(AgentifyError::Validation(
            "question must not be empty".to_string(),
        ));
    }
    Ok(())
}

fn classify(source: DocumentSource, error: AgentifyError) -> AgentifyError {
    match (source, error.kind()) {
        (DocumentSource::VectorIndex, ErrorKind::Retrieval) => error,
        (DocumentSource::WebSearch, ErrorKind::WebSearch) => error,
        (DocumentSource::VectorIndex, _) => AgentifyError::Retrieval(error.to_string()),
        (DocumentSource::WebSearch, _) => AgentifyError::WebSearch(error.to_string()),
    }
}

fn timed_out(stage: Stage, after: Duration) -> AgentifyError {
    let message = format!("{} timed out after {}s", stage, after.as_secs());
    match stage {
        Stage::VectorSearch => AgentifyError::Retrieval(message),
        Stage::WebSearch => AgentifyError::WebSearch(message),
        Stage::Generate => AgentifyError::Generation(message),
    }
}
