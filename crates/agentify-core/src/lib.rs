//! Agentify Core Library
//!
//! Retrieval-augmented answers for banking questions, plus the market and
//! loan helpers that sit beside them.
//!
//! # Features
//! - Vector retrieval over a Pinecone index with OpenAI-compatible embeddings
//! - Best-effort live web augmentation through Tavily
//! - Deterministic context assembly with an optional size cap
//! - Weekly stock history from Alpha Vantage with LLM summaries
//! - Loan approval through a served classifier

pub mod answer;
pub mod config;
pub mod error;
pub mod llm;
pub mod loan;
pub mod market;
pub mod retrieval;

pub use answer::{
    assemble, assemble_bounded, Answer, AnswerPipeline, Context, PipelineOptions, PromptTemplate,
    RenderedPrompt, Stage,
};
pub use config::Config;
pub use error::{AgentifyError, Error, ErrorKind, Result};
pub use llm::{
    ChatMessage, Embedder, Generator, HttpEmbedder, HttpGenerator, LLMClient, OpenAICompatClient,
};
pub use loan::{
    HttpLoanClassifier, LoanApplication, LoanApprover, LoanClassifier, LoanDecision,
    LoanPrediction,
};
pub use market::{
    AlphaVantageClient, MarketData, StockAnalysis, StockAnalyst, StockSymbol, SymbolDirectory,
    WeeklyBar, WeeklySeries,
};
pub use retrieval::{
    ContextSource, DocumentSource, PineconeIndex, RetrievedDocument, TavilySearch, VectorIndex,
    VectorRetriever, WebRetriever, WebSearch, WebSnippet,
};

/// Default config directory name
pub const CONFIG_DIR_NAME: &str = "agentify";
