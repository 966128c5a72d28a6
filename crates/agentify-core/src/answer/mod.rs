//! Contextual answer synthesis
//!
//! - [`assemble`] merges retrieved passages into one context blob
//! - [`PromptTemplate`] renders the advisor prompt
//! - [`AnswerPipeline`] sequences retrieval, rendering and generation

mod context;
mod pipeline;
mod prompt;

pub use context::{assemble, assemble_bounded, Context};
pub use pipeline::{Answer, AnswerPipeline, PipelineOptions, RenderedPrompt, Stage};
pub use prompt::PromptTemplate;
