//! Ask command

use super::join_words;
use crate::app::{AskArgs, OutputFormat};
use crate::output;
use agentify_core::{AgentifyError, AnswerPipeline, Config};
use anyhow::Result;

pub async fn run(args: AskArgs, config: &Config, format: OutputFormat) -> Result<()> {
    let question = join_words(&args.question);
    // Rejected before any client is built
    if question.trim().is_empty() {
        return Err(AgentifyError::Validation("question must not be empty".to_string()).into());
    }

    let pipeline = AnswerPipeline::from_config(config)?;

    if args.show_prompt {
        let rendered = pipeline.build_prompt(&question).await?;
        match format {
            OutputFormat::Json => {
                let value = serde_json::json!({
                    "question": question,
                    "context": rendered.context.as_str(),
                    "vector_documents": rendered.context.vector_documents(),
                    "web_included": rendered.context.web_included(),
                    "truncated": rendered.context.truncated(),
                    "prompt": rendered.prompt,
                });
                print!("{}", output::json::to_pretty(&value)?);
            }
            OutputFormat::Cli => println!("{}", rendered.prompt),
        }
        return Ok(());
    }

    let answer = pipeline.answer(&question).await?;
    match format {
        OutputFormat::Json => print!("{}", output::json::to_pretty(&answer)?),
        OutputFormat::Cli => print!("{}", output::terminal::format_answer(&answer)),
    }
    Ok(())
}
