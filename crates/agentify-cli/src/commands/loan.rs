//! Loan approval command

use crate::app::{LoanArgs, OutputFormat};
use crate::output;
use agentify_core::{AgentifyError, Config, LoanApplication, LoanApprover, LoanDecision};
use anyhow::Result;
use std::io::Read;
use std::path::Path;

pub async fn run(args: LoanArgs, config: &Config, format: OutputFormat) -> Result<()> {
    let raw = read_input(&args.input)?;
    let application = LoanApplication::from_json(&raw)?;

    let approver = LoanApprover::from_config(config)?;
    let result = approver.approve(&application).await?;

    match format {
        OutputFormat::Json => print!("{}", output::json::to_pretty(&result)?),
        OutputFormat::Cli => match result.prediction {
            LoanDecision::Approved => println!("Loan approval prediction: Y (approved)"),
            LoanDecision::Rejected => println!("Loan approval prediction: N (rejected)"),
        },
    }
    Ok(())
}

fn read_input(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        return Ok(buf);
    }
    std::fs::read_to_string(path).map_err(|e| {
        AgentifyError::Validation(format!("cannot read {}: {}", path.display(), e)).into()
    })
}
