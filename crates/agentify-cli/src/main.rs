//! Agentify CLI
//!
//! Grounded banking answers, stock summaries and loan checks.

use agentify_core::{AgentifyError, Config};
use clap::Parser;

mod app;
mod commands;
mod output;

use app::{Cli, Commands};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    // stdout carries results; diagnostics go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(err) = run(cli).await {
        let code = report(&err);
        std::process::exit(code);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = Config::load()?;

    match cli.command {
        Commands::Ask(args) => commands::ask::run(args, &config, cli.format).await,
        Commands::Stock(args) => commands::stock::run(args, &config, cli.format).await,
        Commands::Loan(args) => commands::loan::run(args, &config, cli.format).await,
        Commands::Config(args) => commands::config::run(args, &config, cli.format).await,
        Commands::Mcp => agentify_mcp::start_server(&config).await,
    }
}

/// Print `<kind>: <message>` and pick the exit code
fn report(err: &anyhow::Error) -> i32 {
    match err.downcast_ref::<AgentifyError>() {
        Some(e) => {
            eprintln!("{}: {}", e.kind(), e);
            e.exit_code()
        }
        None => {
            eprintln!("InternalFailure: {:#}", err);
            agentify_core::error::exit_codes::GENERAL_ERROR
        }
    }
}
