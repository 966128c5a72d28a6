//! CLI argument definitions

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "agentify")]
#[command(
    author,
    version,
    about = "Grounded answers to banking questions, stock summaries and loan checks"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format
    #[arg(long, global = true, value_enum, default_value = "cli")]
    pub format: OutputFormat,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Ask a question about SBI and HDFC products
    Ask(AskArgs),

    /// Stock symbol lookup and analysis
    Stock(StockArgs),

    /// Score a loan application
    Loan(LoanArgs),

    /// Inspect configuration
    Config(ConfigArgs),

    /// Start MCP server
    Mcp,
}

#[derive(Args)]
pub struct AskArgs {
    /// Question text
    pub question: Vec<String>,

    /// Print the rendered prompt instead of calling the model
    #[arg(long)]
    pub show_prompt: bool,
}

#[derive(Args)]
pub struct StockArgs {
    #[command(subcommand)]
    pub action: StockAction,
}

#[derive(Subcommand)]
pub enum StockAction {
    /// Resolve a company name to its ticker symbol
    Symbol { company: Vec<String> },
    /// Year-by-year performance analysis
    Analyze { company: Vec<String> },
    /// The five most recent weekly bars
    Weeks { company: Vec<String> },
}

#[derive(Args)]
pub struct LoanArgs {
    /// JSON application file, or `-` for stdin
    pub input: PathBuf,
}

#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Report which features are fully configured
    Check,
    /// Print the effective configuration with secrets hidden
    Show,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Cli,
    Json,
}
