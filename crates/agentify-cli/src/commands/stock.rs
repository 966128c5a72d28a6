//! Stock commands

use super::join_words;
use crate::app::{OutputFormat, StockAction, StockArgs};
use crate::output;
use agentify_core::{Config, HttpGenerator, StockAnalyst, SymbolDirectory};
use anyhow::Result;
use std::sync::Arc;

pub async fn run(args: StockArgs, config: &Config, format: OutputFormat) -> Result<()> {
    match args.action {
        StockAction::Symbol { company } => {
            let company = join_words(&company);
            // Offline: only the listing file is needed
            let directory = SymbolDirectory::from_path(&config.market_data.listing_path)?;
            let symbol = directory.resolve(&company)?;
            match format {
                OutputFormat::Json => print!("{}", output::json::to_pretty(&symbol)?),
                OutputFormat::Cli => println!("{}: {}", symbol.company_name, symbol.stock_symbol),
            }
        }
        StockAction::Analyze { company } => {
            let company = join_words(&company);
            config.validate_for_stock_analysis()?;
            let generator = HttpGenerator::from_config(&config.generation)?;
            let analyst = StockAnalyst::from_config(config)?.with_generator(Arc::new(generator));

            let analysis = analyst.analyze(&company).await?;
            match format {
                OutputFormat::Json => print!("{}", output::json::to_pretty(&analysis)?),
                OutputFormat::Cli => print!("{}", output::terminal::format_analysis(&analysis)),
            }
        }
        StockAction::Weeks { company } => {
            let company = join_words(&company);
            let analyst = StockAnalyst::from_config(config)?;
            let weeks = analyst.past_weeks(&company).await?;
            match format {
                OutputFormat::Json => print!("{}", output::json::to_pretty(&weeks)?),
                OutputFormat::Cli => print!("{}", output::terminal::format_weeks(&weeks)),
            }
        }
    }
    Ok(())
}
