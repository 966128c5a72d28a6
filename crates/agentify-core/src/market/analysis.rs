//! Stock lookups and LLM-written performance summaries

use super::{AlphaVantageClient, MarketData, SymbolDirectory, WeeklyBar};
use crate::config::Config;
use crate::error::{AgentifyError, Result};
use crate::llm::Generator;
use serde::Serialize;
use std::sync::Arc;

/// Weeks returned by [`StockAnalyst::past_weeks`]
pub const PAST_WEEKS: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StockAnalysis {
    pub company_name: String,
    pub stock_symbol: String,
    pub analysis: String,
}

/// Resolves companies and summarizes their price history
pub struct StockAnalyst {
    directory: Arc<SymbolDirectory>,
    market: Arc<dyn MarketData>,
    generator: Option<Arc<dyn Generator>>,
}

impl StockAnalyst {
    pub fn new(directory: Arc<SymbolDirectory>, market: Arc<dyn MarketData>) -> Self {
        Self {
            directory,
            market,
            generator: None,
        }
    }

    /// Listing file and market data client from config
    pub fn from_config(config: &Config) -> Result<Self> {
        config.validate_for_market_data()?;
        let directory = SymbolDirectory::from_path(&config.market_data.listing_path)?;
        let market = AlphaVantageClient::from_config(&config.market_data)?;
        Ok(Self::new(Arc::new(directory), Arc::new(market)))
    }

    /// Enable [`StockAnalyst::analyze`]
    pub fn with_generator(mut self, generator: Arc<dyn Generator>) -> Self {
        self.generator = Some(generator);
        self
    }

    pub fn can_analyze(&self) -> bool {
        self.generator.is_some()
    }

    /// The five newest weekly bars, newest first
    pub async fn past_weeks(&self, company: &str) -> Result<Vec<WeeklyBar>> {
        let symbol = self.directory.lookup(company)?;
        let series = self.market.weekly_series(symbol).await?;
        Ok(series.last_weeks(PAST_WEEKS).to_vec())
    }

    /// Year-by-year performance write-up over the newest quarter of history
    pub async fn analyze(&self, company: &str) -> Result<StockAnalysis> {
        let generator = self.generator.as_ref().ok_or_else(|| {
            AgentifyError::Config("stock analysis needs a generation model".to_string())
        })?;

        let symbol = self.directory.lookup(company)?;
        let series = self.market.weekly_series(symbol).await?;
        let window = series.recent_quarter();
        if window.is_empty() {
            return Err(AgentifyError::NotFound(format!(
                "not enough weekly history for {}",
                symbol
            )));
        }

        let prompt = analysis_prompt(company, window);
        let analysis = generator
            .generate(&prompt)
            .await
            .map_err(|e| AgentifyError::Generation(e.to_string()))?;

        tracing::info!(company, symbol, weeks = window.len(), "Analyzed stock");

        Ok(StockAnalysis {
            company_name: company.to_string(),
            stock_symbol: symbol.to_string(),
            analysis,
        })
    }
}

fn analysis_prompt(company: &str, bars: &[WeeklyBar]) -> String {
    let data: String = bars
        .iter()
        .map(|bar| {
            format!(
                "{}: open {:.2}, high {:.2}, low {:.2}, close {:.2}, volume {}\n",
                bar.date, bar.open, bar.high, bar.low, bar.close, bar.volume
            )
        })
        .collect();

    format!(
        "I am providing you with weekly stock data for {company} for the past 5 years, \
including open price, highest price, lowest price, close price, and volume. \
Please analyze the stock's performance year-by-year and present the findings in a \
structured format with the following details for each year:
- Year: YYYY
- Highest Price:
- Lowest Price:
- Average Closing Price:
- Volume Trends: Summary of any significant volume changes.
- Key Trends: Overview of any notable trends in price movements.

After detailing each year, provide a summary of the overall performance trends observed \
across these 5 years. Conclude with a personalized suggestion, addressed to me, indicating \
if this stock would be a wise investment based on the analyzed data.

Data:
{data}"
    )
}
