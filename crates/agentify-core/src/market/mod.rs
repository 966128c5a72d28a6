//! Stock market helpers
//!
//! Resolves company names to ticker symbols, fetches weekly price history
//! and asks the generation model for a year-by-year performance summary.

mod alpha_vantage;
mod analysis;
mod symbols;

pub use alpha_vantage::{AlphaVantageClient, MarketData, WeeklyBar, WeeklySeries};
pub use analysis::{StockAnalysis, StockAnalyst, PAST_WEEKS};
pub use symbols::{StockSymbol, SymbolDirectory};
