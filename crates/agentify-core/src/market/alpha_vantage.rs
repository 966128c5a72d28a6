//! Weekly price series from Alpha Vantage

use crate::config::MarketDataConfig;
use crate::error::{AgentifyError, Result};
use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;
use std::time::Duration;

/// One week of trading for a symbol
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeeklyBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

/// Weekly bars for one symbol, newest first
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeeklySeries {
    pub symbol: String,
    bars: Vec<WeeklyBar>,
}

impl WeeklySeries {
    /// Bars are re-sorted newest first and deduplicated by date
    pub fn new(symbol: impl Into<String>, bars: Vec<WeeklyBar>) -> Self {
        let by_date: BTreeMap<NaiveDate, WeeklyBar> =
            bars.into_iter().map(|b| (b.date, b)).collect();
        Self {
            symbol: symbol.into(),
            bars: by_date.into_values().rev().collect(),
        }
    }

    pub fn bars(&self) -> &[WeeklyBar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// Newest `n` bars, newest first
    pub fn last_weeks(&self, n: usize) -> &[WeeklyBar] {
        &self.bars[..n.min(self.bars.len())]
    }

    /// Newest quarter of the history
    pub fn recent_quarter(&self) -> &[WeeklyBar] {
        &self.bars[..self.bars.len() / 4]
    }
}

/// Source of historical prices
#[async_trait]
pub trait MarketData: Send + Sync {
    async fn weekly_series(&self, symbol: &str) -> Result<WeeklySeries>;
}

/// Alpha Vantage REST client
pub struct AlphaVantageClient {
    http_client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl AlphaVantageClient {
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .user_agent(concat!("agentify/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()?;

        Ok(Self {
            http_client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        })
    }

    pub fn from_config(config: &MarketDataConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .ok_or_else(|| AgentifyError::Config("market_data.api_key is not set".to_string()))?;
        Self::new(&config.url, api_key, Duration::from_secs(config.timeout_secs))
    }
}

#[derive(Deserialize)]
struct WeeklyResponse {
    #[serde(rename = "Weekly Time Series")]
    series: Option<BTreeMap<String, RawBar>>,
    #[serde(rename = "Error Message")]
    error_message: Option<String>,
    #[serde(rename = "Note")]
    note: Option<String>,
    #[serde(rename = "Information")]
    information: Option<String>,
}

#[derive(Deserialize)]
struct RawBar {
    #[serde(rename = "1. open")]
    open: String,
    #[serde(rename = "2. high")]
    high: String,
    #[serde(rename = "3. low")]
    low: String,
    #[serde(rename = "4. close")]
    close: String,
    #[serde(rename = "5. volume")]
    volume: String,
}

#[async_trait]
impl MarketData for AlphaVantageClient {
    async fn weekly_series(&self, symbol: &str) -> Result<WeeklySeries> {
        let response = self
            .http_client
            .get(format!("{}/query", self.base_url))
            .query(&[
                ("function", "TIME_SERIES_WEEKLY"),
                ("symbol", symbol),
                ("apikey", self.api_key.as_str()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            return Err(AgentifyError::ExternalError(format!(
                "Unable to fetch data from Alpha Vantage (HTTP {})",
                status
            )));
        }

        // Provider errors and rate limits arrive as 200 bodies
        let body: WeeklyResponse = response.json().await?;
        let raw = match body.series {
            Some(series) => series,
            None => {
                let reason = body
                    .error_message
                    .or(body.note)
                    .or(body.information)
                    .unwrap_or_else(|| "response has no weekly time series".to_string());
                return Err(AgentifyError::ExternalError(format!(
                    "Alpha Vantage error for {}: {}",
                    symbol, reason
                )));
            }
        };

        let mut bars = Vec::with_capacity(raw.len());
        for (date, bar) in raw {
            bars.push(parse_bar(&date, &bar)?);
        }

        tracing::debug!(symbol, weeks = bars.len(), "Fetched weekly series");
        Ok(WeeklySeries::new(symbol, bars))
    }
}

fn parse_bar(date: &str, raw: &RawBar) -> Result<WeeklyBar> {
    let parsed_date = NaiveDate::parse_from_str(date, "%Y-%m-%d").map_err(|e| {
        AgentifyError::ExternalError(format!("invalid week date {:?}: {}", date, e))
    })?;

    Ok(WeeklyBar {
        date: parsed_date,
        open: parse_field(&raw.open, "open", date)?,
        high: parse_field(&raw.high, "high", date)?,
        low: parse_field(&raw.low, "low", date)?,
        close: parse_field(&raw.close, "close", date)?,
        volume: parse_field(&raw.volume, "volume", date)?,
    })
}

fn parse_field<T: FromStr>(value: &str, field: &str, date: &str) -> Result<T> {
    value.trim().parse().map_err(|_| {
        AgentifyError::ExternalError(format!("invalid {} {:?} for week {}", field, value, date))
    })
}
