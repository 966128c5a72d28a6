//! Company name to ticker symbol lookup over a listing CSV

use crate::error::{AgentifyError, Result};
use csv::ReaderBuilder;
use serde::Serialize;
use std::fs;
use std::io::Read;
use std::path::Path;

/// One listed security
#[derive(Debug, Clone, PartialEq, Eq)]
struct Listing {
    symbol: String,
    name: String,
}

/// A company name paired with the symbol it resolved to
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StockSymbol {
    pub company_name: String,
    pub stock_symbol: String,
}

/// In-memory listing table, kept in file order
#[derive(Debug, Clone, Default)]
pub struct SymbolDirectory {
    listings: Vec<Listing>,
}

impl SymbolDirectory {
    /// Load a listing file with `symbol` and `name` columns
    pub fn from_path(path: &Path) -> Result<Self> {
        let content = fs::read(path).map_err(|e| {
            AgentifyError::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to read listing file {:?}: {}", path, e),
            ))
        })?;
        Self::from_reader(content.as_slice())
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let headers = reader.headers()?.clone();
        let column = |wanted: &str| {
            headers
                .iter()
                .position(|h| h.trim().eq_ignore_ascii_case(wanted))
                .ok_or_else(|| {
                    AgentifyError::Config(format!("listing file has no `{}` column", wanted))
                })
        };
        let symbol_col = column("symbol")?;
        let name_col = column("name")?;

        let mut listings = Vec::new();
        for record in reader.records() {
            let record = record?;
            let (Some(symbol), Some(name)) = (record.get(symbol_col), record.get(name_col)) else {
                continue;
            };
            if symbol.is_empty() || name.is_empty() {
                continue;
            }
            listings.push(Listing {
                symbol: symbol.to_string(),
                name: name.to_string(),
            });
        }

        tracing::debug!(count = listings.len(), "Loaded symbol directory");
        Ok(Self { listings })
    }

    /// Symbol of the first listing whose name contains `company`,
    /// ignoring case
    pub fn lookup(&self, company: &str) -> Result<&str> {
        let needle = company.trim().to_lowercase();
        if needle.is_empty() {
            return Err(AgentifyError::Validation(
                "company name must not be empty".to_string(),
            ));
        }

        self.listings
            .iter()
            .find(|l| l.name.to_lowercase().contains(&needle))
            .map(|l| l.symbol.as_str())
            .ok_or_else(|| {
                AgentifyError::NotFound(format!("No matching company found for name: {}", company))
            })
    }

    /// [`SymbolDirectory::lookup`] paired with the name that was asked for
    pub fn resolve(&self, company: &str) -> Result<StockSymbol> {
        let symbol = self.lookup(company)?;
        Ok(StockSymbol {
            company_name: company.to_string(),
            stock_symbol: symbol.to_string(),
        })
    }
}
