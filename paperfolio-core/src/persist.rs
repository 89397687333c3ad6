//! JSON snapshots of a portfolio: holdings plus the full transaction ledger.
//!
//! The on-disk shape is fixed so snapshots stay readable across versions:
//!
//! ```json
//! {
//!   "portfolioName": "...",
//!   "ownerName": "...",
//!   "listOfStocks": [{ "tickerSymbol": "...", "shares": 0.0 }],
//!   "stockTransactions": [
//!     { "tickerSymbol": "...", "shares": 0.0,
//!       "purchaseDate": "YYYY-MM-DD", "sellingDate": null }
//!   ]
//! }
//! ```
//!
//! Dates serialize as `YYYY-MM-DD` strings; exactly one of `purchaseDate` /
//! `sellingDate` is non-null per transaction. Writes are atomic (temp file,
//! then rename) so a crash never leaves a half-written snapshot behind.

use crate::domain::{CalendarDate, Holding, Portfolio, TransactionRecord};
use crate::error::ModelError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PortfolioSnapshot {
    portfolio_name: String,
    owner_name: String,
    list_of_stocks: Vec<StockEntry>,
    stock_transactions: Vec<TransactionEntry>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StockEntry {
    ticker_symbol: String,
    shares: f64,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TransactionEntry {
    ticker_symbol: String,
    shares: f64,
    purchase_date: Option<CalendarDate>,
    selling_date: Option<CalendarDate>,
}

impl From<&Portfolio> for PortfolioSnapshot {
    fn from(portfolio: &Portfolio) -> Self {
        Self {
            portfolio_name: portfolio.name().to_string(),
            owner_name: portfolio.owner().to_string(),
            list_of_stocks: portfolio
                .holdings()
                .iter()
                .map(|h| StockEntry {
                    ticker_symbol: h.symbol().to_string(),
                    shares: h.shares(),
                })
                .collect(),
            stock_transactions: portfolio
                .ledger()
                .iter()
                .map(|r| TransactionEntry {
                    ticker_symbol: r.symbol().to_string(),
                    shares: r.shares(),
                    purchase_date: r.purchase_date(),
                    selling_date: r.sell_date(),
                })
                .collect(),
        }
    }
}

impl PortfolioSnapshot {
    fn into_portfolio(self) -> Result<Portfolio, ModelError> {
        for entry in &self.stock_transactions {
            match (entry.purchase_date, entry.selling_date) {
                (Some(_), None) | (None, Some(_)) => {}
                _ => {
                    return Err(ModelError::Persistence(format!(
                        "transaction for {} must carry exactly one of purchaseDate/sellingDate",
                        entry.ticker_symbol
                    )))
                }
            }
        }
        let holdings = self
            .list_of_stocks
            .into_iter()
            .map(|s| Holding::new(s.ticker_symbol, s.shares))
            .collect();
        let ledger = self
            .stock_transactions
            .into_iter()
            .map(|t| {
                TransactionRecord::from_parts(
                    t.ticker_symbol,
                    t.shares,
                    t.purchase_date,
                    t.selling_date,
                )
            })
            .collect();
        Ok(Portfolio::from_parts(
            self.portfolio_name,
            self.owner_name,
            holdings,
            ledger,
        ))
    }
}

/// Serializes `portfolio` to pretty-printed JSON at `path`, atomically.
pub fn save_portfolio(portfolio: &Portfolio, path: &Path) -> Result<(), ModelError> {
    let snapshot = PortfolioSnapshot::from(portfolio);
    let json = serde_json::to_string_pretty(&snapshot)
        .map_err(|e| ModelError::Persistence(format!("serialize failed: {e}")))?;

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .map_err(|e| ModelError::Persistence(format!("create {parent:?}: {e}")))?;
        }
    }
    let tmp_path = path.with_extension("json.tmp");
    fs::write(&tmp_path, json)
        .map_err(|e| ModelError::Persistence(format!("write {tmp_path:?}: {e}")))?;
    fs::rename(&tmp_path, path).map_err(|e| {
        let _ = fs::remove_file(&tmp_path);
        ModelError::Persistence(format!("rename into {path:?}: {e}"))
    })
}

/// Reads a snapshot from `path` back into a `Portfolio`.
pub fn load_portfolio(path: &Path) -> Result<Portfolio, ModelError> {
    let json = fs::read_to_string(path)
        .map_err(|e| ModelError::Persistence(format!("read {path:?}: {e}")))?;
    let snapshot: PortfolioSnapshot = serde_json::from_str(&json)
        .map_err(|e| ModelError::Persistence(format!("parse {path:?}: {e}")))?;
    snapshot.into_portfolio()
}
