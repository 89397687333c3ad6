//! TransactionRecord — one buy or sell event in a portfolio's ledger.

use super::date::CalendarDate;
use serde::{Deserialize, Serialize};

/// A single ledger entry. Exactly one of `purchase_date` / `sell_date` is
/// populated.
///
/// Records are append-only with one exception: a sell depletes the `shares`
/// field of earlier buy records for the same symbol (see
/// `Portfolio::record_sell`), which is how composition-as-of-date folds sells
/// into the remaining buys.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionRecord {
    symbol: String,
    shares: f64,
    purchase_date: Option<CalendarDate>,
    sell_date: Option<CalendarDate>,
}

impl TransactionRecord {
    pub fn buy(symbol: impl Into<String>, shares: f64, date: CalendarDate) -> Self {
        Self {
            symbol: symbol.into(),
            shares,
            purchase_date: Some(date),
            sell_date: None,
        }
    }

    pub fn sell(symbol: impl Into<String>, shares: f64, date: CalendarDate) -> Self {
        Self {
            symbol: symbol.into(),
            shares,
            purchase_date: None,
            sell_date: Some(date),
        }
    }

    /// Rebuilds a record from snapshot fields.
    pub fn from_parts(
        symbol: impl Into<String>,
        shares: f64,
        purchase_date: Option<CalendarDate>,
        sell_date: Option<CalendarDate>,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            shares,
            purchase_date,
            sell_date,
        }
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn shares(&self) -> f64 {
        self.shares
    }

    pub fn purchase_date(&self) -> Option<CalendarDate> {
        self.purchase_date
    }

    pub fn sell_date(&self) -> Option<CalendarDate> {
        self.sell_date
    }

    pub fn is_buy(&self) -> bool {
        self.purchase_date.is_some()
    }

    /// Depletes up to `quantity` shares from this record and returns the
    /// amount actually taken. Used by the sell cascade.
    pub(crate) fn deplete(&mut self, quantity: f64) -> f64 {
        let taken = quantity.min(self.shares);
        self.shares -= taken;
        taken
    }
}
