//! Portfolio — holdings plus transaction ledger under a (name, owner) identity.

use super::date::CalendarDate;
use super::holding::Holding;
use super::transaction::TransactionRecord;

/// One portfolio: live holdings and the append-only ledger behind them.
///
/// The (name, owner) pair is the portfolio's identity within a
/// `PortfolioRepository`. Mutation happens only through `record_buy` /
/// `record_sell`; argument validation (whole shares, trading-day dates) is the
/// caller's job — see `PortfolioService`.
#[derive(Debug, Clone)]
pub struct Portfolio {
    name: String,
    owner: String,
    holdings: Vec<Holding>,
    ledger: Vec<TransactionRecord>,
}

impl Portfolio {
    pub fn new(name: impl Into<String>, owner: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            owner: owner.into(),
            holdings: Vec::new(),
            ledger: Vec::new(),
        }
    }

    /// Rebuilds a portfolio from snapshot parts.
    pub fn from_parts(
        name: impl Into<String>,
        owner: impl Into<String>,
        holdings: Vec<Holding>,
        ledger: Vec<TransactionRecord>,
    ) -> Self {
        Self {
            name: name.into(),
            owner: owner.into(),
            holdings,
            ledger,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn holdings(&self) -> &[Holding] {
        &self.holdings
    }

    pub fn ledger(&self) -> &[TransactionRecord] {
        &self.ledger
    }

    pub fn holding(&self, symbol: &str) -> Option<&Holding> {
        self.holdings.iter().find(|h| h.symbol() == symbol)
    }

    /// Appends a buy record and adds the shares to the symbol's holding,
    /// creating the holding on first purchase.
    pub fn record_buy(&mut self, symbol: &str, shares: f64, date: CalendarDate) {
        self.ledger
            .push(TransactionRecord::buy(symbol, shares, date));
        match self.holdings.iter_mut().find(|h| h.symbol() == symbol) {
            Some(holding) => holding.add_shares(shares),
            None => self.holdings.push(Holding::new(symbol, shares)),
        }
    }

    /// Appends a sell record, depletes earlier buy records for the symbol in
    /// ledger order (FIFO by insertion), and reduces the holding clamped at
    /// zero. A holding that reaches exactly zero is removed.
    ///
    /// Selling a symbol that is not held is tolerated: the cascade finds
    /// nothing to deplete and the sell record still lands in the ledger.
    pub fn record_sell(&mut self, symbol: &str, shares: f64, date: CalendarDate) {
        let mut remaining = shares;
        for record in self
            .ledger
            .iter_mut()
            .filter(|r| r.is_buy() && r.symbol() == symbol)
        {
            if remaining <= 0.0 {
                break;
            }
            remaining -= record.deplete(remaining);
        }
        self.ledger
            .push(TransactionRecord::sell(symbol, shares, date));

        if let Some(pos) = self.holdings.iter().position(|h| h.symbol() == symbol) {
            self.holdings[pos].remove_shares(shares);
            if self.holdings[pos].is_empty() {
                self.holdings.remove(pos);
            }
        }
    }
}
