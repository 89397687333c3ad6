//! PortfolioService — the user-facing entry point for the engine.
//!
//! Owns the portfolio repository and the price cache and threads them through
//! every operation; nothing in the engine reaches for global state. Trades
//! are validated here (whole-share buys, trading-day dates) before the ledger
//! is touched, and multi-symbol aggregates fail whole on the first bad
//! symbol.

use crate::data::PriceCache;
use crate::domain::{CalendarDate, Portfolio};
use crate::error::ModelError;
use crate::repository::PortfolioRepository;
use crate::stats;
use crate::valuation;
use std::collections::BTreeMap;
use tracing::debug;

pub struct PortfolioService {
    repository: PortfolioRepository,
    prices: PriceCache,
}

impl PortfolioService {
    pub fn new(prices: PriceCache) -> Self {
        Self {
            repository: PortfolioRepository::new(),
            prices,
        }
    }

    pub fn repository(&self) -> &PortfolioRepository {
        &self.repository
    }

    pub fn repository_mut(&mut self) -> &mut PortfolioRepository {
        &mut self.repository
    }

    pub fn prices_mut(&mut self) -> &mut PriceCache {
        &mut self.prices
    }

    pub fn create_portfolio(&mut self, name: &str, owner: &str) -> Result<(), ModelError> {
        self.repository.create(name, owner)?;
        Ok(())
    }

    pub fn remove_portfolio(&mut self, name: &str, owner: &str) -> bool {
        self.repository.remove(name, owner)
    }

    /// Buys whole shares on a trading day.
    ///
    /// Buys reject fractional amounts; only sells may be fractional.
    pub fn buy(
        &mut self,
        name: &str,
        owner: &str,
        symbol: &str,
        shares: f64,
        date: CalendarDate,
    ) -> Result<(), ModelError> {
        if !shares.is_finite() || shares <= 0.0 || shares.fract() != 0.0 {
            return Err(ModelError::InvalidArgument(format!(
                "shares to buy must be a positive whole number, got {shares}"
            )));
        }
        let symbol = symbol.to_uppercase();
        self.prices.series(&symbol)?.index_of(date)?;
        let portfolio = self.repository.get_mut(name, owner)?;
        debug!(portfolio = name, %symbol, shares, %date, "buy");
        portfolio.record_buy(&symbol, shares, date);
        Ok(())
    }

    /// Sells shares (fractional allowed) on a trading day.
    ///
    /// Selling more than is held clamps the holding at zero; selling a symbol
    /// that is not held is tolerated.
    pub fn sell(
        &mut self,
        name: &str,
        owner: &str,
        symbol: &str,
        shares: f64,
        date: CalendarDate,
    ) -> Result<(), ModelError> {
        if !shares.is_finite() || shares <= 0.0 {
            return Err(ModelError::InvalidArgument(format!(
                "shares to sell must be positive, got {shares}"
            )));
        }
        let symbol = symbol.to_uppercase();
        self.prices.series(&symbol)?.index_of(date)?;
        let portfolio = self.repository.get_mut(name, owner)?;
        debug!(portfolio = name, %symbol, shares, %date, "sell");
        portfolio.record_sell(&symbol, shares, date);
        Ok(())
    }

    /// Closing price per held symbol, formatted.
    pub fn all_closing_prices(
        &mut self,
        name: &str,
        owner: &str,
        date: CalendarDate,
    ) -> Result<BTreeMap<String, String>, ModelError> {
        let portfolio = self.repository.get(name, owner)?;
        let mut out = BTreeMap::new();
        for holding in portfolio.holdings() {
            let close = self.prices.series(holding.symbol())?.closing_price(date)?;
            out.insert(holding.symbol().to_string(), format!("${close:.2}"));
        }
        Ok(out)
    }

    /// Closing-price change per held symbol over [start, end], formatted.
    pub fn all_price_changes(
        &mut self,
        name: &str,
        owner: &str,
        start: CalendarDate,
        end: CalendarDate,
    ) -> Result<BTreeMap<String, String>, ModelError> {
        let portfolio = self.repository.get(name, owner)?;
        let mut out = BTreeMap::new();
        for holding in portfolio.holdings() {
            let series = self.prices.series(holding.symbol())?;
            let change = stats::price_change(series, start, end)?;
            out.insert(holding.symbol().to_string(), format!("${change:.2}"));
        }
        Ok(out)
    }

    /// x-day moving average per held symbol at `date`, formatted.
    pub fn all_moving_averages(
        &mut self,
        name: &str,
        owner: &str,
        date: CalendarDate,
        window: usize,
    ) -> Result<BTreeMap<String, String>, ModelError> {
        let portfolio = self.repository.get(name, owner)?;
        let mut out = BTreeMap::new();
        for holding in portfolio.holdings() {
            let series = self.prices.series(holding.symbol())?;
            let average = stats::moving_average(series, date, window)?;
            out.insert(holding.symbol().to_string(), format!("${average:.2}"));
        }
        Ok(out)
    }

    /// x-day crossover per held symbol over [start, end], as "Yes"/"No".
    pub fn all_crossovers(
        &mut self,
        name: &str,
        owner: &str,
        start: CalendarDate,
        end: CalendarDate,
        window: usize,
    ) -> Result<BTreeMap<String, String>, ModelError> {
        let portfolio = self.repository.get(name, owner)?;
        let mut out = BTreeMap::new();
        for holding in portfolio.holdings() {
            let series = self.prices.series(holding.symbol())?;
            let crossed = stats::crossover(series, start, end, window)?;
            out.insert(
                holding.symbol().to_string(),
                if crossed { "Yes" } else { "No" }.to_string(),
            );
        }
        Ok(out)
    }

    pub fn composition(
        &mut self,
        name: &str,
        owner: &str,
        date: CalendarDate,
    ) -> Result<BTreeMap<String, f64>, ModelError> {
        let portfolio = self.repository.get(name, owner)?;
        valuation::composition(portfolio, &mut self.prices, date)
    }

    pub fn value(
        &mut self,
        name: &str,
        owner: &str,
        date: CalendarDate,
    ) -> Result<f64, ModelError> {
        let portfolio = self.repository.get(name, owner)?;
        valuation::value(portfolio, &mut self.prices, date)
    }

    pub fn distribution(
        &mut self,
        name: &str,
        owner: &str,
        date: CalendarDate,
    ) -> Result<BTreeMap<String, String>, ModelError> {
        let portfolio = self.repository.get(name, owner)?;
        valuation::distribution(portfolio, &mut self.prices, date)
    }

    pub fn rebalance(
        &mut self,
        name: &str,
        owner: &str,
        date: CalendarDate,
        weights: &BTreeMap<String, f64>,
    ) -> Result<(), ModelError> {
        let portfolio = self.repository.get_mut(name, owner)?;
        valuation::rebalance(portfolio, &mut self.prices, date, weights)
    }

    /// Read access to one portfolio, for rendering and snapshots.
    pub fn portfolio(&self, name: &str, owner: &str) -> Result<&Portfolio, ModelError> {
        self.repository.get(name, owner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::StaticProvider;
    use crate::stats::testing::date;
    use crate::valuation::testing::{temp_cache, AAPL_PAYLOAD, MSFT_PAYLOAD};

    fn service() -> (PortfolioService, std::path::PathBuf) {
        let (prices, dir) = temp_cache(StaticProvider::from_pairs(&[
            ("AAPL", AAPL_PAYLOAD),
            ("MSFT", MSFT_PAYLOAD),
        ]));
        let mut svc = PortfolioService::new(prices);
        svc.create_portfolio("P1", "Owner").unwrap();
        (svc, dir)
    }

    #[test]
    fn buy_rejects_fractional_and_non_positive_shares() {
        let (mut svc, dir) = service();
        for shares in [10.5, 0.0, -3.0, f64::NAN] {
            let err = svc
                .buy("P1", "Owner", "AAPL", shares, date(2024, 6, 6))
                .unwrap_err();
            assert!(matches!(err, ModelError::InvalidArgument(_)), "{shares}");
        }
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn buy_requires_a_trading_day() {
        let (mut svc, dir) = service();
        let err = svc
            .buy("P1", "Owner", "AAPL", 10.0, date(2024, 6, 8))
            .unwrap_err();
        assert!(matches!(err, ModelError::DateNotFound { .. }));
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn buy_normalizes_symbol_case() {
        let (mut svc, dir) = service();
        svc.buy("P1", "Owner", "aapl", 10.0, date(2024, 6, 6))
            .unwrap();
        let p = svc.portfolio("P1", "Owner").unwrap();
        assert_eq!(p.holding("AAPL").unwrap().shares(), 10.0);
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn sell_on_missing_portfolio_is_not_found() {
        let (mut svc, dir) = service();
        let err = svc
            .sell("Nope", "Owner", "AAPL", 1.0, date(2024, 6, 6))
            .unwrap_err();
        assert!(matches!(err, ModelError::PortfolioNotFound { .. }));
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn fractional_sell_is_allowed() {
        let (mut svc, dir) = service();
        svc.buy("P1", "Owner", "AAPL", 10.0, date(2024, 6, 5))
            .unwrap();
        svc.sell("P1", "Owner", "AAPL", 2.5, date(2024, 6, 6))
            .unwrap();
        let p = svc.portfolio("P1", "Owner").unwrap();
        assert_eq!(p.holding("AAPL").unwrap().shares(), 7.5);
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn aggregates_cover_every_holding() {
        let (mut svc, dir) = service();
        svc.buy("P1", "Owner", "AAPL", 10.0, date(2024, 6, 5))
            .unwrap();
        svc.buy("P1", "Owner", "MSFT", 4.0, date(2024, 6, 5))
            .unwrap();

        let closes = svc
            .all_closing_prices("P1", "Owner", date(2024, 6, 6))
            .unwrap();
        assert_eq!(closes["AAPL"], "$196.89");
        assert_eq!(closes["MSFT"], "$424.52");

        let changes = svc
            .all_price_changes("P1", "Owner", date(2024, 6, 3), date(2024, 6, 6))
            .unwrap();
        assert_eq!(changes["AAPL"], "$2.86");
        assert_eq!(changes["MSFT"], "$11.00");

        let crossovers = svc
            .all_crossovers("P1", "Owner", date(2024, 6, 3), date(2024, 6, 6), 2)
            .unwrap();
        assert_eq!(crossovers.len(), 2);
        for result in crossovers.values() {
            assert!(result == "Yes" || result == "No");
        }
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn one_bad_symbol_fails_the_whole_aggregate() {
        let (mut svc, dir) = service();
        svc.buy("P1", "Owner", "AAPL", 10.0, date(2024, 6, 5))
            .unwrap();
        // Inject a holding the provider cannot serve.
        let mut broken = Portfolio::new("P1", "Owner");
        broken.record_buy("AAPL", 10.0, date(2024, 6, 5));
        broken.record_buy("NOPE", 1.0, date(2024, 6, 5));
        svc.repository_mut().put(broken);

        let err = svc
            .all_closing_prices("P1", "Owner", date(2024, 6, 6))
            .unwrap_err();
        assert!(matches!(err, ModelError::Data(_)));
        let _ = std::fs::remove_dir_all(&dir);
    }
}
