//! Composition, value, and value distribution as of a date.

use crate::data::PriceCache;
use crate::domain::{CalendarDate, Portfolio};
use crate::error::ModelError;
use std::collections::BTreeMap;

/// Fails unless every held symbol's series contains `date`.
///
/// Valuation is all-or-nothing: one symbol missing the date aborts the whole
/// call before anything is computed.
pub(crate) fn ensure_trading_day(
    portfolio: &Portfolio,
    prices: &mut PriceCache,
    date: CalendarDate,
) -> Result<(), ModelError> {
    for holding in portfolio.holdings() {
        prices.series(holding.symbol())?.index_of(date)?;
    }
    Ok(())
}

/// Shares held per symbol as of `date`, reconstructed from the ledger.
///
/// Sums buy records dated on or before `date`; sell depletion is already
/// folded into those records' share counts. Only positive accumulations
/// appear. The map is ordered by symbol, which fixes the iteration order for
/// everything built on top (distribution, rebalancing).
pub fn composition(
    portfolio: &Portfolio,
    prices: &mut PriceCache,
    date: CalendarDate,
) -> Result<BTreeMap<String, f64>, ModelError> {
    ensure_trading_day(portfolio, prices, date)?;

    let mut shares_by_symbol: BTreeMap<String, f64> = BTreeMap::new();
    for record in portfolio.ledger() {
        if let Some(purchased) = record.purchase_date() {
            if purchased <= date && record.shares() > 0.0 {
                *shares_by_symbol
                    .entry(record.symbol().to_string())
                    .or_insert(0.0) += record.shares();
            }
        }
    }
    Ok(shares_by_symbol)
}

/// Total portfolio value at `date`: Σ shares × closing price.
///
/// Uses the same on-or-before cutoff as `composition`, so a buy dated
/// exactly `date` counts toward the value on that date.
pub fn value(
    portfolio: &Portfolio,
    prices: &mut PriceCache,
    date: CalendarDate,
) -> Result<f64, ModelError> {
    let mut total = 0.0;
    for (symbol, shares) in composition(portfolio, prices, date)? {
        total += shares * prices.series(&symbol)?.closing_price(date)?;
    }
    Ok(total)
}

/// Per-symbol value at `date`, formatted as currency strings.
pub fn distribution(
    portfolio: &Portfolio,
    prices: &mut PriceCache,
    date: CalendarDate,
) -> Result<BTreeMap<String, String>, ModelError> {
    let mut out = BTreeMap::new();
    for (symbol, shares) in composition(portfolio, prices, date)? {
        let close = prices.series(&symbol)?.closing_price(date)?;
        out.insert(symbol, format!("${:.2}", shares * close));
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::StaticProvider;
    use crate::stats::testing::{assert_approx, date};
    use crate::valuation::testing::{temp_cache, AAPL_PAYLOAD, MSFT_PAYLOAD};

    fn two_stock_portfolio() -> Portfolio {
        let mut p = Portfolio::new("P1", "Owner");
        p.record_buy("AAPL", 10.0, date(2024, 6, 5));
        p.record_buy("MSFT", 4.0, date(2024, 6, 6));
        p
    }

    fn cache() -> (PriceCache, std::path::PathBuf) {
        temp_cache(StaticProvider::from_pairs(&[
            ("AAPL", AAPL_PAYLOAD),
            ("MSFT", MSFT_PAYLOAD),
        ]))
    }

    #[test]
    fn fixture_payloads_pass_ingest_sanity() {
        // The shared payloads must survive the same sanity gate as real
        // provider data, or every test built on them fails at parse.
        for (symbol, payload) in [("AAPL", AAPL_PAYLOAD), ("MSFT", MSFT_PAYLOAD)] {
            let series = crate::data::parse_daily_csv(symbol, payload).unwrap();
            assert_eq!(series.len(), 5);
            assert!(series.bars().iter().all(|b| b.is_sane()));
        }
    }

    #[test]
    fn composition_honors_on_or_before_cutoff() {
        let p = two_stock_portfolio();
        let (mut prices, dir) = cache();

        // On the 5th only the AAPL buy has happened.
        let comp = composition(&p, &mut prices, date(2024, 6, 5)).unwrap();
        assert_eq!(comp.len(), 1);
        assert_eq!(comp["AAPL"], 10.0);

        // On the 6th the MSFT buy (dated exactly that day) is included.
        let comp = composition(&p, &mut prices, date(2024, 6, 6)).unwrap();
        assert_eq!(comp["AAPL"], 10.0);
        assert_eq!(comp["MSFT"], 4.0);

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn fully_sold_symbols_drop_out_of_composition() {
        let mut p = two_stock_portfolio();
        p.record_sell("AAPL", 10.0, date(2024, 6, 6));
        let (mut prices, dir) = cache();

        let comp = composition(&p, &mut prices, date(2024, 6, 6)).unwrap();
        assert!(!comp.contains_key("AAPL"));
        assert_eq!(comp["MSFT"], 4.0);

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn value_is_shares_times_close() {
        let p = two_stock_portfolio();
        let (mut prices, dir) = cache();

        // AAPL closes 196.89, MSFT closes 424.52 on 2024-06-06.
        let total = value(&p, &mut prices, date(2024, 6, 6)).unwrap();
        assert_approx(total, 10.0 * 196.89 + 4.0 * 424.52, 0.001);

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn distribution_formats_currency() {
        let p = two_stock_portfolio();
        let (mut prices, dir) = cache();

        let dist = distribution(&p, &mut prices, date(2024, 6, 6)).unwrap();
        assert_eq!(dist["AAPL"], "$1968.90");
        assert_eq!(dist["MSFT"], "$1698.08");

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn weekend_valuation_fails_whole() {
        let p = two_stock_portfolio();
        let (mut prices, dir) = cache();

        // 2024-06-08 is a Saturday: no partial result, just an error.
        let err = value(&p, &mut prices, date(2024, 6, 8)).unwrap_err();
        assert!(matches!(err, ModelError::DateNotFound { .. }));

        let _ = std::fs::remove_dir_all(&dir);
    }
}
