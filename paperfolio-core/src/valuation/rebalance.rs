//! Rebalancing toward target value weights.

use super::report::{composition, value};
use crate::data::PriceCache;
use crate::domain::{CalendarDate, Portfolio};
use crate::error::ModelError;
use std::collections::BTreeMap;
use tracing::debug;

/// Adjusts holdings toward `weights` (fraction of total value per symbol) by
/// buying and selling at `date`'s closing prices.
///
/// `weights` is keyed by symbol; every symbol in the current composition must
/// have a non-negative weight. Weights are not required to sum to 1 — a
/// shortfall simply leaves value unallocated.
///
/// This is a greedy single pass in symbol order: each symbol's target is
/// computed against the total value measured before the pass, and earlier
/// buys/sells do not update that total for later symbols. Buys round down to
/// whole shares; sells may be fractional. The pass therefore approximates the
/// targets rather than hitting them exactly.
pub fn rebalance(
    portfolio: &mut Portfolio,
    prices: &mut PriceCache,
    date: CalendarDate,
    weights: &BTreeMap<String, f64>,
) -> Result<(), ModelError> {
    let total = value(portfolio, prices, date)?;
    let current = composition(portfolio, prices, date)?;

    for (symbol, weight) in weights {
        if !weight.is_finite() || *weight < 0.0 {
            return Err(ModelError::InvalidArgument(format!(
                "weight for {symbol} must be a non-negative fraction, got {weight}"
            )));
        }
    }
    for symbol in current.keys() {
        if !weights.contains_key(symbol) {
            return Err(ModelError::InvalidArgument(format!(
                "no target weight given for held symbol {symbol}"
            )));
        }
    }

    for (symbol, shares) in &current {
        let close = prices.series(symbol)?.closing_price(date)?;
        let current_value = shares * close;
        let target_value = total * weights[symbol];
        let difference = target_value - current_value;

        if difference > 0.0 {
            let to_buy = (difference / close).floor();
            if to_buy >= 1.0 {
                debug!(%symbol, shares = to_buy, "rebalance buy");
                portfolio.record_buy(symbol, to_buy, date);
            }
        } else if difference < 0.0 {
            let to_sell = -difference / close;
            debug!(%symbol, shares = to_sell, "rebalance sell");
            portfolio.record_sell(symbol, to_sell, date);
        }
    }
    Ok(())
}
