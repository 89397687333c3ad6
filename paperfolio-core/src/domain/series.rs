//! PriceSeries — the ordered daily history for one symbol.
//!
//! Bars are sorted ascending by date with no gap filling: weekends and
//! holidays are simply absent, so an exact-match lookup on such a date is an
//! error, not a nearest-neighbor fallback.

use super::bar::PriceBar;
use super::date::CalendarDate;
use crate::error::ModelError;

/// Immutable per-symbol sequence of daily bars, ascending by date.
#[derive(Debug, Clone)]
pub struct PriceSeries {
    symbol: String,
    bars: Vec<PriceBar>,
}

impl PriceSeries {
    /// Builds a series, sorting bars ascending by date.
    pub fn new(symbol: impl Into<String>, mut bars: Vec<PriceBar>) -> Self {
        bars.sort_by_key(|b| b.date);
        Self {
            symbol: symbol.into(),
            bars,
        }
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn bars(&self) -> &[PriceBar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// Index of the bar dated exactly `date`.
    ///
    /// Callers must pass a trading day; there is no nearest-date fallback.
    pub fn index_of(&self, date: CalendarDate) -> Result<usize, ModelError> {
        self.bars
            .binary_search_by(|bar| bar.date.cmp(&date))
            .map_err(|_| ModelError::DateNotFound {
                symbol: self.symbol.clone(),
                date,
            })
    }

    /// Closing price on exactly `date`.
    pub fn closing_price(&self, date: CalendarDate) -> Result<f64, ModelError> {
        Ok(self.bars[self.index_of(date)?].close)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::testing::{date, make_series};

    #[test]
    fn new_sorts_ascending() {
        let mut bars = make_series("T", &[(date(2024, 5, 20), 1.0), (date(2024, 5, 21), 2.0)])
            .bars()
            .to_vec();
        bars.reverse();
        let series = PriceSeries::new("T", bars);
        assert!(series.bars()[0].date < series.bars()[1].date);
    }

    #[test]
    fn index_of_finds_exact_date() {
        let series = make_series(
            "AAPL",
            &[
                (date(2024, 5, 20), 178.46),
                (date(2024, 5, 21), 179.10),
                (date(2024, 5, 22), 180.02),
            ],
        );
        assert_eq!(series.index_of(date(2024, 5, 21)).unwrap(), 1);
        assert_eq!(series.closing_price(date(2024, 5, 22)).unwrap(), 180.02);
    }

    #[test]
    fn absent_date_is_an_error() {
        // Friday 2024-05-24 and Tuesday 2024-05-28 present; the weekend between is not.
        let series = make_series(
            "AAPL",
            &[(date(2024, 5, 24), 177.0), (date(2024, 5, 28), 178.0)],
        );
        let err = series.closing_price(date(2024, 5, 25)).unwrap_err();
        match err {
            ModelError::DateNotFound { symbol, date: d } => {
                assert_eq!(symbol, "AAPL");
                assert_eq!(d, date(2024, 5, 25));
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
