//! PriceBar — one historical trading day for one symbol.

use super::date::CalendarDate;
use serde::{Deserialize, Serialize};

/// Daily OHLCV bar.
///
/// Bars are created only by the ingest path (`data::parse`) and are never
/// mutated afterwards. Volume is kept as a real to match provider payloads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    pub date: CalendarDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl PriceBar {
    /// Basic OHLCV sanity check: all fields finite and non-negative,
    /// high/low bracket open and close.
    pub fn is_sane(&self) -> bool {
        let fields = [self.open, self.high, self.low, self.close, self.volume];
        if fields.iter().any(|v| !v.is_finite() || *v < 0.0) {
            return false;
        }
        self.high >= self.low
            && self.high >= self.open
            && self.high >= self.close
            && self.low <= self.open
            && self.low <= self.close
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_bar() -> PriceBar {
        PriceBar {
            date: CalendarDate::new(2024, 5, 20).unwrap(),
            open: 178.0,
            high: 179.5,
            low: 177.1,
            close: 178.46,
            volume: 44_000_000.0,
        }
    }

    #[test]
    fn bar_is_sane() {
        assert!(sample_bar().is_sane());
    }

    #[test]
    fn bar_detects_inverted_high_low() {
        let mut bar = sample_bar();
        bar.high = 176.0; // below low
        assert!(!bar.is_sane());
    }

    #[test]
    fn bar_rejects_negative_and_nan() {
        let mut bar = sample_bar();
        bar.volume = -1.0;
        assert!(!bar.is_sane());
        let mut bar = sample_bar();
        bar.close = f64::NAN;
        assert!(!bar.is_sane());
    }

    #[test]
    fn bar_serialization_roundtrip() {
        let bar = sample_bar();
        let json = serde_json::to_string(&bar).unwrap();
        let back: PriceBar = serde_json::from_str(&json).unwrap();
        assert_eq!(back, bar);
    }
}
