//! Holding — a (symbol, share count) position inside one portfolio.

use serde::{Deserialize, Serialize};

/// Live position for one ticker.
///
/// Share counts are non-negative reals: buys are whole-share only, but sells
/// accept fractional amounts (the rebalance path produces them), so the
/// running balance is a real number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Holding {
    symbol: String,
    shares: f64,
}

impl Holding {
    pub fn new(symbol: impl Into<String>, shares: f64) -> Self {
        Self {
            symbol: symbol.into(),
            shares,
        }
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn shares(&self) -> f64 {
        self.shares
    }

    pub fn add_shares(&mut self, shares: f64) {
        self.shares += shares;
    }

    /// Removes up to `shares`, clamping the balance at zero.
    pub fn remove_shares(&mut self, shares: f64) {
        self.shares = (self.shares - shares).max(0.0);
    }

    pub fn is_empty(&self) -> bool {
        self.shares == 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_and_remove() {
        let mut h = Holding::new("AAPL", 10.0);
        h.add_shares(5.0);
        assert_eq!(h.shares(), 15.0);
        h.remove_shares(4.5);
        assert_eq!(h.shares(), 10.5);
    }

    #[test]
    fn remove_clamps_at_zero() {
        let mut h = Holding::new("AAPL", 100.0);
        h.remove_shares(150.0);
        assert_eq!(h.shares(), 0.0);
        assert!(h.is_empty());
    }
}
