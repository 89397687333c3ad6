//! Price provider trait and structured data-layer errors.
//!
//! The `PriceProvider` trait abstracts over market-data sources so the cache
//! can swap implementations and tests can run offline. Providers return the
//! raw comma-delimited payload; parsing and caching sit above the trait.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use thiserror::Error;

/// Failures in the fetch/parse/cache pipeline.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("network error fetching {symbol}: {reason}")]
    Network { symbol: String, reason: String },

    #[error("no price data for symbol '{symbol}'")]
    SymbolNotFound { symbol: String },

    #[error("malformed provider payload for {symbol}: {reason}")]
    MalformedPayload { symbol: String, reason: String },

    #[error("cache error: {0}")]
    Cache(String),
}

/// A source of daily price history.
///
/// `fetch` returns the raw CSV payload (`timestamp,open,high,low,close,volume`
/// header plus data rows). It is called at most once per symbol per process;
/// the read-through cache above it handles memoization.
pub trait PriceProvider {
    /// Human-readable name of this provider.
    fn name(&self) -> &str;

    /// Fetches the full daily history for `symbol`.
    fn fetch(&self, symbol: &str) -> Result<String, DataError>;
}

impl<P: PriceProvider + ?Sized> PriceProvider for std::sync::Arc<P> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn fetch(&self, symbol: &str) -> Result<String, DataError> {
        (**self).fetch(symbol)
    }
}

/// In-memory provider serving fixed payloads. Used by tests and offline
/// demos; counts fetches so the at-most-once cache contract is checkable.
pub struct StaticProvider {
    payloads: HashMap<String, String>,
    fetch_count: AtomicUsize,
}

impl StaticProvider {
    pub fn new(payloads: HashMap<String, String>) -> Self {
        Self {
            payloads,
            fetch_count: AtomicUsize::new(0),
        }
    }

    /// Convenience constructor from (symbol, payload) pairs.
    pub fn from_pairs(pairs: &[(&str, &str)]) -> Self {
        Self::new(
            pairs
                .iter()
                .map(|(sym, payload)| (sym.to_string(), payload.to_string()))
                .collect(),
        )
    }

    /// How many times `fetch` has been called.
    pub fn fetch_count(&self) -> usize {
        self.fetch_count.load(Ordering::Relaxed)
    }
}

impl PriceProvider for StaticProvider {
    fn name(&self) -> &str {
        "static"
    }

    fn fetch(&self, symbol: &str) -> Result<String, DataError> {
        self.fetch_count.fetch_add(1, Ordering::Relaxed);
        self.payloads
            .get(symbol)
            .cloned()
            .ok_or_else(|| DataError::SymbolNotFound {
                symbol: symbol.to_string(),
            })
    }
}
