//! Market data: provider abstraction, CSV parsing, and the price cache.

pub mod alpha_vantage;
pub mod cache;
pub mod parse;
pub mod provider;

pub use alpha_vantage::AlphaVantageProvider;
pub use cache::PriceCache;
pub use parse::parse_daily_csv;
pub use provider::{DataError, PriceProvider, StaticProvider};
