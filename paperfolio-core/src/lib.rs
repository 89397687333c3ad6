//! Paperfolio Core — virtual stock portfolios over daily closing prices.
//!
//! This crate contains the whole engine:
//! - Domain types (calendar dates, price bars and series, holdings,
//!   transaction records, portfolios)
//! - Price statistics (price change, moving average, crossover)
//! - A read-through price cache backed by on-disk CSV and a pluggable
//!   provider (Alpha Vantage by default)
//! - Portfolio valuation (composition, value, distribution, rebalancing)
//! - JSON snapshot persistence
//! - `PortfolioService`, the single entry point tying it all together

pub mod data;
pub mod domain;
pub mod error;
pub mod persist;
pub mod repository;
pub mod service;
pub mod stats;
pub mod valuation;

pub use error::ModelError;
pub use service::PortfolioService;
