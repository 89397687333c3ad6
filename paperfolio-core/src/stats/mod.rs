//! Per-symbol statistics over a `PriceSeries`.
//!
//! All functions take exact trading-day query dates: an absent date is a
//! `DateNotFound` error, never a nearest-bar fallback. Range operations
//! require the end date to resolve to the same-or-later index than the start
//! (the series is ascending by date).

pub mod crossover;
pub mod moving_average;
pub mod price_change;

pub use crossover::crossover;
pub use moving_average::moving_average;
pub use price_change::price_change;
