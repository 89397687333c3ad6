//! Portfolio valuation: composition, value, distribution, rebalancing.

pub mod rebalance;
pub mod report;

pub use rebalance::rebalance;
pub use report::{composition, distribution, value};
