//! Domain types: dates, bars, series, holdings, transactions, portfolios.

pub mod bar;
pub mod date;
pub mod holding;
pub mod portfolio;
pub mod series;
pub mod transaction;

pub use bar::PriceBar;
pub use date::{CalendarDate, DateError};
pub use holding::Holding;
pub use portfolio::Portfolio;
pub use series::PriceSeries;
pub use transaction::TransactionRecord;
