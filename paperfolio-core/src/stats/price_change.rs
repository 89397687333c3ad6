//! Closing-price change between two trading days.

use crate::domain::{CalendarDate, PriceSeries};
use crate::error::ModelError;

/// close(end) − close(start).
///
/// Both dates must be present in the series and `end` must not resolve to an
/// earlier bar than `start`. Equal dates yield 0.
pub fn price_change(
    series: &PriceSeries,
    start: CalendarDate,
    end: CalendarDate,
) -> Result<f64, ModelError> {
    let start_idx = series.index_of(start)?;
    let end_idx = series.index_of(end)?;
    if end_idx < start_idx {
        return Err(ModelError::InvalidRange { start, end });
    }
    let bars = series.bars();
    Ok(bars[end_idx].close - bars[start_idx].close)
}
