//! x-day crossover: does the close stay at or above its own moving average?

use super::moving_average::moving_average;
use crate::domain::{CalendarDate, PriceSeries};
use crate::error::ModelError;

/// True iff every bar from `start` to `end` (inclusive) closes at or above
/// its own `window`-day moving average.
///
/// Endpoint presence and ordering constraints match `price_change`.
/// Aggregation layers render the result as "Yes"/"No".
pub fn crossover(
    series: &PriceSeries,
    start: CalendarDate,
    end: CalendarDate,
    window: usize,
) -> Result<bool, ModelError> {
    let start_idx = series.index_of(start)?;
    let end_idx = series.index_of(end)?;
    if end_idx < start_idx {
        return Err(ModelError::InvalidRange { start, end });
    }
    for bar in &series.bars()[start_idx..=end_idx] {
        let average = moving_average(series, bar.date, window)?;
        if bar.close < average {
            return Ok(false);
        }
    }
    Ok(true)
}
