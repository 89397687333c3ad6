//! x-day moving average anchored at a trading day.

use crate::domain::{CalendarDate, PriceSeries};
use crate::error::ModelError;

/// Average of the closes of `window` consecutive bars starting at `date` and
/// walking forward (toward later dates).
///
/// `window == 0` returns the close at `date` itself.
///
/// When fewer than `window` bars remain after `date`, only the available bars
/// are summed but the divisor stays `window`, so the statistic undercounts
/// near the end of a series. Callers relying on snapshot compatibility depend
/// on that exact behavior.
pub fn moving_average(
    series: &PriceSeries,
    date: CalendarDate,
    window: usize,
) -> Result<f64, ModelError> {
    let anchor = series.index_of(date)?;
    let bars = series.bars();
    if window == 0 {
        return Ok(bars[anchor].close);
    }
    let end = (anchor + window).min(bars.len());
    let sum: f64 = bars[anchor..end].iter().map(|b| b.close).sum();
    Ok(sum / window as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::testing::{assert_approx, date, make_daily_series, DEFAULT_EPSILON};

    #[test]
    fn window_over_full_span() {
        let series = make_daily_series("T", date(2024, 1, 2), &[10.0, 11.0, 12.0, 13.0, 14.0]);
        // Anchored at the first bar: mean(10,11,12) = 11.
        let avg = moving_average(&series, date(2024, 1, 2), 3).unwrap();
        assert_approx(avg, 11.0, DEFAULT_EPSILON);
        // Anchored mid-series: mean(12,13,14) = 13.
        let avg = moving_average(&series, date(2024, 1, 4), 3).unwrap();
        assert_approx(avg, 13.0, DEFAULT_EPSILON);
    }

    #[test]
    fn window_zero_is_the_close_itself() {
        let series = make_daily_series("T", date(2024, 1, 2), &[100.0, 200.0, 300.0]);
        let avg = moving_average(&series, date(2024, 1, 3), 0).unwrap();
        assert_eq!(avg, 200.0);
    }

    #[test]
    fn short_tail_keeps_requested_divisor() {
        let series = make_daily_series("T", date(2024, 1, 2), &[10.0, 20.0, 30.0]);
        // Anchored at the last bar with window 4: only 30.0 is summed,
        // divisor stays 4.
        let avg = moving_average(&series, date(2024, 1, 4), 4).unwrap();
        assert_approx(avg, 7.5, DEFAULT_EPSILON);
    }

    #[test]
    fn absent_anchor_is_date_not_found() {
        let series = make_daily_series("T", date(2024, 1, 2), &[10.0, 20.0]);
        let err = moving_average(&series, date(2024, 1, 10), 2).unwrap_err();
        assert!(matches!(err, ModelError::DateNotFound { .. }));
    }
}
