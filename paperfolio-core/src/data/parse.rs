//! CSV payload parsing into a `PriceSeries`.

use super::provider::DataError;
use crate::domain::{CalendarDate, PriceBar, PriceSeries};

/// Parses a `timestamp,open,high,low,close,volume` payload.
///
/// The header row is skipped; rows with a wrong column count are silently
/// dropped. Rows with the right shape but unparseable or implausible fields
/// (high below low, negative volume) are an error — that is corrupt data, not
/// a formatting quirk. Provider payloads arrive newest-first;
/// `PriceSeries::new` sorts ascending.
pub fn parse_daily_csv(symbol: &str, payload: &str) -> Result<PriceSeries, DataError> {
    let malformed = |reason: String| DataError::MalformedPayload {
        symbol: symbol.to_string(),
        reason,
    };

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(payload.as_bytes());

    let mut bars = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| malformed(e.to_string()))?;
        if record.len() != 6 {
            continue;
        }
        let date: CalendarDate = record[0]
            .parse()
            .map_err(|e: crate::domain::DateError| malformed(e.to_string()))?;
        let field = |i: usize| -> Result<f64, DataError> {
            record[i]
                .parse()
                .map_err(|_| malformed(format!("bad number '{}' at column {i}", &record[i])))
        };
        let bar = PriceBar {
            date,
            open: field(1)?,
            high: field(2)?,
            low: field(3)?,
            close: field(4)?,
            volume: field(5)?,
        };
        if !bar.is_sane() {
            return Err(malformed(format!("implausible OHLCV row for {date}")));
        }
        bars.push(bar);
    }

    if bars.is_empty() {
        return Err(malformed("no data rows".to_string()));
    }
    Ok(PriceSeries::new(symbol, bars))
}
