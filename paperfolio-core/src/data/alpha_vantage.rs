//! Alpha Vantage price provider.
//!
//! Fetches full daily history as CSV from the `TIME_SERIES_DAILY` endpoint.
//! Alpha Vantage reports unknown symbols and rate limits inside a 200
//! response, so the payload header is the real success signal: anything
//! without the `timestamp,open,high,low,close,volume` header is treated as
//! "no data for this symbol".

use super::provider::{DataError, PriceProvider};
use std::time::Duration;
use tracing::debug;

const EXPECTED_HEADER: &str = "timestamp,open,high,low,close,volume";

pub struct AlphaVantageProvider {
    client: reqwest::blocking::Client,
    api_key: String,
    base_url: String,
}

impl AlphaVantageProvider {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_base_url(api_key, "https://www.alphavantage.co")
    }

    /// Points the provider at a different host. Used by tests and proxies.
    pub fn with_base_url(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("failed to build HTTP client");
        Self {
            client,
            api_key: api_key.into(),
            base_url: base_url.into(),
        }
    }

    fn query_url(&self, symbol: &str) -> String {
        format!(
            "{}/query?function=TIME_SERIES_DAILY&outputsize=full\
             &symbol={symbol}&apikey={}&datatype=csv",
            self.base_url, self.api_key
        )
    }
}

impl PriceProvider for AlphaVantageProvider {
    fn name(&self) -> &str {
        "alphavantage"
    }

    fn fetch(&self, symbol: &str) -> Result<String, DataError> {
        let url = self.query_url(symbol);
        debug!(symbol, provider = self.name(), "fetching daily history");

        let network_err = |reason: String| DataError::Network {
            symbol: symbol.to_string(),
            reason,
        };
        let response = self.client.get(&url).send().map_err(|e| network_err(e.to_string()))?;
        if !response.status().is_success() {
            return Err(network_err(format!("HTTP status {}", response.status())));
        }
        let body = response.text().map_err(|e| network_err(e.to_string()))?;

        if !body.contains(EXPECTED_HEADER) {
            return Err(DataError::SymbolNotFound {
                symbol: symbol.to_string(),
            });
        }
        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_url_carries_symbol_key_and_format() {
        let provider = AlphaVantageProvider::with_base_url("demo", "http://localhost:9999");
        let url = provider.query_url("AAPL");
        assert!(url.starts_with("http://localhost:9999/query?"));
        assert!(url.contains("function=TIME_SERIES_DAILY"));
        assert!(url.contains("symbol=AAPL"));
        assert!(url.contains("apikey=demo"));
        assert!(url.contains("datatype=csv"));
    }
}
