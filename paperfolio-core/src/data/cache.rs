//! Read-through price cache: memory → on-disk CSV → provider.
//!
//! Layout: `{cache_dir}/{SYMBOL}.csv`, holding the raw provider payload.
//! Disk writes are atomic (write to .tmp, rename into place). Each symbol is
//! fetched from the provider at most once per process; after that the parsed
//! series lives in memory for the process lifetime and is never mutated.

use super::parse::parse_daily_csv;
use super::provider::{DataError, PriceProvider};
use crate::domain::PriceSeries;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// On-disk store for raw CSV payloads.
struct CsvStore {
    cache_dir: PathBuf,
}

impl CsvStore {
    fn new(cache_dir: impl Into<PathBuf>) -> Self {
        Self {
            cache_dir: cache_dir.into(),
        }
    }

    fn payload_path(&self, symbol: &str) -> PathBuf {
        self.cache_dir.join(format!("{symbol}.csv"))
    }

    fn load(&self, symbol: &str) -> Option<String> {
        fs::read_to_string(self.payload_path(symbol)).ok()
    }

    /// Atomic write: .tmp then rename.
    fn store(&self, symbol: &str, payload: &str) -> Result<(), DataError> {
        fs::create_dir_all(&self.cache_dir)
            .map_err(|e| DataError::Cache(format!("failed to create dir: {e}")))?;
        let path = self.payload_path(symbol);
        let tmp_path = path.with_extension("csv.tmp");
        fs::write(&tmp_path, payload)
            .map_err(|e| DataError::Cache(format!("write failed: {e}")))?;
        fs::rename(&tmp_path, &path).map_err(|e| {
            let _ = fs::remove_file(&tmp_path);
            DataError::Cache(format!("atomic rename failed: {e}"))
        })
    }
}

/// The process-lifetime price cache.
pub struct PriceCache {
    store: CsvStore,
    provider: Box<dyn PriceProvider>,
    series: HashMap<String, PriceSeries>,
}

impl PriceCache {
    pub fn new(cache_dir: impl Into<PathBuf>, provider: Box<dyn PriceProvider>) -> Self {
        Self {
            store: CsvStore::new(cache_dir),
            provider,
            series: HashMap::new(),
        }
    }

    /// Root directory of the on-disk cache.
    pub fn cache_dir(&self) -> &Path {
        &self.store.cache_dir
    }

    /// The series for `symbol`, fetching and caching on first use.
    ///
    /// Symbols are normalized to uppercase. I/O failures propagate to the
    /// caller; nothing is retried or swallowed.
    pub fn series(&mut self, symbol: &str) -> Result<&PriceSeries, DataError> {
        let symbol = symbol.to_uppercase();
        if !self.series.contains_key(&symbol) {
            let payload = match self.store.load(&symbol) {
                Some(payload) => {
                    debug!(%symbol, "disk cache hit");
                    payload
                }
                None => {
                    info!(%symbol, provider = self.provider.name(), "fetching price history");
                    let payload = self.provider.fetch(&symbol)?;
                    self.store.store(&symbol, &payload)?;
                    payload
                }
            };
            let series = parse_daily_csv(&symbol, &payload)?;
            self.series.insert(symbol.clone(), series);
        }
        Ok(&self.series[&symbol])
    }

    /// Fetches `symbol` into the disk cache without keeping the series.
    /// Used by the CLI's cache-priming command.
    pub fn prime(&mut self, symbol: &str) -> Result<usize, DataError> {
        Ok(self.series(symbol)?.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::provider::StaticProvider;
    use std::env;
    use std::sync::atomic::{AtomicU64, Ordering};

    static TEST_COUNTER: AtomicU64 = AtomicU64::new(0);

    fn temp_cache_dir() -> PathBuf {
        let id = TEST_COUNTER.fetch_add(1, Ordering::Relaxed);
        let dir = env::temp_dir().join(format!("paperfolio_test_{}_{id}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        dir
    }

    const PAYLOAD: &str = "\
timestamp,open,high,low,close,volume
2024-06-06,195.00,197.10,194.20,196.89,40000000
2024-06-05,194.00,196.20,193.50,195.87,42000000
";

    #[test]
    fn fetches_once_then_serves_from_memory() {
        let dir = temp_cache_dir();
        let provider = std::sync::Arc::new(StaticProvider::from_pairs(&[("AAPL", PAYLOAD)]));
        let mut cache = PriceCache::new(&dir, Box::new(provider.clone()));

        assert_eq!(cache.series("AAPL").unwrap().len(), 2);
        assert_eq!(cache.series("aapl").unwrap().len(), 2);
        assert_eq!(provider.fetch_count(), 1);

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn disk_cache_survives_a_new_process_lifetime() {
        let dir = temp_cache_dir();
        {
            let provider = StaticProvider::from_pairs(&[("AAPL", PAYLOAD)]);
            let mut cache = PriceCache::new(&dir, Box::new(provider));
            cache.prime("AAPL").unwrap();
        }
        // Fresh cache with a provider that knows nothing: disk must serve.
        let empty = StaticProvider::from_pairs(&[]);
        let mut cache = PriceCache::new(&dir, Box::new(empty));
        assert_eq!(cache.series("AAPL").unwrap().len(), 2);

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn unknown_symbol_propagates_provider_error() {
        let dir = temp_cache_dir();
        let provider = StaticProvider::from_pairs(&[]);
        let mut cache = PriceCache::new(&dir, Box::new(provider));
        assert!(matches!(
            cache.series("NOPE"),
            Err(DataError::SymbolNotFound { .. })
        ));

        let _ = fs::remove_dir_all(&dir);
    }
}
