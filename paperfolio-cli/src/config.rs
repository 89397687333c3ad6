//! CLI configuration from an optional TOML file.
//!
//! Everything has a default, so the file is never required:
//!
//! ```toml
//! cache_dir = "data"
//! api_key = "demo"
//! # base_url = "http://localhost:9999"   # tests and proxies only
//! ```
//!
//! The API key may also come from the `ALPHAVANTAGE_API_KEY` environment
//! variable; the file wins when both are set.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

const API_KEY_ENV: &str = "ALPHAVANTAGE_API_KEY";

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct CliConfig {
    /// Directory for cached CSV price history. Defaults to ./data.
    pub cache_dir: Option<PathBuf>,

    /// Alpha Vantage API key.
    pub api_key: Option<String>,

    /// Override the provider host. Normally unset.
    pub base_url: Option<String>,
}

impl CliConfig {
    /// Loads `path` if given, otherwise `paperfolio.toml` when it exists,
    /// otherwise the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => {
                let default = PathBuf::from("paperfolio.toml");
                if !default.exists() {
                    return Ok(Self::default());
                }
                default
            }
        };
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("reading config {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("parsing config {}", path.display()))
    }

    pub fn cache_dir(&self) -> PathBuf {
        self.cache_dir.clone().unwrap_or_else(|| "data".into())
    }

    /// The configured API key, falling back to the environment, then to the
    /// public `demo` key.
    pub fn api_key(&self) -> String {
        self.api_key
            .clone()
            .or_else(|| std::env::var(API_KEY_ENV).ok())
            .unwrap_or_else(|| "demo".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_file_parses() {
        let cfg: CliConfig = toml::from_str(
            r#"
            cache_dir = "/tmp/prices"
            api_key = "k"
            base_url = "http://localhost:9999"
            "#,
        )
        .unwrap();
        assert_eq!(cfg.cache_dir(), PathBuf::from("/tmp/prices"));
        assert_eq!(cfg.api_key.as_deref(), Some("k"));
        assert_eq!(cfg.base_url.as_deref(), Some("http://localhost:9999"));
    }

    #[test]
    fn empty_file_gets_defaults() {
        let cfg: CliConfig = toml::from_str("").unwrap();
        assert_eq!(cfg.cache_dir(), PathBuf::from("data"));
        assert!(cfg.base_url.is_none());
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(toml::from_str::<CliConfig>("cache_dri = \"typo\"").is_err());
    }
}
