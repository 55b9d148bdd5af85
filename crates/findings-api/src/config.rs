//! Server configuration from the environment
use std::path::PathBuf;

use findings_core::{Catalog, FindingStore};

use crate::error::ApiError;

pub const DEFAULT_ADDR: &str = "0.0.0.0:8787";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    /// Listen address (`FINDINGS_ADDR`)
    pub addr: String,
    /// Catalog JSON to load at startup (`FINDINGS_CATALOG`); the bundled
    /// demo catalog when unset
    pub catalog_path: Option<PathBuf>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            addr: DEFAULT_ADDR.to_string(),
            catalog_path: None,
        }
    }
}

impl ApiConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let addr = lookup("FINDINGS_ADDR")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_ADDR.to_string());
        let catalog_path = lookup("FINDINGS_CATALOG")
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from);
        Self { addr, catalog_path }
    }

    /// Build the startup store from the configured catalog
    pub fn initial_store(&self) -> Result<FindingStore, ApiError> {
        let catalog = match &self.catalog_path {
            Some(path) => {
                let json = std::fs::read_to_string(path).map_err(|e| {
                    ApiError::Config(format!("cannot read catalog {}: {}", path.display(), e))
                })?;
                tracing::info!(path = %path.display(), "loading catalog file");
                Catalog::from_json(&json)?
            }
            None => {
                tracing::info!("loading bundled demo catalog");
                Catalog::demo()?
            }
        };
        Ok(catalog.into_store()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults_when_unset() {
        let config = ApiConfig::from_lookup(|_| None);
        assert_eq!(config, ApiConfig::default());
        assert_eq!(config.initial_store().unwrap().risk_count(), 7);
    }

    #[test]
    fn test_reads_overrides() {
        let env: HashMap<&str, &str> =
            [("FINDINGS_ADDR", "127.0.0.1:9000"), ("FINDINGS_CATALOG", "/tmp/catalog.json")].into();
        let config = ApiConfig::from_lookup(|k| env.get(k).map(|v| v.to_string()));
        assert_eq!(config.addr, "127.0.0.1:9000");
        assert_eq!(config.catalog_path, Some(PathBuf::from("/tmp/catalog.json")));
    }

    #[test]
    fn test_missing_catalog_file_is_config_error() {
        let config = ApiConfig {
            catalog_path: Some(PathBuf::from("/definitely/not/here.json")),
            ..ApiConfig::default()
        };
        assert!(matches!(config.initial_store(), Err(ApiError::Config(_))));
    }
}
