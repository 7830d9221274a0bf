//! Configuration for persisted pricing state.

use crate::error::{PricingError, Result};
use crate::overrides::{OverrideStore, DEFAULT_OVERRIDES_KEY};
use crate::rate_cache::{RateCache, DEFAULT_RATE_KEY, DEFAULT_RATE_TTL_MINUTES};
use crate::storage::{FileStorage, MemoryStorage, Storage};
use chrono::Duration;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Where and how pricing state is persisted.
///
/// Every field has a default, so a config file only needs the fields it
/// changes.
///
/// # Examples
///
/// ```rust
/// use buildprice::PricingConfig;
///
/// let config = PricingConfig::from_json_str(r#"{"rateTtlMinutes": 5}"#).unwrap();
/// assert_eq!(config.rate_ttl_minutes, 5);
/// assert_eq!(config.overrides_key, "poe:priceOverridesDivine");
/// assert!(config.storage_dir.is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PricingConfig {
    /// Directory for persisted state. In-memory storage when unset.
    pub storage_dir: Option<PathBuf>,

    pub overrides_key: String,
    pub rate_key: String,
    pub rate_ttl_minutes: i64,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            storage_dir: None,
            overrides_key: DEFAULT_OVERRIDES_KEY.to_string(),
            rate_key: DEFAULT_RATE_KEY.to_string(),
            rate_ttl_minutes: DEFAULT_RATE_TTL_MINUTES,
        }
    }
}

impl PricingConfig {
    /// Parse and validate configuration JSON.
    pub fn from_json_str(text: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(text).map_err(|e| PricingError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check that every value is usable. The TTL must be a positive number
    /// of minutes that fits a [`Duration`].
    pub fn validate(&self) -> Result<()> {
        if Self::ttl_from_minutes(self.rate_ttl_minutes).is_none() {
            return Err(PricingError::Config(format!(
                "rateTtlMinutes must be positive and in range, got {}",
                self.rate_ttl_minutes
            )));
        }
        Ok(())
    }

    /// Load configuration from a JSON file, or the defaults if it doesn't exist.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let text = fs::read_to_string(path)
            .map_err(|e| PricingError::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_json_str(&text)
    }

    /// The rate cache TTL. Falls back to the default if the field was set
    /// out of range after validation.
    pub fn rate_ttl(&self) -> Duration {
        Self::ttl_from_minutes(self.rate_ttl_minutes)
            .or_else(|| Self::ttl_from_minutes(DEFAULT_RATE_TTL_MINUTES))
            .unwrap_or_else(Duration::zero)
    }

    fn ttl_from_minutes(minutes: i64) -> Option<Duration> {
        Duration::try_minutes(minutes).filter(|ttl| *ttl > Duration::zero())
    }

    /// The configured storage backend, shareable between the override
    /// store and the rate cache.
    pub fn open_storage(&self) -> Arc<dyn Storage> {
        match &self.storage_dir {
            Some(dir) => Arc::new(FileStorage::new(dir)),
            None => Arc::new(MemoryStorage::new()),
        }
    }

    /// Open the override store under the configured key.
    pub fn override_store<S: Storage>(&self, storage: S) -> OverrideStore<S> {
        OverrideStore::open_at(storage, self.overrides_key.clone())
    }

    /// Build the rate cache under the configured key and TTL.
    pub fn rate_cache<S: Storage>(&self, storage: S) -> RateCache<S> {
        RateCache::new(storage)
            .with_key(self.rate_key.clone())
            .with_ttl(self.rate_ttl())
    }
}
