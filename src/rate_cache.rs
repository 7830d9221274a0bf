//! Time-boxed cache of the chaos → divine exchange rate.
//!
//! The rate itself comes from an external market data source, modelled by
//! the [`RateSource`] trait. The cache persists the last fetched rate with
//! its league and timestamp, and serves it until it is older than the TTL
//! or a different league is asked for.

use crate::error::{PricingError, Result};
use crate::storage::Storage;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Storage key the cached rate is persisted under by default.
pub const DEFAULT_RATE_KEY: &str = "poe:divineRate";

/// How long a fetched rate stays valid by default.
pub const DEFAULT_RATE_TTL_MINUTES: i64 = 30;

/// League used when no challenge league is running.
pub const DEFAULT_LEAGUE: &str = "Standard";

/// External market data the cache fetches from.
pub trait RateSource {
    /// Ids of the currently running leagues.
    fn leagues(&self) -> Result<Vec<String>>;

    /// How many chaos orbs one divine orb is worth in `league`.
    fn chaos_per_divine(&self, league: &str) -> Result<f64>;
}

/// Pick the league to price in: the first league that is neither a
/// Standard nor a Hardcore league, else Standard.
///
/// # Examples
///
/// ```rust
/// use buildprice::rate_cache::pick_league;
///
/// let ids = vec!["Standard".to_string(), "Hardcore".to_string(), "Settlers".to_string()];
/// assert_eq!(pick_league(&ids), "Settlers");
///
/// let ids = vec!["Standard".to_string(), "SSF Hardcore".to_string()];
/// assert_eq!(pick_league(&ids), "Standard");
/// ```
pub fn pick_league(ids: &[String]) -> String {
    ids.iter()
        .find(|id| {
            let lower = id.to_lowercase();
            !lower.contains("standard") && !lower.contains("hardcore")
        })
        .cloned()
        .unwrap_or_else(|| DEFAULT_LEAGUE.to_string())
}

/// The persisted cache record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RateCacheEntry {
    pub league: String,
    pub chaos_per_divine: f64,

    #[serde(rename = "ts", with = "chrono::serde::ts_milliseconds")]
    pub fetched_at: DateTime<Utc>,
}

impl RateCacheEntry {
    /// Whether this record can answer for `league` at `now`.
    pub fn is_fresh(&self, league: &str, now: DateTime<Utc>, ttl: Duration) -> bool {
        self.league == league && now - self.fetched_at < ttl
    }
}

/// A resolved rate for the active league.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveRate {
    pub league: String,
    pub chaos_per_divine: f64,
    pub divine_per_chaos: f64,
}

impl LiveRate {
    pub fn new(league: impl Into<String>, chaos_per_divine: f64) -> Self {
        Self {
            league: league.into(),
            chaos_per_divine,
            divine_per_chaos: 1.0 / chaos_per_divine,
        }
    }

    pub fn to_chaos(&self, divine: f64) -> f64 {
        divine * self.chaos_per_divine
    }

    pub fn to_divine(&self, chaos: f64) -> f64 {
        chaos * self.divine_per_chaos
    }
}

/// The rate cache bound to its storage.
///
/// # Examples
///
/// ```rust
/// use buildprice::rate_cache::{RateCache, RateSource};
/// use buildprice::storage::MemoryStorage;
/// use buildprice::Result;
///
/// struct Fixed;
///
/// impl RateSource for Fixed {
///     fn leagues(&self) -> Result<Vec<String>> {
///         Ok(vec!["Standard".into(), "Settlers".into()])
///     }
///     fn chaos_per_divine(&self, _league: &str) -> Result<f64> {
///         Ok(200.0)
///     }
/// }
///
/// let cache = RateCache::new(MemoryStorage::new());
/// let live = cache.live(&Fixed).unwrap();
/// assert_eq!(live.league, "Settlers");
/// assert_eq!(live.to_chaos(0.25), 50.0);
/// ```
pub struct RateCache<S: Storage> {
    storage: S,
    storage_key: String,
    ttl: Duration,
}

impl<S: Storage> RateCache<S> {
    /// A cache under [`DEFAULT_RATE_KEY`] with the default TTL.
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            storage_key: DEFAULT_RATE_KEY.to_string(),
            ttl: Duration::minutes(DEFAULT_RATE_TTL_MINUTES),
        }
    }

    pub fn with_key(mut self, storage_key: impl Into<String>) -> Self {
        self.storage_key = storage_key.into();
        self
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// The persisted record, if any. Unreadable state counts as a miss.
    pub fn stored(&self) -> Option<RateCacheEntry> {
        let text = match self.storage.read(&self.storage_key) {
            Ok(text) => text?,
            Err(err) => {
                log::warn!("could not read cached rate: {}", err);
                return None;
            }
        };
        serde_json::from_str(&text)
            .map_err(|err| log::warn!("ignoring corrupt cached rate: {}", err))
            .ok()
    }

    /// The cached rate for `league` if it is still fresh at `now`.
    pub fn cached_at(&self, league: &str, now: DateTime<Utc>) -> Option<f64> {
        self.stored()
            .filter(|entry| entry.is_fresh(league, now, self.ttl))
            .map(|entry| entry.chaos_per_divine)
    }

    /// Chaos per divine for `league`, fetching from `source` on a miss.
    pub fn rate_at(
        &self,
        league: &str,
        source: &dyn RateSource,
        now: DateTime<Utc>,
    ) -> Result<f64> {
        if let Some(rate) = self.cached_at(league, now) {
            return Ok(rate);
        }

        let rate = source.chaos_per_divine(league)?;
        if !rate.is_finite() || rate <= 0.0 {
            return Err(PricingError::RateUnavailable(format!(
                "{} returned {}",
                league, rate
            )));
        }

        let entry = RateCacheEntry {
            league: league.to_string(),
            chaos_per_divine: rate,
            fetched_at: now,
        };
        // The fetched rate is still usable when it cannot be cached.
        match serde_json::to_string(&entry) {
            Ok(text) => {
                if let Err(err) = self.storage.write(&self.storage_key, &text) {
                    log::warn!("could not cache rate: {}", err);
                }
            }
            Err(err) => log::warn!("could not encode rate: {}", err),
        }

        log::debug!("fetched rate for {}: {} chaos per divine", league, rate);
        Ok(rate)
    }

    /// Chaos per divine for `league` as of now.
    pub fn rate(&self, league: &str, source: &dyn RateSource) -> Result<f64> {
        self.rate_at(league, source, Utc::now())
    }

    /// Pick the active league from `source` and resolve its rate at `now`.
    pub fn live_at(&self, source: &dyn RateSource, now: DateTime<Utc>) -> Result<LiveRate> {
        let league = pick_league(&source.leagues()?);
        let rate = self.rate_at(&league, source, now)?;
        Ok(LiveRate::new(league, rate))
    }

    /// Pick the active league from `source` and resolve its rate as of now.
    pub fn live(&self, source: &dyn RateSource) -> Result<LiveRate> {
        self.live_at(source, Utc::now())
    }
}
