use super::error::WeatherError;
use super::types::{CurrentWeatherReport, GroupedForecast};
use async_trait::async_trait;
use moka::future::Cache;
use moka::Expiry;
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

pub const CACHE_TTL: Duration = Duration::from_secs(300);
pub const CACHE_MAX_CAPACITY: u64 = 1000;

/// What a cache slot holds. The key prefix decides the variant.
#[derive(Clone, Debug, PartialEq)]
pub enum CachedWeather {
    Current(CurrentWeatherReport),
    Forecast(GroupedForecast),
}

/// Cache keys, one namespace per read path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheKey<'a> {
    Weather(&'a str),
    Forecast(&'a str),
}

impl std::fmt::Display for CacheKey<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CacheKey::Weather(city) => write!(f, "weather_{}", city),
            CacheKey::Forecast(city) => write!(f, "forecast_{}", city),
        }
    }
}

/// Values that can live in the weather cache.
pub trait CacheValue: Clone + Send + Sized {
    fn into_cached(self) -> CachedWeather;
    fn from_cached(cached: CachedWeather) -> Option<Self>;
}

impl CacheValue for CurrentWeatherReport {
    fn into_cached(self) -> CachedWeather {
        CachedWeather::Current(self)
    }

    fn from_cached(cached: CachedWeather) -> Option<Self> {
        match cached {
            CachedWeather::Current(report) => Some(report),
            CachedWeather::Forecast(_) => None,
        }
    }
}

impl CacheValue for GroupedForecast {
    fn into_cached(self) -> CachedWeather {
        CachedWeather::Forecast(self)
    }

    fn from_cached(cached: CachedWeather) -> Option<Self> {
        match cached {
            CachedWeather::Forecast(grouped) => Some(grouped),
            CachedWeather::Current(_) => None,
        }
    }
}

/// Key-value store with per-entry expiry.
#[async_trait]
pub trait CacheStore: Send + Sync {
    async fn get(&self, key: &str) -> Option<CachedWeather>;
    async fn set(&self, key: String, value: CachedWeather, ttl: Duration);
}

#[derive(Clone, Debug)]
struct TimedEntry {
    value: CachedWeather,
    ttl: Duration,
}

struct PerEntryTtl;

impl Expiry<String, TimedEntry> for PerEntryTtl {
    fn expire_after_create(&self, _key: &String, value: &TimedEntry, _created_at: Instant) -> Option<Duration> {
        Some(value.ttl)
    }

    // A re-store restarts the clock.
    fn expire_after_update(
        &self,
        _key: &String,
        value: &TimedEntry,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        Some(value.ttl)
    }
}

/// In-process store backed by moka.
#[derive(Clone)]
pub struct MokaStore {
    cache: Cache<String, TimedEntry>,
}

impl MokaStore {
    pub fn new(max_capacity: u64) -> Self {
        let cache = Cache::builder()
            .max_capacity(max_capacity)
            .expire_after(PerEntryTtl)
            .build();

        Self { cache }
    }
}

impl Default for MokaStore {
    fn default() -> Self {
        Self::new(CACHE_MAX_CAPACITY)
    }
}

#[async_trait]
impl CacheStore for MokaStore {
    async fn get(&self, key: &str) -> Option<CachedWeather> {
        self.cache.get(key).await.map(|entry| entry.value)
    }

    async fn set(&self, key: String, value: CachedWeather, ttl: Duration) {
        self.cache.insert(key, TimedEntry { value, ttl }).await;
    }
}

/// Get-or-compute wrapper around a [`CacheStore`].
///
/// Errors are never stored. Concurrent misses on one key each run their
/// own computation and the last write wins.
#[derive(Clone)]
pub struct CacheAside {
    store: Arc<dyn CacheStore>,
}

impl CacheAside {
    pub fn new(store: Arc<dyn CacheStore>) -> Self {
        Self { store }
    }

    pub async fn get_or_compute<T, F, Fut>(&self, key: &str, ttl: Duration, compute: F) -> Result<T, WeatherError>
    where
        T: CacheValue,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, WeatherError>>,
    {
        if let Some(cached) = self.store.get(key).await {
            match T::from_cached(cached) {
                Some(value) => {
                    tracing::debug!(key, "Cache hit");
                    return Ok(value);
                }
                None => tracing::warn!(key, "Cached value has unexpected shape, recomputing"),
            }
        }

        tracing::debug!(key, "Cache miss");
        let value = compute().await?;
        self.store
            .set(key.to_string(), value.clone().into_cached(), ttl)
            .await;

        Ok(value)
    }
}
