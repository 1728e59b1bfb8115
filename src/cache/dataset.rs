//! Time-limited cache for the decoded dataset

use chrono::Duration;
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, info, warn};

use super::CacheManager;

/// Cache key (and file stem) of the dataset cache
pub const DATA_CACHE_KEY: &str = "data_cache";

/// Default freshness window of the dataset cache in hours
pub const DEFAULT_TTL_HOURS: u64 = 24;

/// Converts a TTL in hours to a duration, if it fits chrono's range
pub fn ttl_from_hours(hours: u64) -> Option<Duration> {
    i64::try_from(hours).ok().and_then(Duration::try_hours)
}

/// Single-entry cache holding the most recent dataset
///
/// Entries older than the TTL are never returned by [`DatasetCache::get`], so
/// a stale dataset always forces a refetch.
#[derive(Debug, Clone)]
pub struct DatasetCache {
    manager: CacheManager,
    ttl: Duration,
}

impl DatasetCache {
    /// Creates the cache; an out-of-range TTL falls back to [`DEFAULT_TTL_HOURS`]
    pub fn new(manager: CacheManager, ttl_hours: u64) -> Self {
        let ttl = ttl_from_hours(ttl_hours).unwrap_or_else(|| {
            warn!(ttl_hours, "Cache TTL out of range, using {}h", DEFAULT_TTL_HOURS);
            Duration::hours(DEFAULT_TTL_HOURS as i64)
        });
        Self { manager, ttl }
    }

    /// Returns the cached payload if present and unexpired
    pub fn get<T: DeserializeOwned>(&self) -> Option<T> {
        let cached = self.manager.read::<T>(DATA_CACHE_KEY, self.ttl)?;
        if cached.is_expired {
            info!(cached_at = %cached.cached_at, "Dataset cache has expired");
            return None;
        }
        debug!(cached_at = %cached.cached_at, "Using cached dataset");
        Some(cached.data)
    }

    /// Stores the payload stamped with the current time
    pub fn set<T: Serialize>(&self, payload: &T) -> std::io::Result<()> {
        self.manager.write(DATA_CACHE_KEY, payload)?;
        info!("Dataset cached successfully");
        Ok(())
    }

    #[cfg(test)]
    fn ttl(&self) -> Duration {
        self.ttl
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use serde_json::{json, Value};
    use tempfile::TempDir;

    fn create_test_cache(ttl_hours: u64) -> (DatasetCache, CacheManager, TempDir) {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let manager = CacheManager::with_dir(temp_dir.path().to_path_buf());
        (DatasetCache::new(manager.clone(), ttl_hours), manager, temp_dir)
    }

    #[test]
    fn test_get_returns_none_when_absent() {
        let (cache, _, _temp_dir) = create_test_cache(DEFAULT_TTL_HOURS);
        assert!(cache.get::<Value>().is_none());
    }

    #[test]
    fn test_set_then_get_returns_payload() {
        let (cache, _, temp_dir) = create_test_cache(DEFAULT_TTL_HOURS);
        let payload = json!({"companies": [1, 2, 3]});

        cache.set(&payload).expect("Set should succeed");

        assert!(temp_dir.path().join("data_cache.json").exists());
        assert_eq!(cache.get::<Value>(), Some(payload));
    }

    #[test]
    fn test_get_skips_expired_entry() {
        let (cache, manager, _temp_dir) = create_test_cache(DEFAULT_TTL_HOURS);
        manager
            .write_at(DATA_CACHE_KEY, &json!({"test": "expired"}), Utc::now() - Duration::days(1))
            .unwrap();

        assert!(cache.get::<Value>().is_none(), "Day-old entry should be stale");
    }

    #[test]
    fn test_default_ttl_is_one_day() {
        let (cache, _, _temp_dir) = create_test_cache(DEFAULT_TTL_HOURS);
        assert_eq!(cache.ttl(), Duration::days(1));
    }

    #[test]
    fn test_out_of_range_ttl_uses_default() {
        for hours in [u64::MAX, 9_000_000_000_000_000] {
            let (cache, _, _temp_dir) = create_test_cache(hours);
            assert_eq!(cache.ttl(), Duration::days(1), "ttl_hours = {}", hours);
        }
    }

    #[test]
    fn test_ttl_from_hours_bounds() {
        assert_eq!(ttl_from_hours(6), Some(Duration::hours(6)));
        assert_eq!(ttl_from_hours(0), Some(Duration::zero()));
        assert!(ttl_from_hours(u64::MAX).is_none());
        assert!(ttl_from_hours(9_000_000_000_000_000).is_none());
    }
}
