//! Cache manager for persisting JSON payloads to disk
//!
//! Provides a `CacheManager` that stores serializable data to JSON files together
//! with the time they were written. Freshness is decided by the reader, which
//! passes the TTL it cares about.

use chrono::{DateTime, Duration, Utc};
use directories::ProjectDirs;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Wrapper struct for cached data stored on disk
#[derive(Debug, Serialize, Deserialize)]
struct CacheEntry<T> {
    /// When the data was cached
    timestamp: DateTime<Utc>,
    /// The cached data
    data: T,
}

/// Result of reading from cache, including metadata about cache freshness
#[derive(Debug)]
pub struct CachedData<T> {
    /// The cached data
    pub data: T,
    /// When the data was originally cached
    pub cached_at: DateTime<Utc>,
    /// Whether the entry is older than the TTL it was read with
    pub is_expired: bool,
}

/// Manages reading and writing cached data to disk
///
/// Each key maps to `{cache_dir}/{key}.json`. Files that are missing or cannot
/// be parsed read as `None`, so a corrupt cache behaves like an empty one.
#[derive(Debug, Clone)]
pub struct CacheManager {
    /// Directory where cache files are stored
    cache_dir: PathBuf,
}

impl CacheManager {
    /// Creates a new CacheManager writing into the given directory
    pub fn with_dir(cache_dir: PathBuf) -> Self {
        Self { cache_dir }
    }

    /// The XDG-compliant cache directory for this application
    ///
    /// Uses `~/.cache/watermelon-api/` on Linux, or the equivalent path on other
    /// platforms. Returns `None` if no home directory can be determined.
    pub fn default_dir() -> Option<PathBuf> {
        let project_dirs = ProjectDirs::from("", "", "watermelon-api")?;
        Some(project_dirs.cache_dir().to_path_buf())
    }

    /// Returns the path to a cache file for the given key
    pub fn cache_path(&self, key: &str) -> PathBuf {
        self.cache_dir.join(format!("{}.json", key))
    }

    /// Ensures the cache directory exists
    fn ensure_dir(&self) -> std::io::Result<()> {
        fs::create_dir_all(&self.cache_dir)
    }

    /// Writes data to the cache, stamped with the current time
    ///
    /// # Arguments
    /// * `key` - Unique identifier for the cache entry (e.g., "data_cache")
    /// * `data` - The data to cache (must implement Serialize)
    ///
    /// # Returns
    /// * `Ok(())` on success
    /// * `Err` if directory creation or file writing fails
    pub fn write<T: Serialize>(&self, key: &str, data: &T) -> std::io::Result<()> {
        self.write_at(key, data, Utc::now())
    }

    /// Writes data with an explicit timestamp
    pub(crate) fn write_at<T: Serialize>(
        &self,
        key: &str,
        data: &T,
        timestamp: DateTime<Utc>,
    ) -> std::io::Result<()> {
        self.ensure_dir()?;

        let entry = CacheEntry { timestamp, data };
        let json = serde_json::to_string(&entry)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;

        fs::write(self.cache_path(key), json)
    }

    /// Reads data from the cache
    ///
    /// Returns `Some(CachedData)` with `is_expired = true` when the entry is at
    /// least `ttl` old; callers decide whether stale data is usable.
    ///
    /// # Arguments
    /// * `key` - The cache key to read
    /// * `ttl` - How long an entry stays fresh
    ///
    /// # Returns
    /// * `Some(CachedData<T>)` if the entry exists and can be parsed
    /// * `None` if the entry doesn't exist or parsing fails
    pub fn read<T: DeserializeOwned>(&self, key: &str, ttl: Duration) -> Option<CachedData<T>> {
        let entry = self.load_entry::<T>(key)?;
        let is_expired = Utc::now() - entry.timestamp >= ttl;

        Some(CachedData {
            data: entry.data,
            cached_at: entry.timestamp,
            is_expired,
        })
    }

    /// Reads an entry's data regardless of its age
    pub fn read_unexpiring<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.load_entry(key).map(|entry| entry.data)
    }

    fn load_entry<T: DeserializeOwned>(&self, key: &str) -> Option<CacheEntry<T>> {
        let path = self.cache_path(key);
        let content = fs::read_to_string(&path).ok()?;
        match serde_json::from_str(&content) {
            Ok(entry) => Some(entry),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Ignoring unreadable cache file");
                None
            }
        }
    }

    /// Deletes the cache file for a key, if present
    pub fn remove(&self, key: &str) -> std::io::Result<()> {
        match fs::remove_file(self.cache_path(key)) {
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            other => other,
        }
    }
}
