//! Persistent company-name to ticker memo
//!
//! Lookups are remembered forever, including negative results, until the cache
//! is cleared explicitly. Inserts only touch memory; [`TickerCache::persist`]
//! writes the whole map once a batch of lookups is done.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::RwLock;

use tracing::{debug, warn};

use super::CacheManager;

/// Cache key (and file stem) of the ticker cache
pub const TICKER_CACHE_KEY: &str = "ticker_cache";

/// Normalizes a company name into a ticker cache key
///
/// Trims, collapses runs of whitespace and lower-cases, so minor spelling
/// differences in the source sheet share an entry.
pub fn normalize_name(name: &str) -> String {
    name.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// File-backed map from normalized company name to resolved ticker
///
/// A stored `None` means the name was looked up and no valid ticker exists.
#[derive(Debug)]
pub struct TickerCache {
    manager: CacheManager,
    entries: RwLock<HashMap<String, Option<String>>>,
    dirty: AtomicBool,
}

impl TickerCache {
    /// Opens the ticker cache, loading any entries already on disk
    pub fn load(manager: CacheManager) -> Self {
        let entries: HashMap<String, Option<String>> = manager
            .read_unexpiring(TICKER_CACHE_KEY)
            .unwrap_or_default();
        debug!(entries = entries.len(), "Loaded ticker cache");
        Self {
            manager,
            entries: RwLock::new(entries),
            dirty: AtomicBool::new(false),
        }
    }

    /// Looks up a company
    ///
    /// Returns `None` if the company was never resolved, `Some(None)` if it was
    /// resolved to "no ticker".
    pub fn get_ticker(&self, name: &str) -> Option<Option<String>> {
        let key = normalize_name(name);
        self.entries
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .get(&key)
            .cloned()
    }

    /// Records a lookup result in memory
    pub fn set_ticker(&self, name: &str, ticker: Option<String>) {
        let key = normalize_name(name);
        self.entries
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert(key, ticker);
        self.dirty.store(true, Ordering::Release);
    }

    /// Writes the map to disk if anything changed since the last write
    ///
    /// The file write runs on the blocking pool. Failures are logged and leave
    /// the cache marked dirty so the next call retries.
    pub async fn persist(&self) {
        if !self.dirty.swap(false, Ordering::AcqRel) {
            return;
        }
        let snapshot = self
            .entries
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone();
        let manager = self.manager.clone();

        let result =
            tokio::task::spawn_blocking(move || manager.write(TICKER_CACHE_KEY, &snapshot)).await;
        match result {
            Ok(Ok(())) => debug!("Persisted ticker cache"),
            Ok(Err(e)) => {
                self.dirty.store(true, Ordering::Release);
                warn!(error = %e, "Failed to persist ticker cache");
            }
            Err(e) => {
                self.dirty.store(true, Ordering::Release);
                warn!(error = %e, "Ticker cache write task failed");
            }
        }
    }

    /// Drops every entry, in memory and on disk
    pub fn clear(&self) -> std::io::Result<()> {
        self.entries
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clear();
        self.dirty.store(false, Ordering::Release);
        self.manager.remove(TICKER_CACHE_KEY)
    }

    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
