//! Cache module for storing fetched data and ticker lookups to disk
//!
//! `CacheManager` persists JSON entries stamped with their write time.
//! `DatasetCache` serves the decoded dataset while it is younger than its TTL,
//! and `TickerCache` remembers ticker lookups until explicitly cleared.

mod dataset;
mod manager;
mod tickers;

pub use dataset::{ttl_from_hours, DatasetCache, DATA_CACHE_KEY, DEFAULT_TTL_HOURS};
pub use manager::{CacheManager, CachedData};
pub use tickers::{normalize_name, TickerCache, TICKER_CACHE_KEY};
