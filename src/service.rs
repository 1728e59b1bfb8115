//! Cache-or-fetch orchestration shared by the HTTP API and the CLI

use tracing::{info, warn};

use crate::cache::{CacheManager, DatasetCache, TickerCache};
use crate::config::Config;
use crate::data::{
    flatten_and_standardize, snapshot_tables, Dataset, FetchError, WatermelonClient,
};
use crate::ticker::{CompletionClient, TickerResolver};

/// Serves the dataset from cache, refetching it once the cache goes stale
#[derive(Debug)]
pub struct DataService {
    client: WatermelonClient,
    cache: DatasetCache,
    resolver: TickerResolver,
}

impl DataService {
    pub fn new(client: WatermelonClient, cache: DatasetCache, resolver: TickerResolver) -> Self {
        Self {
            client,
            cache,
            resolver,
        }
    }

    /// Wires up every component from configuration
    pub fn from_config(config: &Config) -> Self {
        let manager = CacheManager::with_dir(config.cache_dir.clone());
        let resolver = TickerResolver::new(
            config.ticker_search.clone().map(CompletionClient::new),
            config.ticker_parser.clone().map(CompletionClient::new),
            TickerCache::load(manager.clone()),
        );

        Self::new(
            WatermelonClient::new(config.watermelon.clone()),
            DatasetCache::new(manager, config.cache_ttl_hours),
            resolver,
        )
    }

    /// Returns the cached dataset if fresh, otherwise fetches a new one
    pub async fn get_data(&self) -> Result<Dataset, FetchError> {
        if let Some(dataset) = self.cache.get::<Dataset>() {
            return Ok(dataset);
        }
        self.refresh().await
    }

    /// Fetches, decodes, standardizes, enriches and caches a new dataset
    ///
    /// A cache write failure is logged; the fresh dataset is still returned.
    pub async fn refresh(&self) -> Result<Dataset, FetchError> {
        info!("Fetching dataset from upstream");
        let raw_data = self.client.fetch_raw_data().await?;

        let mut processed_data = flatten_and_standardize(snapshot_tables(&raw_data)?);
        self.resolver.enrich(&mut processed_data).await;

        let dataset = Dataset {
            raw_data,
            processed_data,
        };
        if let Err(e) = self.cache.set(&dataset) {
            warn!(error = %e, "Failed to write dataset cache");
        }
        info!(companies = dataset.processed_data.len(), "Dataset refreshed");
        Ok(dataset)
    }

    pub fn tickers(&self) -> &TickerCache {
        self.resolver.cache()
    }
}
