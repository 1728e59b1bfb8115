//! Runtime configuration loaded from the environment
//!
//! Values come from process environment variables, after an optional `.env`
//! file has been loaded. CLI flags override a few of them in `main`.

use std::path::PathBuf;

use crate::cache::{ttl_from_hours, CacheManager, DEFAULT_TTL_HOURS};

/// Glide snapshot endpoint of the Watermelon Index app
pub const DEFAULT_SNAPSHOT_URL: &str =
    "https://watermelonindex.glide.page/api/container/playerFunctionCritical/getAppSnapshot";

/// Glide application id sent in the snapshot request body
pub const DEFAULT_APP_ID: &str = "57dVVMXNFIuBOYtiLIaP";

/// Request id the Glide client sends as `reqid`
pub const DEFAULT_REQUEST_ID: &str = "1PKuPWeIywUcbOBGX5P9";

/// Perplexity chat completions endpoint
pub const PERPLEXITY_URL: &str = "https://api.perplexity.ai/chat/completions";

/// OpenRouter chat completions endpoint
pub const OPENROUTER_URL: &str = "https://openrouter.ai/api/v1/chat/completions";

/// Upstream snapshot source settings
#[derive(Debug, Clone)]
pub struct WatermelonConfig {
    pub snapshot_url: String,
    pub app_id: String,
    pub request_id: String,
}

impl Default for WatermelonConfig {
    fn default() -> Self {
        Self {
            snapshot_url: DEFAULT_SNAPSHOT_URL.to_string(),
            app_id: DEFAULT_APP_ID.to_string(),
            request_id: DEFAULT_REQUEST_ID.to_string(),
        }
    }
}

/// One OpenAI-compatible completion endpoint
#[derive(Debug, Clone)]
pub struct CompletionConfig {
    pub url: String,
    pub api_key: String,
    pub model: String,
}

/// Full service configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Address the HTTP server binds to
    pub host: String,
    pub port: u16,
    /// Directory holding `data_cache.json` and `ticker_cache.json`
    pub cache_dir: PathBuf,
    /// How long a fetched dataset stays fresh
    pub cache_ttl_hours: u64,
    pub watermelon: WatermelonConfig,
    /// Search-capable model that guesses tickers; lookups are off without it
    pub ticker_search: Option<CompletionConfig>,
    /// Model that reduces a search answer to a bare ticker
    pub ticker_parser: Option<CompletionConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5000,
            cache_dir: default_cache_dir(),
            cache_ttl_hours: DEFAULT_TTL_HOURS,
            watermelon: WatermelonConfig::default(),
            ticker_search: None,
            ticker_parser: None,
        }
    }
}

impl Config {
    /// Loads configuration from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a configuration from an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let ticker_search = var("PERPLEXITY_API_KEY").map(|api_key| CompletionConfig {
            url: var("PERPLEXITY_URL").unwrap_or_else(|| PERPLEXITY_URL.to_string()),
            api_key,
            model: var("PERPLEXITY_MODEL").unwrap_or_else(|| "sonar".to_string()),
        });
        let ticker_parser = var("OPENROUTER_API_KEY").map(|api_key| CompletionConfig {
            url: var("OPENROUTER_URL").unwrap_or_else(|| OPENROUTER_URL.to_string()),
            api_key,
            model: var("OPENROUTER_MODEL").unwrap_or_else(|| "openai/gpt-4o-mini".to_string()),
        });

        Self {
            host: var("API_HOST").unwrap_or(defaults.host),
            port: var("API_PORT")
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.port),
            cache_dir: var("WATERMELON_CACHE_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.cache_dir),
            cache_ttl_hours: var("WATERMELON_CACHE_TTL_HOURS")
                .and_then(|h| h.parse().ok())
                .filter(|h| ttl_from_hours(*h).is_some())
                .unwrap_or(defaults.cache_ttl_hours),
            watermelon: WatermelonConfig {
                snapshot_url: var("WATERMELON_SNAPSHOT_URL")
                    .unwrap_or(defaults.watermelon.snapshot_url),
                app_id: var("WATERMELON_APP_ID").unwrap_or(defaults.watermelon.app_id),
                request_id: var("WATERMELON_REQUEST_ID")
                    .unwrap_or(defaults.watermelon.request_id),
            },
            ticker_search,
            ticker_parser,
        }
    }
}

/// XDG cache directory, or the working directory when there is no home
fn default_cache_dir() -> PathBuf {
    CacheManager::default_dir().unwrap_or_else(|| PathBuf::from("."))
}
