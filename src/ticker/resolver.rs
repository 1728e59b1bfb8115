//! Company name to ticker resolution
//!
//! A search-capable model guesses the ticker, an optional second model reduces
//! the guess to a bare symbol, and every conclusive answer is memoized in the
//! ticker cache, which is written to disk once per enrichment pass. Failed
//! lookups are not memoized so they are retried later.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{debug, info, warn};

use super::completion::CompletionClient;
use super::symbols::{extract_ticker, is_valid_ticker};
use crate::cache::{normalize_name, TickerCache};
use crate::data::Company;

const SEARCH_SYSTEM_PROMPT: &str = "You are a financial data assistant. Answer with the stock \
ticker symbol only. Prefer the primary US listing, including OTC or ADR symbols for foreign \
companies. If the company is not publicly traded, answer null.";

const PARSE_SYSTEM_PROMPT: &str = "Extract the US stock ticker symbol from the text. Reply \
with only the ticker symbol in uppercase, or null if the text names no ticker.";

/// Resolves company names to tickers through a completion API
#[derive(Debug)]
pub struct TickerResolver {
    search: Option<CompletionClient>,
    parser: Option<CompletionClient>,
    cache: TickerCache,
    disabled_warned: AtomicBool,
}

impl TickerResolver {
    /// Creates a resolver
    ///
    /// Without a `search` client only cached tickers are returned.
    pub fn new(
        search: Option<CompletionClient>,
        parser: Option<CompletionClient>,
        cache: TickerCache,
    ) -> Self {
        Self {
            search,
            parser,
            cache,
            disabled_warned: AtomicBool::new(false),
        }
    }

    pub fn cache(&self) -> &TickerCache {
        &self.cache
    }

    /// Returns the ticker for a company, consulting the cache first
    pub async fn resolve(&self, company_name: &str) -> Option<String> {
        if let Some(cached) = self.cache.get_ticker(company_name) {
            debug!(company = company_name, ticker = ?cached, "Ticker cache hit");
            return cached;
        }

        let Some(search) = &self.search else {
            if !self.disabled_warned.swap(true, Ordering::Relaxed) {
                warn!("PERPLEXITY_API_KEY is not set; ticker lookups are disabled");
            }
            return None;
        };

        let prompt = format!(
            "What is the stock ticker symbol for the company \"{}\"?",
            company_name
        );
        let answer = match search.complete(SEARCH_SYSTEM_PROMPT, &prompt).await {
            Ok(answer) => answer,
            Err(e) => {
                warn!(company = company_name, error = %e, "Ticker search failed");
                return None;
            }
        };
        debug!(company = company_name, answer = %answer, "Ticker search answered");

        let ticker = self.parse_answer(&answer).await;
        self.cache.set_ticker(company_name, ticker.clone());
        info!(company = company_name, ticker = ?ticker, "Resolved ticker");
        ticker
    }

    /// Reduces a search answer to a validated ticker
    ///
    /// The parser's answer wins when it is a valid ticker; otherwise the search
    /// answer is scanned locally.
    async fn parse_answer(&self, answer: &str) -> Option<String> {
        if let Some(parser) = &self.parser {
            match parser.complete(PARSE_SYSTEM_PROMPT, answer).await {
                Ok(parsed) => {
                    let parsed = parsed.trim().trim_end_matches('.');
                    if is_valid_ticker(parsed) {
                        return Some(parsed.to_string());
                    }
                    debug!(parsed = %parsed, "Parser found no ticker; using local extraction");
                }
                Err(e) => {
                    warn!(error = %e, "Ticker parsing failed; falling back to local extraction");
                }
            }
        }
        extract_ticker(answer)
    }

    /// Fills `stock_ticker` on every company, resolving each distinct name once
    pub async fn enrich(&self, companies: &mut [Company]) {
        let mut resolved: HashMap<String, Option<String>> = HashMap::new();

        for company in companies.iter_mut() {
            let key = normalize_name(&company.company_name);
            let ticker = match resolved.get(&key).cloned() {
                Some(ticker) => ticker,
                None => {
                    let ticker = self.resolve(&company.company_name).await;
                    resolved.insert(key, ticker.clone());
                    ticker
                }
            };
            company.stock_ticker = ticker;
        }
        self.cache.persist().await;

        debug!(
            companies = companies.len(),
            distinct = resolved.len(),
            "Ticker enrichment finished"
        );
    }
}
