//! Stock ticker enrichment
//!
//! Company names are turned into ticker symbols by asking a completion API,
//! with results memoized in the persistent ticker cache.

mod completion;
mod resolver;
mod symbols;

pub use completion::{CompletionClient, CompletionError};
pub use resolver::TickerResolver;
pub use symbols::{extract_ticker, is_valid_ticker};
