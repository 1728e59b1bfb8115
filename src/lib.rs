//! Watermelon API Library
//!
//! Fetches the Watermelon Index dataset, caches it on disk and enriches its
//! companies with stock tickers. Modules are public for the binary and for
//! integration tests.

pub mod api;
pub mod cache;
pub mod cli;
pub mod config;
pub mod data;
pub mod service;
pub mod ticker;
