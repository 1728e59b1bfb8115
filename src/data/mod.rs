//! Core data models for the Watermelon Index dataset
//!
//! The upstream snapshot is a Glide app export: a `data` object holding one
//! array per sheet. `Sheet1` lists companies and `Campaigns` lists boycott
//! campaigns that reference companies by id.

pub mod fetcher;
pub mod standardize;

pub use fetcher::{FetchError, WatermelonClient};
pub use standardize::{flatten_and_standardize, snapshot_tables};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One row of source data: field names mapped to strings or nested values
pub type RawRecord = Map<String, Value>;

/// A company record in the shape served by the API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    pub company_name: String,
    pub company_id: Option<String>,
    pub sector: Option<String>,
    pub complicity_details: Option<String>,
    pub record_last_updated: Option<String>,
    /// Non-empty source links, primary first
    #[serde(default)]
    pub sources: Vec<String>,
    pub military: Option<String>,
    /// Always serialized; `null` when no ticker is known
    pub stock_ticker: Option<String>,
    #[serde(flatten)]
    pub campaign: Option<Campaign>,
}

/// Campaign details merged into each company it targets
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Campaign {
    pub campaign_name: String,
    pub campaign_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub campaign_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub campaign_location: Option<String>,
}

/// Payload stored in the dataset cache
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dataset {
    /// Snapshot exactly as decoded from upstream
    pub raw_data: Value,
    /// Standardized, ticker-enriched companies
    pub processed_data: Vec<Company>,
}
