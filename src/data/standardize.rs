//! Flattening of the raw snapshot into `Company` records
//!
//! Glide rows look like `{"id": ..., "data": {"Company Name": ..., ...}}`.
//! Field names are the sheet's column headers, so they are matched verbatim.

use std::collections::HashMap;

use serde_json::{Map, Value};
use tracing::debug;

use super::{Campaign, Company, FetchError, RawRecord};

const COMPANY_SHEET: &str = "Sheet1";
const CAMPAIGN_SHEET: &str = "Campaigns";

/// Returns the sheet tables of a decoded snapshot (its `data` object)
pub fn snapshot_tables(raw: &Value) -> Result<&Map<String, Value>, FetchError> {
    raw.get("data")
        .and_then(Value::as_object)
        .ok_or_else(|| FetchError::UnexpectedLayout("missing `data` object".to_string()))
}

/// Builds standardized company records from the snapshot tables
///
/// Companies without a name are dropped. Campaign details are merged into
/// every company whose id appears in the campaign's `Companies` column; when
/// a company is in several campaigns the first one listed wins. Tickers are
/// left empty for the resolver to fill in.
pub fn flatten_and_standardize(tables: &Map<String, Value>) -> Vec<Company> {
    let campaigns = campaigns_by_company(tables);

    let companies: Vec<Company> = sheet_rows(tables, COMPANY_SHEET)
        .filter_map(|(_, record)| {
            let company = company_from_record(record);
            if company.is_none() {
                debug!("Skipping company row without a name");
            }
            company
        })
        .map(|mut company| {
            company.campaign = company
                .company_id
                .as_ref()
                .and_then(|id| campaigns.get(id))
                .cloned();
            company
        })
        .collect();

    debug!(
        companies = companies.len(),
        campaigns = campaigns.len(),
        "Standardized snapshot"
    );
    companies
}

/// Iterates `(row id, data record)` pairs of a sheet; missing sheets are empty
fn sheet_rows<'a>(
    tables: &'a Map<String, Value>,
    sheet: &str,
) -> impl Iterator<Item = (Option<&'a str>, &'a RawRecord)> {
    tables
        .get(sheet)
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(|row| {
            let record = row.get("data")?.as_object()?;
            Some((row.get("id").and_then(Value::as_str), record))
        })
}

fn company_from_record(record: &RawRecord) -> Option<Company> {
    let sources = ["Source", "Second source"]
        .iter()
        .filter_map(|key| text(record, key))
        .collect();

    Some(Company {
        company_name: text(record, "Company Name")?,
        company_id: text(record, "Company name"),
        sector: text(record, "Sector"),
        complicity_details: text(record, "Complicity details"),
        record_last_updated: text(record, "Record last updated"),
        sources,
        military: text(record, "Military"),
        stock_ticker: None,
        campaign: None,
    })
}

/// Maps each company id to the first campaign that names it
fn campaigns_by_company(tables: &Map<String, Value>) -> HashMap<String, Campaign> {
    let mut by_company = HashMap::new();

    for (id, record) in sheet_rows(tables, CAMPAIGN_SHEET) {
        let Some(campaign_name) = text(record, "Campaign Name") else {
            continue;
        };
        let company_ids = company_ids(record.get("Companies"));
        if company_ids.is_empty() {
            continue;
        }

        let campaign = Campaign {
            campaign_name,
            campaign_id: id.map(str::to_string),
            campaign_description: text(record, "Description"),
            campaign_location: text(record, "Location"),
        };
        for company_id in company_ids {
            by_company
                .entry(company_id)
                .or_insert_with(|| campaign.clone());
        }
    }

    by_company
}

/// Parses the `Companies` column: a comma-separated string or a list
fn company_ids(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::String(s)) => s
            .split(',')
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(str::to_string)
            .collect(),
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(str::to_string)
            .collect(),
        _ => Vec::new(),
    }
}

/// Reads a cell as trimmed, non-empty text
///
/// Glide wraps dates as `{"repr": "..."}`; scalars are stringified.
fn text(record: &RawRecord, key: &str) -> Option<String> {
    let value = match record.get(key)? {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Object(obj) => obj.get("repr")?.as_str()?.trim().to_string(),
        Value::Null | Value::Array(_) => return None,
    };
    (!value.is_empty()).then_some(value)
}
