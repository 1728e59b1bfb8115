//! HTTP API
//!
//! `GET /api/data` returns the processed company list, refetching the dataset
//! when the cache has gone stale. Wrong methods get 405 and unknown paths 404
//! from the router itself.

mod error;

pub use error::ApiError;

use std::sync::Arc;

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};
use tower_http::trace::TraceLayer;

use crate::data::Company;
use crate::service::DataService;

/// Shared handler state
pub type AppState = Arc<DataService>;

/// Builds the API router
pub fn router(service: AppState) -> Router {
    Router::new()
        .route("/api/data", get(get_data))
        .route("/api/data/", get(get_data))
        .route("/api", get(get_data))
        .route("/api/", get(get_data))
        .route("/api/raw", get(get_raw))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(service)
}

async fn get_data(State(service): State<AppState>) -> Result<Json<Vec<Company>>, ApiError> {
    let dataset = service.get_data().await?;
    Ok(Json(dataset.processed_data))
}

async fn get_raw(State(service): State<AppState>) -> Result<Json<Value>, ApiError> {
    let dataset = service.get_data().await?;
    Ok(Json(dataset.raw_data))
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
