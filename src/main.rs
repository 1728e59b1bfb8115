//! Watermelon API - Serve the Watermelon Index dataset
//!
//! Runs the HTTP server by default, or one of the cache maintenance commands.

use std::sync::Arc;

use clap::Parser;
use tracing::info;

use watermelon_api::api;
use watermelon_api::cli::{listen_addr, Cli, Command};
use watermelon_api::config::Config;
use watermelon_api::service::DataService;

/// Initializes log output, honouring `RUST_LOG`
fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "watermelon_api=info,tower_http=info".into()),
        )
        .init();
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // A missing .env file is fine
    let _ = dotenvy::dotenv();
    init_tracing();

    let cli = Cli::parse();
    let config = cli.apply(Config::from_env());
    let service = DataService::from_config(&config);

    match cli.command() {
        Command::Serve { .. } => {
            let addr = listen_addr(&config)?;
            info!(%addr, cache_dir = %config.cache_dir.display(), "Starting Watermelon API");

            let app = api::router(Arc::new(service));
            let listener = tokio::net::TcpListener::bind(addr).await?;
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    let _ = tokio::signal::ctrl_c().await;
                })
                .await?;
        }
        Command::Refresh => {
            info!("Starting cache refresh...");
            let dataset = service.refresh().await?;
            info!("Cache refresh completed successfully");
            println!(
                "Cached {} companies in {}",
                dataset.processed_data.len(),
                config.cache_dir.display()
            );
        }
        Command::ClearTickers => {
            let count = service.tickers().len();
            service.tickers().clear()?;
            println!("Cleared {} ticker entries", count);
        }
    }

    Ok(())
}
