//! Command-line interface parsing for the Watermelon API
//!
//! Serving is the default; `refresh` and `clear-tickers` are maintenance
//! commands that work on the same cache directory as the server.

use std::net::{IpAddr, SocketAddr, ToSocketAddrs};
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use thiserror::Error;

use crate::config::Config;

/// Error types for CLI argument handling
#[derive(Debug, Error)]
pub enum CliError {
    /// The host and port do not form a socket address
    #[error("Invalid listen address: '{0}'")]
    InvalidAddress(String),
}

/// Watermelon API - Serve the Watermelon Index dataset with stock tickers
#[derive(Parser, Debug)]
#[command(name = "watermelon-api")]
#[command(about = "Cached Watermelon Index API with stock ticker enrichment")]
#[command(version)]
pub struct Cli {
    /// Directory for data_cache.json and ticker_cache.json
    #[arg(long, global = true, value_name = "DIR")]
    pub cache_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Run the HTTP server (default)
    Serve {
        /// Address to bind, overrides API_HOST
        #[arg(long)]
        host: Option<String>,
        /// Port to bind, overrides API_PORT
        #[arg(long)]
        port: Option<u16>,
    },
    /// Fetch a fresh dataset into the cache, ignoring the current one
    Refresh,
    /// Forget every remembered ticker lookup
    ClearTickers,
}

impl Cli {
    /// The command to run, defaulting to `serve`
    pub fn command(&self) -> Command {
        self.command.clone().unwrap_or(Command::Serve {
            host: None,
            port: None,
        })
    }

    /// Applies command-line overrides to an environment-derived config
    pub fn apply(&self, mut config: Config) -> Config {
        if let Some(dir) = &self.cache_dir {
            config.cache_dir = dir.clone();
        }
        if let Some(Command::Serve { host, port }) = &self.command {
            if let Some(host) = host {
                config.host = host.clone();
            }
            if let Some(port) = port {
                config.port = *port;
            }
        }
        config
    }
}

/// Resolves the bind address of a config; the host may be an IP or a name
pub fn listen_addr(config: &Config) -> Result<SocketAddr, CliError> {
    let invalid = || CliError::InvalidAddress(format!("{}:{}", config.host, config.port));
    if let Ok(ip) = config.host.parse::<IpAddr>() {
        return Ok(SocketAddr::new(ip, config.port));
    }
    (config.host.as_str(), config.port)
        .to_socket_addrs()
        .map_err(|_| invalid())?
        .next()
        .ok_or_else(invalid)
}
