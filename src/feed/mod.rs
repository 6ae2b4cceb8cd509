//! Price feed module
//!
//! Fetches last-trade prices from a public exchange REST API, one request
//! per trading pair.

mod coincap;
mod gateio;
mod types;

pub use coincap::{CoinCapClient, COINCAP_API_URL};
pub use gateio::{GateIoClient, GATEIO_API_URL};
pub use types::{parse_price, FeedError, Ticker};

use crate::config::{ExchangeConfig, ExchangeProvider};
use async_trait::async_trait;
use std::time::Duration;

/// Trait for ticker sources
#[async_trait]
pub trait TickerSource: Send + Sync {
    /// Fetch the latest trade price for one symbol
    async fn fetch_ticker(&self, symbol: &str) -> Result<Ticker, FeedError>;

    /// Short name used in logs
    fn name(&self) -> &'static str;
}

/// Build the ticker source selected by the configuration
pub fn build_source(config: &ExchangeConfig) -> anyhow::Result<Box<dyn TickerSource>> {
    let timeout = Duration::from_secs(config.request_timeout_secs);
    let source: Box<dyn TickerSource> = match config.provider {
        ExchangeProvider::GateIo => Box::new(GateIoClient::new(&config.base_url, timeout)?),
        ExchangeProvider::CoinCap => Box::new(CoinCapClient::new(&config.base_url, timeout)?),
    };
    Ok(source)
}
