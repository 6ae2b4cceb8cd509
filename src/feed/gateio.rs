//! Gate.io spot ticker client

use super::types::{parse_price, FeedError, Ticker};
use super::TickerSource;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

/// Gate.io public API v4 base URL
pub const GATEIO_API_URL: &str = "https://api.gateio.ws/api/v4";

/// Raw entry of `GET /spot/tickers`
#[derive(Debug, Deserialize)]
struct GateTicker {
    /// Pair identifier, e.g. "BTC_USDT"
    currency_pair: String,
    /// Last trade price as a decimal string
    last: String,
}

/// Client for Gate.io's spot ticker endpoint
pub struct GateIoClient {
    base_url: String,
    client: Client,
}

impl GateIoClient {
    /// Create a client with the given base URL and per-request timeout
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> anyhow::Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        })
    }

    fn tickers_url(&self) -> String {
        format!("{}/spot/tickers", self.base_url)
    }

    /// Parse a ticker list response; only the first entry is used
    fn parse_response(symbol: &str, body: &str) -> Result<Ticker, FeedError> {
        let tickers: Vec<GateTicker> = serde_json::from_str(body)?;
        let first = tickers
            .into_iter()
            .next()
            .ok_or_else(|| FeedError::Empty(symbol.to_string()))?;

        Ok(Ticker {
            price: parse_price(&first.last)?,
            symbol: first.currency_pair,
        })
    }
}

#[async_trait]
impl TickerSource for GateIoClient {
    async fn fetch_ticker(&self, symbol: &str) -> Result<Ticker, FeedError> {
        let url = self.tickers_url();
        tracing::debug!(url = %url, symbol, "Fetching Gate.io ticker");

        let response = self
            .client
            .get(&url)
            .query(&[("currency_pair", symbol)])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(FeedError::Status { status, body });
        }

        let body = response.text().await?;
        Self::parse_response(symbol, &body)
    }

    fn name(&self) -> &'static str {
        "gateio"
    }
}
