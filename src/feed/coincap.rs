//! CoinCap asset price client

use super::types::{parse_price, FeedError, Ticker};
use super::TickerSource;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

/// CoinCap API v2 base URL
pub const COINCAP_API_URL: &str = "https://api.coincap.io/v2";

#[derive(Debug, Deserialize)]
struct AssetEnvelope {
    data: Option<CoinCapAsset>,
}

/// Raw asset from `GET /assets/{id}`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CoinCapAsset {
    /// Ticker symbol, e.g. "BTC"
    symbol: String,
    /// USD price as a decimal string
    price_usd: String,
}

/// Client for CoinCap's asset endpoint; symbols are asset ids ("bitcoin")
pub struct CoinCapClient {
    base_url: String,
    client: Client,
}

impl CoinCapClient {
    /// Create a client with the given base URL and per-request timeout
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> anyhow::Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        })
    }

    fn parse_response(asset_id: &str, body: &str) -> Result<Ticker, FeedError> {
        let envelope: AssetEnvelope = serde_json::from_str(body)?;
        let asset = envelope
            .data
            .ok_or_else(|| FeedError::Empty(asset_id.to_string()))?;

        Ok(Ticker {
            price: parse_price(&asset.price_usd)?,
            symbol: asset.symbol,
        })
    }
}

#[async_trait]
impl TickerSource for CoinCapClient {
    async fn fetch_ticker(&self, symbol: &str) -> Result<Ticker, FeedError> {
        let url = format!("{}/assets/{}", self.base_url, symbol);
        tracing::debug!(url = %url, "Fetching CoinCap asset");

        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(FeedError::Status { status, body });
        }

        let body = response.text().await?;
        Self::parse_response(symbol, &body)
    }

    fn name(&self) -> &'static str {
        "coincap"
    }
}
