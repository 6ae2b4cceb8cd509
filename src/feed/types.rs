//! Price feed types

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

/// Last-trade quote for one trading pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ticker {
    /// Canonical pair identifier as reported by the exchange (e.g., "BTC_USDT")
    pub symbol: String,
    /// Last trade price
    pub price: Decimal,
}

/// Errors from a single ticker request
#[derive(Debug, Error)]
pub enum FeedError {
    /// Transport failure or timeout
    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),
    /// Non-success HTTP status
    #[error("Exchange returned {status}: {body}")]
    Status { status: u16, body: String },
    /// Payload is not the expected JSON shape
    #[error("Malformed payload: {0}")]
    Decode(#[from] serde_json::Error),
    /// Payload parsed but carried no ticker
    #[error("No ticker returned for {0}")]
    Empty(String),
    /// Price field is not a positive decimal
    #[error("Invalid price: {0}")]
    InvalidPrice(String),
}

/// Parse an exchange price string into a positive decimal
pub fn parse_price(raw: &str) -> Result<Decimal, FeedError> {
    let price = Decimal::from_str(raw.trim())
        .or_else(|_| Decimal::from_scientific(raw.trim()))
        .map_err(|_| FeedError::InvalidPrice(raw.to_string()))?;

    if price <= Decimal::ZERO {
        return Err(FeedError::InvalidPrice(raw.to_string()));
    }
    Ok(price)
}
