//! Store record types

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One recorded price observation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceSample {
    /// Local wall-clock time, `%Y-%m-%d %H:%M:%S`
    pub time: String,
    /// Trading pair identifier (e.g., "BTC_USDT")
    pub symbol: String,
    /// Last trade price
    pub price: Decimal,
}

impl PriceSample {
    pub fn new(time: impl Into<String>, symbol: impl Into<String>, price: Decimal) -> Self {
        Self {
            time: time.into(),
            symbol: symbol.into(),
            price,
        }
    }
}

/// Simulated holding of one asset
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetBalance {
    /// Asset type (e.g., "USDT", "BTC")
    #[serde(rename = "type")]
    pub asset: String,
    pub amount: Decimal,
}

/// Storage errors
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),
    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),
    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),
    /// Hosted table answered with a non-success status
    #[error("Table API returned {status}: {body}")]
    Status { status: u16, body: String },
    /// Stored data does not match the expected columns
    #[error("Unexpected schema: {0}")]
    Schema(String),
    /// Update targeted an asset with no balance row
    #[error("No balance row for asset {0}")]
    MissingRow(String),
    /// Simulated failure (in-memory store only)
    #[error("Rejected: {0}")]
    Rejected(String),
}

/// Order rows newest first and keep at most `limit`.
///
/// Timestamps compare lexicographically; among equal timestamps the row
/// inserted last counts as newer.
pub fn newest_first(rows: Vec<PriceSample>, limit: usize) -> Vec<PriceSample> {
    let mut indexed: Vec<(usize, PriceSample)> = rows.into_iter().enumerate().collect();
    indexed.sort_by(|(ia, a), (ib, b)| b.time.cmp(&a.time).then(ib.cmp(ia)));
    indexed.into_iter().take(limit).map(|(_, s)| s).collect()
}
