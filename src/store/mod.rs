//! Shared store module
//!
//! Price samples and simulated balances behind two small traits, so the
//! collector and the dashboard never see which backend holds the data.

mod memory;
mod parquet;
mod table;
mod types;

pub use self::memory::MemoryStore;
pub use self::parquet::{balance_schema, price_schema, ParquetStore};
pub use self::table::{TableConfig, TableStore};
pub use self::types::{newest_first, AssetBalance, PriceSample, StoreError};

use crate::config::{ConfigError, StoreBackend, StoreConfig};
use async_trait::async_trait;
use rust_decimal::Decimal;
use std::sync::Arc;
use std::time::Duration;

/// Append-only price sample storage
#[async_trait]
pub trait PriceStore: Send + Sync {
    /// Append rows after the existing ones; an empty slice writes nothing
    async fn append(&self, rows: &[PriceSample]) -> Result<(), StoreError>;

    /// Up to `limit` most recent rows, newest first
    async fn read_recent(&self, limit: usize) -> Result<Vec<PriceSample>, StoreError>;
}

/// Simulated asset balances, one row per asset
#[async_trait]
pub trait BalanceBook: Send + Sync {
    /// All balance rows
    async fn balances(&self) -> Result<Vec<AssetBalance>, StoreError>;

    /// Balance of one asset; a missing row reads as zero
    async fn balance(&self, asset: &str) -> Result<Decimal, StoreError> {
        Ok(self
            .balances()
            .await?
            .into_iter()
            .find(|b| b.asset == asset)
            .map(|b| b.amount)
            .unwrap_or(Decimal::ZERO))
    }

    /// Overwrite one asset's amount in place
    async fn set_balance(&self, asset: &str, amount: Decimal) -> Result<(), StoreError>;

    /// Create or overwrite one asset's row
    async fn seed_balance(&self, asset: &str, amount: Decimal) -> Result<(), StoreError>;
}

/// A backend holding both tables
pub trait Store: PriceStore + BalanceBook {}

impl<T: PriceStore + BalanceBook> Store for T {}

/// Build the configured backend
pub fn open_store(config: &StoreConfig) -> anyhow::Result<Arc<dyn Store>> {
    let store: Arc<dyn Store> = match config.backend {
        StoreBackend::File => Arc::new(ParquetStore::new(
            config.prices_path.clone(),
            config.balances_path.clone(),
        )),
        StoreBackend::Table => {
            let url = config
                .url
                .clone()
                .ok_or(ConfigError::MissingSecret("store.url"))?;
            let key = config
                .key
                .clone()
                .ok_or(ConfigError::MissingSecret("store.key"))?;
            Arc::new(TableStore::new(TableConfig {
                url,
                key,
                prices_table: config.prices_table.clone(),
                assets_table: config.assets_table.clone(),
                timeout: Duration::from_secs(config.request_timeout_secs),
            })?)
        }
    };
    Ok(store)
}
