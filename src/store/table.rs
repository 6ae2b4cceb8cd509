//! Hosted table store (PostgREST / Supabase REST interface)
//!
//! Rows are inserted one request at a time and balances are updated in
//! place with equality filters. Nothing here is transactional.

use super::types::{AssetBalance, PriceSample, StoreError};
use super::{BalanceBook, PriceStore};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use rust_decimal::Decimal;
use serde::Serialize;
use std::time::Duration;

/// Connection settings for the hosted tables
#[derive(Debug, Clone)]
pub struct TableConfig {
    /// Project base URL, e.g. "https://xyz.supabase.co"
    pub url: String,
    /// Service or anon key
    pub key: String,
    pub prices_table: String,
    pub assets_table: String,
    pub timeout: Duration,
}

/// REST client for the price and asset tables
pub struct TableStore {
    config: TableConfig,
    client: Client,
}

#[derive(Debug, Serialize)]
struct AmountPatch {
    amount: Decimal,
}

impl TableStore {
    pub fn new(config: TableConfig) -> Result<Self, StoreError> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { config, client })
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.config.url.trim_end_matches('/'), table)
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("apikey", &self.config.key)
            .header("Authorization", format!("Bearer {}", self.config.key))
    }

    async fn check(response: Response) -> Result<Response, StoreError> {
        if response.status().is_success() {
            return Ok(response);
        }
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        Err(StoreError::Status { status, body })
    }

    async fn insert_one(&self, row: &PriceSample) -> Result<(), StoreError> {
        let request = self
            .client
            .post(self.table_url(&self.config.prices_table))
            .header("Prefer", "return=minimal")
            .json(row);

        Self::check(self.authorized(request).send().await?).await?;
        Ok(())
    }
}

#[async_trait]
impl PriceStore for TableStore {
    async fn append(&self, rows: &[PriceSample]) -> Result<(), StoreError> {
        for row in rows {
            self.insert_one(row).await?;
            tracing::debug!(symbol = %row.symbol, price = %row.price, "Inserted price row");
        }
        if !rows.is_empty() {
            tracing::info!(table = %self.config.prices_table, count = rows.len(), "Inserted samples");
        }
        Ok(())
    }

    async fn read_recent(&self, limit: usize) -> Result<Vec<PriceSample>, StoreError> {
        let request = self
            .client
            .get(self.table_url(&self.config.prices_table))
            .query(&[
                ("select", "*".to_string()),
                ("order", "time.desc".to_string()),
                ("limit", limit.to_string()),
            ]);

        let response = Self::check(self.authorized(request).send().await?).await?;
        Ok(response.json().await?)
    }
}

#[async_trait]
impl BalanceBook for TableStore {
    async fn balances(&self) -> Result<Vec<AssetBalance>, StoreError> {
        let request = self
            .client
            .get(self.table_url(&self.config.assets_table))
            .query(&[("select", "*")]);

        let response = Self::check(self.authorized(request).send().await?).await?;
        Ok(response.json().await?)
    }

    async fn set_balance(&self, asset: &str, amount: Decimal) -> Result<(), StoreError> {
        let request = self
            .client
            .patch(self.table_url(&self.config.assets_table))
            .query(&[("type", format!("eq.{}", asset))])
            .header("Prefer", "return=representation")
            .json(&AmountPatch { amount });

        let response = Self::check(self.authorized(request).send().await?).await?;
        let updated: Vec<AssetBalance> = response.json().await?;
        if updated.is_empty() {
            return Err(StoreError::MissingRow(asset.to_string()));
        }
        Ok(())
    }

    async fn seed_balance(&self, asset: &str, amount: Decimal) -> Result<(), StoreError> {
        let row = AssetBalance {
            asset: asset.to_string(),
            amount,
        };
        let request = self
            .client
            .post(self.table_url(&self.config.assets_table))
            .header("Prefer", "resolution=merge-duplicates,return=minimal")
            .json(&row);

        Self::check(self.authorized(request).send().await?).await?;
        Ok(())
    }
}
