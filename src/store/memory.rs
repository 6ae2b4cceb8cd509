//! In-process store used for dry runs

use super::types::{newest_first, AssetBalance, PriceSample, StoreError};
use super::{BalanceBook, PriceStore};
use async_trait::async_trait;
use rust_decimal::Decimal;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use tokio::sync::RwLock;

/// Volatile store keeping rows and balances in memory
#[derive(Default)]
pub struct MemoryStore {
    samples: RwLock<Vec<PriceSample>>,
    balances: RwLock<Vec<AssetBalance>>,
    appends: AtomicUsize,
    balance_writes: AtomicUsize,
    reject_appends: AtomicBool,
    reject_reads: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with samples and balances
    pub fn with_data(samples: Vec<PriceSample>, balances: Vec<AssetBalance>) -> Self {
        Self {
            samples: RwLock::new(samples),
            balances: RwLock::new(balances),
            ..Self::default()
        }
    }

    /// Make subsequent price appends fail; balance updates still go through
    pub fn reject_appends(&self, reject: bool) {
        self.reject_appends.store(reject, Ordering::SeqCst);
    }

    /// Make subsequent reads of either table fail
    pub fn reject_reads(&self, reject: bool) {
        self.reject_reads.store(reject, Ordering::SeqCst);
    }

    /// Snapshot of all samples in insertion order
    pub async fn samples(&self) -> Vec<PriceSample> {
        self.samples.read().await.clone()
    }

    /// Number of non-empty `append` calls that reached the store
    pub fn append_count(&self) -> usize {
        self.appends.load(Ordering::SeqCst)
    }

    /// Number of balance updates that reached the store
    pub fn balance_write_count(&self) -> usize {
        self.balance_writes.load(Ordering::SeqCst)
    }

    fn check(flag: &AtomicBool, what: &str) -> Result<(), StoreError> {
        if flag.load(Ordering::SeqCst) {
            return Err(StoreError::Rejected(format!("memory store {} disabled", what)));
        }
        Ok(())
    }
}

#[async_trait]
impl PriceStore for MemoryStore {
    async fn append(&self, rows: &[PriceSample]) -> Result<(), StoreError> {
        if rows.is_empty() {
            return Ok(());
        }
        Self::check(&self.reject_appends, "appends")?;
        self.samples.write().await.extend_from_slice(rows);
        self.appends.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn read_recent(&self, limit: usize) -> Result<Vec<PriceSample>, StoreError> {
        Self::check(&self.reject_reads, "reads")?;
        Ok(newest_first(self.samples().await, limit))
    }
}

#[async_trait]
impl BalanceBook for MemoryStore {
    async fn balances(&self) -> Result<Vec<AssetBalance>, StoreError> {
        Self::check(&self.reject_reads, "reads")?;
        Ok(self.balances.read().await.clone())
    }

    async fn set_balance(&self, asset: &str, amount: Decimal) -> Result<(), StoreError> {
        let mut balances = self.balances.write().await;
        let row = balances
            .iter_mut()
            .find(|b| b.asset == asset)
            .ok_or_else(|| StoreError::MissingRow(asset.to_string()))?;
        row.amount = amount;
        self.balance_writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn seed_balance(&self, asset: &str, amount: Decimal) -> Result<(), StoreError> {
        let mut balances = self.balances.write().await;
        match balances.iter_mut().find(|b| b.asset == asset) {
            Some(row) => row.amount = amount,
            None => balances.push(AssetBalance {
                asset: asset.to_string(),
                amount,
            }),
        }
        Ok(())
    }
}
