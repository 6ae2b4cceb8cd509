//! Parquet file store
//!
//! Every append rewrites the whole file: existing rows are read back,
//! the new rows are concatenated and the result replaces the original
//! through a temporary sibling and a rename. There is no locking, so two
//! collectors running at once can lose each other's rows.

use super::types::{newest_first, AssetBalance, PriceSample, StoreError};
use super::{BalanceBook, PriceStore};
use arrow::array::{Array, ArrayRef, Float64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use async_trait::async_trait;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use parquet::arrow::ArrowWriter;
use parquet::basic::Compression;
use parquet::file::properties::WriterProperties;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use std::ffi::OsString;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;

/// Accepted header names per column; the first is the one written.
const TIME_COLUMNS: &[&str] = &["time", "时间"];
const SYMBOL_COLUMNS: &[&str] = &["symbol", "币种"];
const PRICE_COLUMNS: &[&str] = &["price", "价格"];
const ASSET_COLUMNS: &[&str] = &["type"];
const AMOUNT_COLUMNS: &[&str] = &["amount"];

/// Price sample schema fields
pub fn price_schema() -> Schema {
    Schema::new(vec![
        Field::new(TIME_COLUMNS[0], DataType::Utf8, false),
        Field::new(SYMBOL_COLUMNS[0], DataType::Utf8, false),
        Field::new(PRICE_COLUMNS[0], DataType::Utf8, false), // Store as string for Decimal precision
    ])
}

/// Asset balance schema fields
pub fn balance_schema() -> Schema {
    Schema::new(vec![
        Field::new(ASSET_COLUMNS[0], DataType::Utf8, false),
        Field::new(AMOUNT_COLUMNS[0], DataType::Utf8, false),
    ])
}

/// File-backed store: one Parquet file for prices, one for balances
pub struct ParquetStore {
    prices_path: PathBuf,
    balances_path: PathBuf,
}

impl ParquetStore {
    pub fn new(prices_path: impl Into<PathBuf>, balances_path: impl Into<PathBuf>) -> Self {
        Self {
            prices_path: prices_path.into(),
            balances_path: balances_path.into(),
        }
    }

    pub fn prices_path(&self) -> &Path {
        &self.prices_path
    }

    /// Read every stored sample in insertion order
    pub fn read_all(&self) -> Result<Vec<PriceSample>, StoreError> {
        if !self.prices_path.exists() {
            return Ok(Vec::new());
        }

        let mut samples = Vec::new();
        for batch in read_batches(&self.prices_path)? {
            let times = string_column(&batch, TIME_COLUMNS)?;
            let symbols = string_column(&batch, SYMBOL_COLUMNS)?;
            let prices = decimal_column(&batch, PRICE_COLUMNS)?;

            for ((time, symbol), price) in times.into_iter().zip(symbols).zip(prices) {
                samples.push(PriceSample {
                    time,
                    symbol,
                    price,
                });
            }
        }

        Ok(samples)
    }

    fn write_all(&self, rows: &[PriceSample]) -> Result<(), StoreError> {
        let schema = Arc::new(price_schema());

        let times: Vec<&str> = rows.iter().map(|r| r.time.as_str()).collect();
        let symbols: Vec<&str> = rows.iter().map(|r| r.symbol.as_str()).collect();
        let prices: Vec<String> = rows.iter().map(|r| r.price.to_string()).collect();

        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![
                Arc::new(StringArray::from(times)) as ArrayRef,
                Arc::new(StringArray::from(symbols)) as ArrayRef,
                Arc::new(StringArray::from(
                    prices.iter().map(|s| s.as_str()).collect::<Vec<_>>(),
                )) as ArrayRef,
            ],
        )?;

        replace_file(&self.prices_path, schema, &batch)?;
        tracing::debug!(path = ?self.prices_path, count = rows.len(), "Rewrote price file");
        Ok(())
    }

    fn read_balances(&self) -> Result<Vec<AssetBalance>, StoreError> {
        if !self.balances_path.exists() {
            return Ok(Vec::new());
        }

        let mut balances = Vec::new();
        for batch in read_batches(&self.balances_path)? {
            let assets = string_column(&batch, ASSET_COLUMNS)?;
            let amounts = decimal_column(&batch, AMOUNT_COLUMNS)?;
            balances.extend(
                assets
                    .into_iter()
                    .zip(amounts)
                    .map(|(asset, amount)| AssetBalance { asset, amount }),
            );
        }
        Ok(balances)
    }

    fn write_balances(&self, balances: &[AssetBalance]) -> Result<(), StoreError> {
        let schema = Arc::new(balance_schema());

        let assets: Vec<&str> = balances.iter().map(|b| b.asset.as_str()).collect();
        let amounts: Vec<String> = balances.iter().map(|b| b.amount.to_string()).collect();

        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![
                Arc::new(StringArray::from(assets)) as ArrayRef,
                Arc::new(StringArray::from(
                    amounts.iter().map(|s| s.as_str()).collect::<Vec<_>>(),
                )) as ArrayRef,
            ],
        )?;

        replace_file(&self.balances_path, schema, &batch)
    }

    fn upsert_balance(&self, asset: &str, amount: Decimal) -> Result<(), StoreError> {
        let mut balances = self.read_balances()?;
        match balances.iter_mut().find(|b| b.asset == asset) {
            Some(row) => row.amount = amount,
            None => balances.push(AssetBalance {
                asset: asset.to_string(),
                amount,
            }),
        }
        self.write_balances(&balances)
    }
}

#[async_trait]
impl PriceStore for ParquetStore {
    async fn append(&self, rows: &[PriceSample]) -> Result<(), StoreError> {
        if rows.is_empty() {
            return Ok(());
        }

        let mut all = self.read_all()?;
        let existing = all.len();
        all.extend_from_slice(rows);
        self.write_all(&all)?;

        tracing::info!(
            path = ?self.prices_path,
            existing,
            appended = rows.len(),
            "Appended samples to price file"
        );
        Ok(())
    }

    async fn read_recent(&self, limit: usize) -> Result<Vec<PriceSample>, StoreError> {
        Ok(newest_first(self.read_all()?, limit))
    }
}

#[async_trait]
impl BalanceBook for ParquetStore {
    async fn balances(&self) -> Result<Vec<AssetBalance>, StoreError> {
        self.read_balances()
    }

    async fn set_balance(&self, asset: &str, amount: Decimal) -> Result<(), StoreError> {
        self.upsert_balance(asset, amount)
    }

    async fn seed_balance(&self, asset: &str, amount: Decimal) -> Result<(), StoreError> {
        self.upsert_balance(asset, amount)
    }
}

fn read_batches(path: &Path) -> Result<Vec<RecordBatch>, StoreError> {
    let file = File::open(path)?;
    let reader = ParquetRecordBatchReaderBuilder::try_new(file)?.build()?;
    Ok(reader.collect::<Result<Vec<_>, _>>()?)
}

/// Write a single batch to `path` via a temporary sibling file
fn replace_file(path: &Path, schema: Arc<Schema>, batch: &RecordBatch) -> Result<(), StoreError> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }

    let tmp = temp_path(path);
    let file = File::create(&tmp)?;

    let props = WriterProperties::builder()
        .set_compression(Compression::SNAPPY)
        .build();

    let mut writer = ArrowWriter::try_new(file, schema, Some(props))?;
    writer.write(batch)?;
    writer.close()?;

    fs::rename(&tmp, path)?;
    Ok(())
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(".tmp");
    PathBuf::from(name)
}

fn column_index(batch: &RecordBatch, names: &[&str]) -> Result<usize, StoreError> {
    let schema = batch.schema();
    names
        .iter()
        .find_map(|name| schema.index_of(name).ok())
        .ok_or_else(|| StoreError::Schema(format!("missing column {}", names[0])))
}

fn string_column(batch: &RecordBatch, names: &[&str]) -> Result<Vec<String>, StoreError> {
    let column = batch.column(column_index(batch, names)?);
    let values = column
        .as_any()
        .downcast_ref::<StringArray>()
        .ok_or_else(|| StoreError::Schema(format!("column {} is not text", names[0])))?;

    (0..values.len())
        .map(|i| {
            if values.is_null(i) {
                Err(StoreError::Schema(format!("null in column {}", names[0])))
            } else {
                Ok(values.value(i).to_string())
            }
        })
        .collect()
}

/// Decimal column stored either as text or, in older files, as float
fn decimal_column(batch: &RecordBatch, names: &[&str]) -> Result<Vec<Decimal>, StoreError> {
    let column = batch.column(column_index(batch, names)?);
    let bad = |i: usize| StoreError::Schema(format!("bad value in column {} at row {}", names[0], i));

    if let Some(values) = column.as_any().downcast_ref::<StringArray>() {
        return (0..values.len())
            .map(|i| {
                if values.is_null(i) {
                    return Err(bad(i));
                }
                Decimal::from_str(values.value(i)).map_err(|_| bad(i))
            })
            .collect();
    }

    if let Some(values) = column.as_any().downcast_ref::<Float64Array>() {
        return (0..values.len())
            .map(|i| {
                if values.is_null(i) {
                    return Err(bad(i));
                }
                Decimal::from_f64(values.value(i)).ok_or_else(|| bad(i))
            })
            .collect();
    }

    Err(StoreError::Schema(format!(
        "column {} has unsupported type {}",
        names[0],
        column.data_type()
    )))
}
