//! Collector runs against the Parquet file store

use crate::support::StaticSource;
use chrono::{TimeZone, Utc};
use coin_pulse::collector::{Collector, CollectorSettings};
use coin_pulse::execution::{PaperTrader, ThresholdRule};
use coin_pulse::store::{BalanceBook, ParquetStore, PriceSample, PriceStore};
use rust_decimal_macros::dec;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

fn settings(symbols: &[&str]) -> CollectorSettings {
    CollectorSettings {
        symbols: symbols.iter().map(|s| s.to_string()).collect(),
        request_delay: Duration::from_millis(5),
        utc_offset_hours: 8,
        fail_fast: false,
    }
}

fn file_store(dir: &TempDir) -> Arc<ParquetStore> {
    Arc::new(ParquetStore::new(
        dir.path().join("prices.parquet"),
        dir.path().join("assets.parquet"),
    ))
}

#[tokio::test]
async fn test_first_run_creates_file_with_run_rows() {
    let dir = TempDir::new().unwrap();
    let store = file_store(&dir);
    let source = StaticSource::new(&[("BTC_USDT", dec!(91000.5)), ("ETH_USDT", dec!(3100))]);

    let collector = Collector::new(Box::new(source), store.clone(), settings(&["BTC_USDT", "ETH_USDT"]));
    let now = Utc.with_ymd_and_hms(2025, 1, 4, 12, 30, 0).unwrap();
    collector.run_at(now).await.unwrap();

    let rows = store.read_all().unwrap();
    assert_eq!(
        rows,
        vec![
            PriceSample::new("2025-01-04 20:30:00", "BTC_USDT", dec!(91000.5)),
            PriceSample::new("2025-01-04 20:30:00", "ETH_USDT", dec!(3100)),
        ]
    );
}

#[tokio::test]
async fn test_runs_accumulate_n_plus_m_rows() {
    let dir = TempDir::new().unwrap();
    let store = file_store(&dir);
    let symbols = ["BTC_USDT", "ETH_USDT", "SOL_USDT"];

    let first = Collector::new(
        Box::new(StaticSource::new(&[
            ("BTC_USDT", dec!(91000)),
            ("ETH_USDT", dec!(3100)),
            ("SOL_USDT", dec!(200)),
        ])),
        store.clone(),
        settings(&symbols),
    );
    first
        .run_at(Utc.with_ymd_and_hms(2025, 1, 4, 12, 0, 0).unwrap())
        .await
        .unwrap();
    let before = store.read_all().unwrap();
    assert_eq!(before.len(), 3);

    // SOL fails in the second run
    let second = Collector::new(
        Box::new(StaticSource::new(&[
            ("BTC_USDT", dec!(91500)),
            ("ETH_USDT", dec!(3150)),
        ])),
        store.clone(),
        settings(&symbols),
    );
    let report = second
        .run_at(Utc.with_ymd_and_hms(2025, 1, 4, 12, 10, 0).unwrap())
        .await
        .unwrap();
    assert_eq!(report.failures.len(), 1);

    let after = store.read_all().unwrap();
    assert_eq!(after.len(), 5);
    assert_eq!(&after[..3], &before[..]);
    assert_eq!(after[3].symbol, "BTC_USDT");
    assert_eq!(after[4].price, dec!(3150));
}

#[tokio::test]
async fn test_all_failures_leave_file_unchanged() {
    let dir = TempDir::new().unwrap();
    let store = file_store(&dir);
    store
        .append(&[PriceSample::new("2025-01-04 20:00:00", "BTC_USDT", dec!(91000))])
        .await
        .unwrap();
    let before = std::fs::read(store.prices_path()).unwrap();

    let collector = Collector::new(
        Box::new(StaticSource::new(&[])),
        store.clone(),
        settings(&["BTC_USDT", "ETH_USDT"]),
    );
    let report = collector.run().await.unwrap();

    assert!(!report.written);
    assert_eq!(std::fs::read(store.prices_path()).unwrap(), before);
}

#[tokio::test]
async fn test_paper_trading_against_file_balances() {
    let dir = TempDir::new().unwrap();
    let store = file_store(&dir);
    store.seed_balance("USDT", dec!(0)).await.unwrap();
    store.seed_balance("BTC", dec!(1)).await.unwrap();

    let collector = Collector::new(
        Box::new(StaticSource::new(&[("BTC_USDT", dec!(99000))])),
        store.clone(),
        settings(&["BTC_USDT"]),
    )
    .with_trader(PaperTrader::new(
        ThresholdRule::default(),
        "BTC_USDT",
        "BTC",
        "USDT",
    ));

    let report = collector.run().await.unwrap();

    assert_eq!(report.trades.len(), 1);
    assert_eq!(store.balance("BTC").await.unwrap(), dec!(0.5));
    assert_eq!(store.balance("USDT").await.unwrap(), dec!(49500));
    assert_eq!(store.read_recent(10).await.unwrap().len(), 1);
}
