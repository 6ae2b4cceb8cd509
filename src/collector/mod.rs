//! Price collector
//!
//! One pass over the configured symbols: fetch each ticker, stamp it with
//! the batch time, append the whole batch to the store in one call, then
//! run the paper trading rule on the recorded samples. A failing symbol is
//! logged and skipped unless fail-fast mode is on.

use crate::config::ExchangeConfig;
use crate::execution::{PaperTrader, TradeAction};
use crate::feed::{FeedError, TickerSource};
use crate::store::{PriceSample, PriceStore, Store, StoreError};
use crate::telemetry::{incr_counter, set_last_price, CounterMetric};
use chrono::{DateTime, FixedOffset, Offset, Utc};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Wall-clock format of recorded timestamps
pub const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Whole-run collector failures
#[derive(Debug, Error)]
pub enum CollectError {
    /// Fail-fast mode stopped at the first failing symbol
    #[error("Aborted at {symbol}: {source}")]
    Aborted {
        symbol: String,
        #[source]
        source: FeedError,
    },
    /// The batch could not be written
    #[error("Store write failed: {0}")]
    Store(#[from] StoreError),
}

/// Collector settings
#[derive(Debug, Clone)]
pub struct CollectorSettings {
    /// Symbols to poll, in order
    pub symbols: Vec<String>,
    /// Courtesy delay between two requests
    pub request_delay: Duration,
    /// Hours added to UTC for the recorded wall-clock time
    pub utc_offset_hours: i32,
    /// Abort on the first failing symbol
    pub fail_fast: bool,
}

impl CollectorSettings {
    /// Create from ExchangeConfig
    pub fn from_config(config: &ExchangeConfig) -> Self {
        Self {
            symbols: config.symbols.clone(),
            request_delay: Duration::from_millis(config.request_delay_ms),
            utc_offset_hours: config.utc_offset_hours,
            fail_fast: config.fail_fast,
        }
    }
}

/// Outcome of one collector run
#[derive(Debug, Default, Clone)]
pub struct CollectReport {
    /// Symbols requested
    pub attempted: usize,
    /// Samples collected, in request order
    pub samples: Vec<PriceSample>,
    /// Symbols that failed, with the error text
    pub failures: Vec<(String, String)>,
    /// Paper trades executed
    pub trades: Vec<TradeAction>,
    /// Trading rule errors (sample still recorded)
    pub trade_failures: Vec<String>,
    /// Whether the store was written
    pub written: bool,
}

/// Format `now` shifted by a fixed number of hours
pub fn local_timestamp(now: DateTime<Utc>, utc_offset_hours: i32) -> String {
    let offset = utc_offset_hours
        .checked_mul(3600)
        .and_then(FixedOffset::east_opt)
        .unwrap_or(Utc.fix());
    now.with_timezone(&offset).format(TIME_FORMAT).to_string()
}

/// Polls a ticker source and appends samples to a store
pub struct Collector {
    source: Box<dyn TickerSource>,
    store: Arc<dyn Store>,
    trader: Option<PaperTrader>,
    settings: CollectorSettings,
}

impl Collector {
    pub fn new(
        source: Box<dyn TickerSource>,
        store: Arc<dyn Store>,
        settings: CollectorSettings,
    ) -> Self {
        Self {
            source,
            store,
            trader: None,
            settings,
        }
    }

    /// Run the paper trading rule on the trader's symbol
    pub fn with_trader(mut self, trader: PaperTrader) -> Self {
        self.trader = Some(trader);
        self
    }

    /// Run one batch stamped with the current time
    pub async fn run(&self) -> Result<CollectReport, CollectError> {
        self.run_at(Utc::now()).await
    }

    /// Run one batch stamped with `now`
    pub async fn run_at(&self, now: DateTime<Utc>) -> Result<CollectReport, CollectError> {
        let time = local_timestamp(now, self.settings.utc_offset_hours);
        let mut report = CollectReport {
            attempted: self.settings.symbols.len(),
            ..Default::default()
        };

        tracing::info!(
            source = self.source.name(),
            symbols = self.settings.symbols.len(),
            time = %time,
            "Collector run starting"
        );

        for (i, symbol) in self.settings.symbols.iter().enumerate() {
            if i > 0 && !self.settings.request_delay.is_zero() {
                tokio::time::sleep(self.settings.request_delay).await;
            }

            let ticker = match self.source.fetch_ticker(symbol).await {
                Ok(ticker) => ticker,
                Err(e) => {
                    incr_counter(CounterMetric::SymbolFailures, 1);
                    if self.settings.fail_fast {
                        tracing::error!(symbol = %symbol, error = %e, "Ticker failed, aborting run");
                        return Err(CollectError::Aborted {
                            symbol: symbol.clone(),
                            source: e,
                        });
                    }
                    tracing::warn!(symbol = %symbol, error = %e, "Ticker failed, skipping");
                    report.failures.push((symbol.clone(), e.to_string()));
                    continue;
                }
            };

            tracing::info!(symbol = %ticker.symbol, price = %ticker.price, "Price sampled");
            set_last_price(&ticker.symbol, ticker.price);

            report
                .samples
                .push(PriceSample::new(time.clone(), ticker.symbol, ticker.price));
        }

        if report.samples.is_empty() {
            tracing::warn!(failed = report.failures.len(), "No samples collected, store left untouched");
            return Ok(report);
        }

        self.store.append(&report.samples).await?;
        report.written = true;
        incr_counter(CounterMetric::SamplesRecorded, report.samples.len() as u64);

        // Balances only move for prices that made it into the store
        let recorded = report.samples.clone();
        for sample in &recorded {
            self.run_trader(sample, &mut report).await;
        }

        tracing::info!(
            recorded = report.samples.len(),
            failed = report.failures.len(),
            trades = report.trades.len(),
            "Collector run finished"
        );

        Ok(report)
    }

    async fn run_trader(&self, sample: &PriceSample, report: &mut CollectReport) {
        let Some(trader) = &self.trader else {
            return;
        };
        if !trader.watches(&sample.symbol) {
            return;
        }

        match trader.apply(self.store.as_ref(), sample.price).await {
            Ok(Some(action)) => {
                incr_counter(CounterMetric::Trades, 1);
                report.trades.push(action);
            }
            Ok(None) => {}
            Err(e) => {
                tracing::warn!(symbol = %sample.symbol, error = %e, "Paper trade failed");
                report.trade_failures.push(e.to_string());
            }
        }
    }
}
