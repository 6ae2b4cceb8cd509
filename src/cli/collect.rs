//! Collect command implementation

use crate::collector::{CollectReport, Collector, CollectorSettings};
use crate::config::Config;
use crate::execution::PaperTrader;
use crate::feed::build_source;
use crate::store::{open_store, BalanceBook, MemoryStore, Store};
use clap::Args;
use std::sync::Arc;

#[derive(Args, Debug)]
pub struct CollectArgs {
    /// Poll and log without writing to the configured store; trades run
    /// against a copy of the stored balances
    #[arg(long)]
    pub dry_run: bool,

    /// Skip the paper trading rule even if enabled in config
    #[arg(long)]
    pub no_trade: bool,
}

impl CollectArgs {
    pub async fn execute(&self, config: &Config) -> anyhow::Result<CollectReport> {
        config.validate()?;

        let trading = config.trading.enabled && !self.no_trade;
        let store: Arc<dyn Store> = if self.dry_run {
            tracing::info!("Dry run: samples and trades are kept in memory");
            Arc::new(dry_run_store(config, trading).await?)
        } else {
            open_store(&config.store)?
        };

        let source = build_source(&config.exchange)?;
        let mut collector = Collector::new(
            source,
            store,
            CollectorSettings::from_config(&config.exchange),
        );

        if trading {
            tracing::info!(symbol = %config.trading.symbol, "Paper trading rule enabled");
            collector = collector.with_trader(PaperTrader::from_config(&config.trading));
        }

        let report = collector.run().await?;

        for sample in &report.samples {
            println!("{}  {:<12} {}", sample.time, sample.symbol, sample.price);
        }
        for (symbol, error) in &report.failures {
            println!("FAILED {:<12} {}", symbol, error);
        }
        for trade in &report.trades {
            println!(
                "TRADE  {:?} {} @ {} (cash {}, held {})",
                trade.side, trade.quantity, trade.price, trade.cash_after, trade.held_after
            );
        }

        Ok(report)
    }
}

/// In-memory store for a dry run, holding a copy of the configured balances
/// when the trading rule will run
async fn dry_run_store(config: &Config, trading: bool) -> anyhow::Result<MemoryStore> {
    if !trading {
        return Ok(MemoryStore::new());
    }
    let balances = open_store(&config.store)?.balances().await?;
    tracing::info!(assets = balances.len(), "Dry run: copied balances");
    Ok(MemoryStore::with_data(Vec::new(), balances))
}
