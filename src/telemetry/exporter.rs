//! Prometheus metrics
//!
//! The collector is a short-lived process, so instead of serving an endpoint
//! the rendered exposition text is written to a file once the run is over.

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use std::path::Path;

/// Counter metric types
#[derive(Debug, Clone, Copy)]
pub enum CounterMetric {
    /// Samples appended to the store
    SamplesRecorded,
    /// Symbols whose request or payload failed
    SymbolFailures,
    /// Paper trades executed by the threshold rule
    Trades,
}

impl CounterMetric {
    fn name(self) -> &'static str {
        match self {
            CounterMetric::SamplesRecorded => "coinpulse_samples_recorded_total",
            CounterMetric::SymbolFailures => "coinpulse_symbol_failures_total",
            CounterMetric::Trades => "coinpulse_trades_total",
        }
    }
}

/// Install the global Prometheus recorder
pub fn init_metrics() -> anyhow::Result<PrometheusHandle> {
    PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| anyhow::anyhow!("Failed to install metrics recorder: {}", e))
}

/// Increment a counter by `value`
pub fn incr_counter(metric: CounterMetric, value: u64) {
    ::metrics::counter!(metric.name()).increment(value);
}

/// Record the last observed price of a symbol
pub fn set_last_price(symbol: &str, price: Decimal) {
    let value = price.to_f64().unwrap_or_default();
    ::metrics::gauge!("coinpulse_last_price", "symbol" => symbol.to_string()).set(value);
    tracing::trace!(metric = "coinpulse_last_price", symbol, value, "Setting gauge");
}

/// Write the rendered exposition text, replacing the previous file
pub fn write_metrics_file(handle: &PrometheusHandle, path: &Path) -> anyhow::Result<()> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)?;
    }
    let tmp = path.with_extension("prom.tmp");
    std::fs::write(&tmp, handle.render())?;
    std::fs::rename(&tmp, path)?;
    tracing::debug!(path = ?path, "Wrote metrics textfile");
    Ok(())
}
