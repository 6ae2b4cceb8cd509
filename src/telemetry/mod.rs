//! Telemetry module
//!
//! Logging and metrics

mod logging;
mod exporter;

pub use logging::init_logging;
pub use exporter::{incr_counter, init_metrics, set_last_price, write_metrics_file, CounterMetric};

use crate::config::TelemetryConfig;
use metrics_exporter_prometheus::PrometheusHandle;
use std::path::PathBuf;

/// Handle to the telemetry subsystems installed for this process
pub struct TelemetryGuard {
    metrics: Option<(PrometheusHandle, PathBuf)>,
}

impl TelemetryGuard {
    /// Flush metrics to the configured textfile, if any
    pub fn flush(&self) {
        if let Some((handle, path)) = &self.metrics {
            if let Err(e) = write_metrics_file(handle, path) {
                tracing::warn!(error = %e, "Failed to write metrics file");
            }
        }
    }
}

/// Initialize all telemetry subsystems
pub fn init_telemetry(config: &TelemetryConfig) -> anyhow::Result<TelemetryGuard> {
    init_logging(&config.log_level, config.log_format)?;

    let metrics = match &config.metrics_file {
        Some(path) => Some((init_metrics()?, path.clone())),
        None => None,
    };

    Ok(TelemetryGuard { metrics })
}
