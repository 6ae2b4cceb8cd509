//! Configuration types for coin-pulse

use anyhow::Context;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Environment variable carrying the hosted table base URL
pub const ENV_STORE_URL: &str = "COIN_PULSE_STORE_URL";
/// Environment variable carrying the hosted table API key
pub const ENV_STORE_KEY: &str = "COIN_PULSE_STORE_KEY";
/// Environment variable carrying the AI endpoint API key
pub const ENV_AI_API_KEY: &str = "COIN_PULSE_AI_API_KEY";
/// Environment variable carrying the AI endpoint base URL
pub const ENV_AI_BASE_URL: &str = "COIN_PULSE_AI_BASE_URL";
/// Environment variable overriding the exchange base URL
pub const ENV_EXCHANGE_BASE_URL: &str = "COIN_PULSE_EXCHANGE_BASE_URL";

/// Example configuration shipped with the binary
pub const EXAMPLE_CONFIG: &str = include_str!("../config.toml.example");

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A credential needed by the selected backend is absent
    #[error("Missing secret: {0}")]
    MissingSecret(&'static str),
    /// Configuration is structurally valid but unusable
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Root configuration structure
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub exchange: ExchangeConfig,
    pub store: StoreConfig,
    #[serde(default)]
    pub trading: TradingConfig,
    #[serde(default)]
    pub dashboard: DashboardConfig,
    #[serde(default)]
    pub ai: AiConfig,
    pub telemetry: TelemetryConfig,
}

/// Exchange ticker endpoint configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ExchangeConfig {
    /// Which public API to poll
    #[serde(default)]
    pub provider: ExchangeProvider,
    /// Base URL of the ticker API
    pub base_url: String,
    /// Pair identifiers to poll, in order
    pub symbols: Vec<String>,
    /// Per-request time limit
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    /// Courtesy delay between two requests
    #[serde(default = "default_request_delay_ms")]
    pub request_delay_ms: u64,
    /// Fixed offset applied to UTC when stamping samples
    #[serde(default = "default_utc_offset_hours")]
    pub utc_offset_hours: i32,
    /// Abort the whole batch on the first failing symbol
    #[serde(default)]
    pub fail_fast: bool,
}

/// Supported exchange APIs
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ExchangeProvider {
    #[default]
    GateIo,
    CoinCap,
}

fn default_request_timeout_secs() -> u64 {
    10
}
fn default_request_delay_ms() -> u64 {
    1000
}
fn default_utc_offset_hours() -> i32 {
    8 // Beijing time
}

/// Shared store configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StoreConfig {
    pub backend: StoreBackend,
    /// Price samples file (file backend)
    #[serde(default = "default_prices_path")]
    pub prices_path: PathBuf,
    /// Asset balances file (file backend)
    #[serde(default = "default_balances_path")]
    pub balances_path: PathBuf,
    /// Hosted table base URL (table backend)
    #[serde(default)]
    pub url: Option<String>,
    /// Hosted table API key (table backend)
    #[serde(default)]
    pub key: Option<String>,
    #[serde(default = "default_prices_table")]
    pub prices_table: String,
    #[serde(default = "default_assets_table")]
    pub assets_table: String,
    /// Per-request time limit for the hosted table
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

/// Storage backend
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    File,
    Table,
}

fn default_prices_path() -> PathBuf {
    PathBuf::from("./data/prices.parquet")
}
fn default_balances_path() -> PathBuf {
    PathBuf::from("./data/assets.parquet")
}
fn default_prices_table() -> String {
    "prices".to_string()
}
fn default_assets_table() -> String {
    "assets".to_string()
}

/// Paper trading threshold rule configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TradingConfig {
    #[serde(default)]
    pub enabled: bool,
    /// Pair whose samples drive the rule
    #[serde(default = "default_trading_symbol")]
    pub symbol: String,
    /// Asset that is bought and sold
    #[serde(default = "default_base_asset")]
    pub base_asset: String,
    /// Cash asset
    #[serde(default = "default_quote_asset")]
    pub quote_asset: String,
    #[serde(default = "default_buy_below")]
    pub buy_below: Decimal,
    #[serde(default = "default_sell_above")]
    pub sell_above: Decimal,
    /// Fraction of cash spent on a buy
    #[serde(default = "default_buy_fraction")]
    pub buy_fraction: Decimal,
    /// Fraction of held asset sold on a sell
    #[serde(default = "default_sell_fraction")]
    pub sell_fraction: Decimal,
}

fn default_trading_symbol() -> String {
    "BTC_USDT".to_string()
}
fn default_base_asset() -> String {
    "BTC".to_string()
}
fn default_quote_asset() -> String {
    "USDT".to_string()
}
fn default_buy_below() -> Decimal {
    Decimal::new(92_000, 0)
}
fn default_sell_above() -> Decimal {
    Decimal::new(98_000, 0)
}
fn default_buy_fraction() -> Decimal {
    Decimal::new(1, 1) // 0.1 = 10%
}
fn default_sell_fraction() -> Decimal {
    Decimal::new(5, 1) // 0.5 = 50%
}

impl Default for TradingConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            symbol: default_trading_symbol(),
            base_asset: default_base_asset(),
            quote_asset: default_quote_asset(),
            buy_below: default_buy_below(),
            sell_above: default_sell_above(),
            buy_fraction: default_buy_fraction(),
            sell_fraction: default_sell_fraction(),
        }
    }
}

/// Dashboard configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DashboardConfig {
    /// Upper bound on rows loaded from the store
    #[serde(default = "default_recent_limit")]
    pub recent_limit: usize,
    /// Number of most recent samples sent to the analyst
    #[serde(default = "default_ai_window")]
    pub ai_window: usize,
    /// Starting equity of the simulated account
    #[serde(default = "default_initial_equity")]
    pub initial_equity: Decimal,
    #[serde(default = "default_chart_width")]
    pub chart_width: u16,
    #[serde(default = "default_chart_height")]
    pub chart_height: u16,
}

fn default_recent_limit() -> usize {
    200
}
fn default_ai_window() -> usize {
    15
}
fn default_initial_equity() -> Decimal {
    Decimal::new(100_000, 0)
}
fn default_chart_width() -> u16 {
    80
}
fn default_chart_height() -> u16 {
    20
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            recent_limit: default_recent_limit(),
            ai_window: default_ai_window(),
            initial_equity: default_initial_equity(),
            chart_width: default_chart_width(),
            chart_height: default_chart_height(),
        }
    }
}

/// AI text-generation endpoint configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AiConfig {
    #[serde(default = "default_ai_base_url")]
    pub base_url: String,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_ai_model")]
    pub model: String,
    #[serde(default = "default_ai_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_ai_base_url() -> String {
    "https://api.deepseek.com".to_string()
}
fn default_ai_model() -> String {
    "deepseek-chat".to_string()
}
fn default_ai_timeout_secs() -> u64 {
    60
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            base_url: default_ai_base_url(),
            api_key: None,
            model: default_ai_model(),
            request_timeout_secs: default_ai_timeout_secs(),
        }
    }
}

/// Telemetry configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TelemetryConfig {
    pub log_level: String,
    #[serde(default)]
    pub log_format: LogFormat,
    /// Prometheus textfile written after each collect run
    #[serde(default)]
    pub metrics_file: Option<PathBuf>,
}

/// Log output format
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable format
    #[default]
    Pretty,
    /// JSON format for log aggregation
    Json,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Cannot read config {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Invalid config {}", path.display()))?;
        Ok(config)
    }

    /// The embedded example configuration
    pub fn example() -> anyhow::Result<Self> {
        Ok(toml::from_str(EXAMPLE_CONFIG)?)
    }

    /// Load `path`, falling back to the example configuration unless `strict`.
    ///
    /// The second value is the load error that caused a fallback.
    pub fn load_or_example(
        path: impl AsRef<Path>,
        strict: bool,
    ) -> anyhow::Result<(Self, Option<anyhow::Error>)> {
        match Self::load(path) {
            Ok(config) => Ok((config, None)),
            Err(e) if strict => Err(e),
            Err(e) => Ok((Self::example()?, Some(e))),
        }
    }

    /// Overlay secrets supplied by the host environment.
    ///
    /// `lookup` is usually `|k| std::env::var(k).ok()`; this is called once at
    /// startup so nothing downstream reads the environment.
    pub fn apply_secrets<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_STORE_URL) {
            self.store.url = Some(url);
        }
        if let Some(key) = lookup(ENV_STORE_KEY) {
            self.store.key = Some(key);
        }
        if let Some(key) = lookup(ENV_AI_API_KEY) {
            self.ai.api_key = Some(key);
        }
        if let Some(url) = lookup(ENV_AI_BASE_URL) {
            self.ai.base_url = url;
        }
        if let Some(url) = lookup(ENV_EXCHANGE_BASE_URL) {
            self.exchange.base_url = url;
        }
    }

    /// Check that the selected backends have what they need
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.exchange.symbols.is_empty() {
            return Err(ConfigError::Invalid("exchange.symbols is empty".into()));
        }
        if self.store.backend == StoreBackend::Table {
            if self.store.url.as_deref().map_or(true, str::is_empty) {
                return Err(ConfigError::MissingSecret("store.url"));
            }
            if self.store.key.as_deref().map_or(true, str::is_empty) {
                return Err(ConfigError::MissingSecret("store.key"));
            }
        }
        if self.trading.enabled && self.trading.buy_below >= self.trading.sell_above {
            return Err(ConfigError::Invalid(
                "trading.buy_below must be lower than trading.sell_above".into(),
            ));
        }
        Ok(())
    }

    /// Copy with credentials masked, for display
    pub fn redacted(&self) -> Self {
        let mut config = self.clone();
        let mask = |s: &mut Option<String>| {
            if s.is_some() {
                *s = Some("****".to_string());
            }
        };
        mask(&mut config.store.key);
        mask(&mut config.ai.api_key);
        config
    }
}
