//! Dashboard module
//!
//! Reads a bounded slice of the store and renders a text report: account
//! summary, latest price with change, a price chart and optional AI
//! commentary. Every failure ends up as a line in the report; rendering
//! itself never fails.

mod account;
mod chart;
mod view;

pub use account::AccountSummary;
pub use chart::render_chart;
pub use view::{format_change, format_signed, format_usd, MarketView, SymbolSeries};

use crate::analyst::Analyst;
use crate::config::{DashboardConfig, TradingConfig};
use crate::store::{BalanceBook, PriceSample, PriceStore, Store, StoreError};
use rust_decimal::Decimal;
use std::fmt::Write as _;
use std::sync::Arc;

/// Dashboard settings
#[derive(Debug, Clone)]
pub struct DashboardSettings {
    /// Upper bound on rows loaded from the store
    pub recent_limit: usize,
    /// Samples handed to the analyst
    pub ai_window: usize,
    pub initial_equity: Decimal,
    pub chart_width: u16,
    pub chart_height: u16,
    /// Pair used to mark the paper account
    pub trading_symbol: String,
    pub base_asset: String,
    pub quote_asset: String,
}

impl DashboardSettings {
    /// Create from DashboardConfig and TradingConfig
    pub fn from_config(dashboard: &DashboardConfig, trading: &TradingConfig) -> Self {
        Self {
            recent_limit: dashboard.recent_limit,
            ai_window: dashboard.ai_window,
            initial_equity: dashboard.initial_equity,
            chart_width: dashboard.chart_width,
            chart_height: dashboard.chart_height,
            trading_symbol: trading.symbol.clone(),
            base_asset: trading.base_asset.clone(),
            quote_asset: trading.quote_asset.clone(),
        }
    }
}

/// What the caller asked to see
#[derive(Debug, Clone, Default)]
pub struct DashboardRequest {
    /// Symbol to show; the first loaded symbol when `None`
    pub symbol: Option<String>,
    /// Ask the analyst for commentary
    pub with_ai: bool,
    /// Append the raw samples of the selected symbol
    pub show_data: bool,
}

/// Read-only view over the shared store
pub struct Dashboard {
    store: Arc<dyn Store>,
    analyst: Option<Box<dyn Analyst>>,
    settings: DashboardSettings,
}

/// Load at most `limit` recent samples
pub async fn load_samples<S>(store: &S, limit: usize) -> Result<Vec<PriceSample>, StoreError>
where
    S: PriceStore + ?Sized,
{
    store.read_recent(limit).await
}

impl Dashboard {
    pub fn new(store: Arc<dyn Store>, settings: DashboardSettings) -> Self {
        Self {
            store,
            analyst: None,
            settings,
        }
    }

    pub fn with_analyst(mut self, analyst: Box<dyn Analyst>) -> Self {
        self.analyst = Some(analyst);
        self
    }

    /// Account summary marked at the latest loaded price
    pub async fn account(&self, view: &MarketView) -> Result<AccountSummary, StoreError> {
        let balances = self.store.balances().await?;
        Ok(AccountSummary::compute(
            &balances,
            &self.settings.base_asset,
            &self.settings.quote_asset,
            view.latest_price(&self.settings.trading_symbol),
            self.settings.initial_equity,
        ))
    }

    /// Render the full report
    pub async fn render(&self, request: &DashboardRequest) -> String {
        let mut out = String::new();

        let view = match load_samples(self.store.as_ref(), self.settings.recent_limit).await {
            Ok(samples) => MarketView::from_samples(samples),
            Err(e) => {
                tracing::error!(error = %e, "Failed to load samples");
                let _ = writeln!(out, "System error: {}", e);
                return out;
            }
        };

        match self.account(&view).await {
            Ok(summary) => out.push_str(&summary.render()),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read balances");
                let _ = writeln!(out, "Cannot read account: {}", e);
            }
        }
        out.push('\n');

        if view.is_empty() {
            out.push_str("Store is empty; waiting for the collector to add samples.\n");
            return out;
        }

        let Some(series) = view.select(request.symbol.as_deref()) else {
            let _ = writeln!(
                out,
                "No data for {}. Available: {}",
                request.symbol.as_deref().unwrap_or_default(),
                view.symbols().join(", ")
            );
            return out;
        };

        out.push_str(&price_headline(series));
        out.push('\n');
        out.push_str(&render_chart(
            series,
            self.settings.chart_width,
            self.settings.chart_height,
        ));

        if request.with_ai {
            out.push('\n');
            out.push_str(&self.commentary(series).await);
        }

        if request.show_data {
            out.push('\n');
            out.push_str(&series.recent_table(series.samples.len()));
        }

        out
    }

    async fn commentary(&self, series: &SymbolSeries) -> String {
        let Some(analyst) = &self.analyst else {
            return "AI commentary unavailable: no AI endpoint configured.\n".to_string();
        };

        let table = series.recent_table(self.settings.ai_window);
        match analyst.commentary(&series.symbol, &table).await {
            Ok(text) => format!("AI analyst ({}):\n{}\n", series.symbol, text),
            Err(e) => {
                tracing::warn!(symbol = %series.symbol, error = %e, "AI call failed");
                format!("AI call failed: {}\n", e)
            }
        }
    }
}

/// "BTC_USDT latest: $91,000.0000 (+1.23%)"
pub fn price_headline(series: &SymbolSeries) -> String {
    let Some(latest) = series.latest() else {
        return format!("{}: no data\n", series.symbol);
    };
    match series.change_pct() {
        Some(change) => format!(
            "{} latest: {} ({})\n",
            series.symbol,
            format_usd(latest.price, 4),
            format_change(change)
        ),
        None => format!("{} latest: {}\n", series.symbol, format_usd(latest.price, 4)),
    }
}
