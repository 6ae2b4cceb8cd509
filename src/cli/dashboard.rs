//! Dashboard command implementation

use crate::analyst::{ChatClient, ChatConfig};
use crate::config::Config;
use crate::dashboard::{Dashboard, DashboardRequest, DashboardSettings};
use crate::store::open_store;
use clap::Args;

#[derive(Args, Debug)]
pub struct DashboardArgs {
    /// Symbol to show (defaults to the most recently sampled one)
    #[arg(short, long)]
    pub symbol: Option<String>,

    /// Ask the AI analyst for commentary
    #[arg(long)]
    pub ai: bool,

    /// Print the raw samples of the selected symbol
    #[arg(long)]
    pub data: bool,

    /// Override the number of recent rows loaded
    #[arg(long)]
    pub limit: Option<usize>,
}

impl DashboardArgs {
    /// Render the dashboard; problems are shown, never returned
    pub async fn execute(&self, config: &Config) -> anyhow::Result<()> {
        let store = match open_store(&config.store) {
            Ok(store) => store,
            Err(e) => {
                tracing::error!(error = %e, "Cannot open store");
                println!("Store configuration error: {}", e);
                return Ok(());
            }
        };

        let mut settings = DashboardSettings::from_config(&config.dashboard, &config.trading);
        if let Some(limit) = self.limit {
            settings.recent_limit = limit;
        }

        let mut dashboard = Dashboard::new(store, settings);
        if self.ai {
            match ChatConfig::from_config(&config.ai).and_then(ChatClient::new) {
                Ok(client) => dashboard = dashboard.with_analyst(Box::new(client)),
                Err(e) => tracing::warn!(error = %e, "AI analyst disabled"),
            }
        }

        let request = DashboardRequest {
            symbol: self.symbol.clone(),
            with_ai: self.ai,
            show_data: self.data,
        };

        print!("{}", dashboard.render(&request).await);
        Ok(())
    }
}
