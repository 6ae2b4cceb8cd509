//! Account command implementation

use crate::config::Config;
use crate::dashboard::{load_samples, AccountSummary, MarketView};
use crate::store::{open_store, BalanceBook};
use clap::{Args, Subcommand};
use rust_decimal::Decimal;

#[derive(Args, Debug)]
pub struct AccountArgs {
    #[command(subcommand)]
    pub command: AccountCommand,
}

#[derive(Subcommand, Debug)]
pub enum AccountCommand {
    /// Show simulated balances
    Show,
    /// Create or reset the simulated balances
    Init {
        /// Starting cash in the quote asset
        #[arg(long)]
        cash: Decimal,

        /// Starting holding of the base asset
        #[arg(long, default_value = "0")]
        held: Decimal,
    },
}

impl AccountArgs {
    pub async fn execute(&self, config: &Config) -> anyhow::Result<()> {
        let store = open_store(&config.store)?;
        let trading = &config.trading;

        match &self.command {
            AccountCommand::Show => {
                let balances = store.balances().await?;
                let samples = load_samples(store.as_ref(), config.dashboard.recent_limit).await?;
                let view = MarketView::from_samples(samples);
                let summary = AccountSummary::compute(
                    &balances,
                    &trading.base_asset,
                    &trading.quote_asset,
                    view.latest_price(&trading.symbol),
                    config.dashboard.initial_equity,
                );
                print!("{}", summary.render());
            }
            AccountCommand::Init { cash, held } => {
                if cash.is_sign_negative() || held.is_sign_negative() {
                    anyhow::bail!("Balances must not be negative");
                }
                store.seed_balance(&trading.quote_asset, *cash).await?;
                store.seed_balance(&trading.base_asset, *held).await?;
                tracing::info!(cash = %cash, held = %held, "Paper account initialised");
                println!(
                    "Paper account set: {} {}, {} {}",
                    cash, trading.quote_asset, held, trading.base_asset
                );
            }
        }

        Ok(())
    }
}
