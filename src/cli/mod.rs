//! CLI interface for coin-pulse
//!
//! Provides subcommands for:
//! - `collect`: Poll prices once and append them to the store
//! - `dashboard`: Chart, latest change and AI commentary for one symbol
//! - `account`: Show or seed the paper trading balances
//! - `config`: Show the effective configuration

mod account;
mod collect;
mod dashboard;

pub use account::{AccountArgs, AccountCommand};
pub use collect::CollectArgs;
pub use dashboard::DashboardArgs;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "coin-pulse")]
#[command(about = "Crypto spot price collector and dashboard")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    pub config: String,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Poll every configured symbol once and store the samples
    Collect(CollectArgs),
    /// Render the price dashboard
    Dashboard(DashboardArgs),
    /// Paper trading account
    Account(AccountArgs),
    /// Show configuration
    Config,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_collect() {
        let cli = Cli::parse_from(["coin-pulse", "collect", "--dry-run"]);
        assert_eq!(cli.config, "config.toml");
        assert!(matches!(cli.command, Commands::Collect(CollectArgs { dry_run: true, no_trade: false })));
    }

    #[test]
    fn test_parse_dashboard() {
        let cli = Cli::parse_from([
            "coin-pulse",
            "--config",
            "prod.toml",
            "dashboard",
            "-s",
            "ETH_USDT",
            "--ai",
            "--limit",
            "50",
        ]);
        assert_eq!(cli.config, "prod.toml");
        match cli.command {
            Commands::Dashboard(args) => {
                assert_eq!(args.symbol.as_deref(), Some("ETH_USDT"));
                assert!(args.ai);
                assert!(!args.data);
                assert_eq!(args.limit, Some(50));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_account_init() {
        let cli = Cli::parse_from(["coin-pulse", "account", "init", "--cash", "100000"]);
        match cli.command {
            Commands::Account(AccountArgs {
                command: AccountCommand::Init { cash, held },
            }) => {
                assert_eq!(cash, rust_decimal_macros::dec!(100000));
                assert!(held.is_zero());
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }
}
