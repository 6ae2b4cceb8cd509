use clap::Parser;
use coin_pulse::cli::{Cli, Commands};
use coin_pulse::config::Config;
use std::process::ExitCode;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Load configuration; a scheduled collect must not run on the example
    let strict = matches!(cli.command, Commands::Collect(_));
    let mut config = match Config::load_or_example(&cli.config, strict) {
        Ok((config, None)) => config,
        Ok((config, Some(e))) => {
            eprintln!("Warning: Could not load config from {}: {:#}", cli.config, e);
            eprintln!("Using default configuration");
            config
        }
        Err(e) => {
            eprintln!("Error: {:#}", e);
            return ExitCode::FAILURE;
        }
    };
    config.apply_secrets(|key| std::env::var(key).ok());

    // Initialize telemetry
    let telemetry = match coin_pulse::telemetry::init_telemetry(&config.telemetry) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let result = match cli.command {
        Commands::Collect(args) => {
            tracing::info!("Starting collector run");
            let result = args.execute(&config).await.map(|_| ());
            telemetry.flush();
            result
        }
        Commands::Dashboard(args) => args.execute(&config).await,
        Commands::Account(args) => args.execute(&config).await,
        Commands::Config => match toml::to_string_pretty(&config.redacted()) {
            Ok(text) => {
                println!("{}", text);
                Ok(())
            }
            Err(e) => Err(e.into()),
        },
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "Run failed");
            ExitCode::FAILURE
        }
    }
}
