//! Configuration integration tests

use coin_pulse::config::{Config, StoreBackend};

#[test]
fn test_example_config_loads_from_disk() {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/config.toml.example");
    let config = Config::load(path).unwrap();

    assert_eq!(config.store.backend, StoreBackend::File);
    assert_eq!(
        config.exchange.symbols,
        vec!["BTC_USDT", "ETH_USDT", "SOL_USDT", "DOGE_USDT"]
    );
    assert!(config.validate().is_ok());
}

#[test]
fn test_redacted_config_round_trips_through_toml() {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/config.toml.example");
    let mut config = Config::load(path).unwrap();
    config.ai.api_key = Some("sk-live".to_string());

    let text = toml::to_string_pretty(&config.redacted()).unwrap();
    assert!(!text.contains("sk-live"));

    let parsed: Config = toml::from_str(&text).unwrap();
    assert_eq!(parsed.exchange.symbols.len(), 4);
    assert_eq!(parsed.trading.buy_below, config.trading.buy_below);
}
