//! HTTP clients against a local canned server

use crate::support::{serve, serve_silently};
use coin_pulse::analyst::{Analyst, AnalystError, ChatClient, ChatConfig};
use coin_pulse::feed::{FeedError, GateIoClient, TickerSource};
use coin_pulse::store::{BalanceBook, PriceSample, PriceStore, StoreError, TableConfig, TableStore};
use rust_decimal_macros::dec;
use std::time::Duration;

fn table_store(url: String) -> TableStore {
    TableStore::new(TableConfig {
        url,
        key: "anon-key".to_string(),
        prices_table: "prices".to_string(),
        assets_table: "assets".to_string(),
        timeout: Duration::from_secs(5),
    })
    .unwrap()
}

#[tokio::test]
async fn test_gateio_fetch_ticker() {
    let body = r#"[{"currency_pair":"BTC_USDT","last":"91234.56","lowest_ask":"91234.6"}]"#;
    let (url, mut requests) = serve(vec![(200, body.to_string())]).await;

    let client = GateIoClient::new(url, Duration::from_secs(5)).unwrap();
    let ticker = client.fetch_ticker("BTC_USDT").await.unwrap();

    assert_eq!(ticker.symbol, "BTC_USDT");
    assert_eq!(ticker.price, dec!(91234.56));

    let request = requests.recv().await.unwrap();
    assert_eq!(
        request.request_line(),
        "GET /spot/tickers?currency_pair=BTC_USDT HTTP/1.1"
    );
}

#[tokio::test]
async fn test_gateio_error_status() {
    let body = r#"{"label":"INVALID_CURRENCY_PAIR","message":"Invalid currency pair"}"#;
    let (url, _requests) = serve(vec![(400, body.to_string())]).await;

    let client = GateIoClient::new(url, Duration::from_secs(5)).unwrap();
    let err = client.fetch_ticker("NOPE_USDT").await.unwrap_err();

    assert!(matches!(err, FeedError::Status { status: 400, ref body } if body.contains("INVALID")));
}

#[tokio::test]
async fn test_gateio_timeout_is_request_failure() {
    let url = serve_silently().await;

    let client = GateIoClient::new(url, Duration::from_millis(200)).unwrap();
    let err = client.fetch_ticker("BTC_USDT").await.unwrap_err();

    assert!(matches!(err, FeedError::Http(ref e) if e.is_timeout()));
}

#[tokio::test]
async fn test_table_inserts_rows_individually() {
    let (url, mut requests) = serve(vec![(201, String::new()), (201, String::new())]).await;
    let store = table_store(url);

    store
        .append(&[
            PriceSample::new("2025-01-04 20:30:00", "BTC_USDT", dec!(91000)),
            PriceSample::new("2025-01-04 20:30:00", "ETH_USDT", dec!(3100)),
        ])
        .await
        .unwrap();

    let first = requests.recv().await.unwrap();
    assert_eq!(first.request_line(), "POST /rest/v1/prices HTTP/1.1");
    assert_eq!(first.header("apikey"), Some("anon-key"));
    assert_eq!(first.header("authorization"), Some("Bearer anon-key"));
    let row: serde_json::Value = serde_json::from_str(&first.body).unwrap();
    assert_eq!(row["symbol"], "BTC_USDT");

    let second = requests.recv().await.unwrap();
    let row: serde_json::Value = serde_json::from_str(&second.body).unwrap();
    assert_eq!(row["symbol"], "ETH_USDT");
}

#[tokio::test]
async fn test_table_read_recent_query() {
    let body = r#"[{"id":7,"time":"2025-01-04 20:40:00","symbol":"BTC_USDT","price":91100.5}]"#;
    let (url, mut requests) = serve(vec![(200, body.to_string())]).await;
    let store = table_store(url);

    let rows = store.read_recent(200).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].price, dec!(91100.5));

    let request = requests.recv().await.unwrap();
    assert_eq!(
        request.request_line(),
        "GET /rest/v1/prices?select=*&order=time.desc&limit=200 HTTP/1.1"
    );
}

#[tokio::test]
async fn test_table_set_balance_missing_row() {
    let (url, mut requests) = serve(vec![(200, "[]".to_string())]).await;
    let store = table_store(url);

    let err = store.set_balance("BTC", dec!(0.5)).await.unwrap_err();
    assert!(matches!(err, StoreError::MissingRow(ref a) if a == "BTC"));

    let request = requests.recv().await.unwrap();
    assert_eq!(
        request.request_line(),
        "PATCH /rest/v1/assets?type=eq.BTC HTTP/1.1"
    );
    let patch: serde_json::Value = serde_json::from_str(&request.body).unwrap();
    assert_eq!(patch["amount"], "0.5");
}

#[tokio::test]
async fn test_table_error_status() {
    let (url, _requests) = serve(vec![(401, r#"{"message":"Invalid API key"}"#.to_string())]).await;
    let store = table_store(url);

    let err = store.balances().await.unwrap_err();
    assert!(matches!(err, StoreError::Status { status: 401, .. }));
}

#[tokio::test]
async fn test_chat_commentary_round_trip() {
    let body = r#"{"choices":[{"index":0,"message":{"role":"assistant","content":"1. Trend: sideways"}}]}"#;
    let (url, mut requests) = serve(vec![(200, body.to_string())]).await;

    let client = ChatClient::new(ChatConfig {
        base_url: url,
        api_key: "sk-test".to_string(),
        model: "deepseek-chat".to_string(),
        timeout: Duration::from_secs(5),
    })
    .unwrap();

    let text = client
        .commentary("BTC_USDT", "time  symbol  price\n")
        .await
        .unwrap();
    assert_eq!(text, "1. Trend: sideways");

    let request = requests.recv().await.unwrap();
    assert_eq!(request.request_line(), "POST /chat/completions HTTP/1.1");
    assert_eq!(request.header("authorization"), Some("Bearer sk-test"));
    let payload: serde_json::Value = serde_json::from_str(&request.body).unwrap();
    assert_eq!(payload["model"], "deepseek-chat");
    assert_eq!(payload["messages"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_chat_error_status() {
    let (url, _requests) = serve(vec![(402, r#"{"error":"Insufficient Balance"}"#.to_string())]).await;

    let client = ChatClient::new(ChatConfig {
        base_url: url,
        api_key: "sk-test".to_string(),
        model: "deepseek-chat".to_string(),
        timeout: Duration::from_secs(5),
    })
    .unwrap();

    let err = client.commentary("BTC_USDT", "").await.unwrap_err();
    assert!(matches!(err, AnalystError::Status { status: 402, .. }));
}
