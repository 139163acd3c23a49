use tempfile::TempDir;
use wiremock::{
    matchers::{method, path},
    Mock, MockServer, ResponseTemplate,
};

use printquote::currency::fetch_rate;
use printquote::{PricingSession, QuoteError};

async fn quote_server(body: serde_json::Value) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/cotizaciones/usd"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(&server)
        .await;
    server
}

fn quote_url(server: &MockServer) -> String {
    format!("{}/v1/cotizaciones/usd", server.uri())
}

#[tokio::test]
async fn test_fetch_rate_resolves_mean_of_buy_and_sell() {
    let server = quote_server(serde_json::json!({
        "moneda": "USD",
        "compra": 39.0,
        "venta": 41.0,
        "fechaActualizacion": "2025-01-01T00:00:00Z"
    }))
    .await;

    let client = reqwest::Client::new();
    let rate = fetch_rate(&client, &quote_url(&server)).await.unwrap();
    assert!((rate - 40.0).abs() < 1e-9);
}

#[tokio::test]
async fn test_fetch_rate_missing_quote_field() {
    let server = quote_server(serde_json::json!({ "compra": 39.0 })).await;

    let client = reqwest::Client::new();
    let err = fetch_rate(&client, &quote_url(&server)).await.unwrap_err();
    assert!(matches!(err, QuoteError::RateUnavailable(_)));
}

#[tokio::test]
async fn test_fetch_rate_server_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let client = reqwest::Client::new();
    let err = fetch_rate(&client, &quote_url(&server)).await.unwrap_err();
    assert!(matches!(err, QuoteError::RateFetchFailed(_)));
}

#[tokio::test]
async fn test_fetch_rate_non_json_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
        .mount(&server)
        .await;

    let client = reqwest::Client::new();
    let err = fetch_rate(&client, &quote_url(&server)).await.unwrap_err();
    assert!(matches!(err, QuoteError::RateFetchFailed(_)));
}

#[tokio::test]
async fn test_refresh_applies_and_persists_rate() {
    let server = quote_server(serde_json::json!({ "compra": 39.0, "venta": 41.0 })).await;
    let dir = TempDir::new().unwrap();
    let db = dir.path().join("printquote.db");

    {
        let mut session = PricingSession::open(&db).unwrap();
        assert!(session.config().use_auto_usd, "defaults ship with auto mode on");

        let client = reqwest::Client::new();
        let applied = session
            .refresh_exchange_rate(&client, &quote_url(&server))
            .await
            .unwrap();
        assert_eq!(applied, Some(40.0));
        assert_eq!(session.config().usd_to_uy, 40.0);
    }

    // The refreshed rate was persisted, not just applied in memory
    let session = PricingSession::open(&db).unwrap();
    assert_eq!(session.config().usd_to_uy, 40.0);
}

#[tokio::test]
async fn test_refresh_is_noop_when_auto_mode_off() {
    let dir = TempDir::new().unwrap();
    let mut session = PricingSession::open(&dir.path().join("printquote.db")).unwrap();

    let mut config = session.config().clone();
    config.use_auto_usd = false;
    session.update_config(config).unwrap();
    let stored = session.config().usd_to_uy;

    // No server is running on this address; the call must not even try it
    let client = reqwest::Client::new();
    let applied = session
        .refresh_exchange_rate(&client, "http://127.0.0.1:9/unreachable")
        .await
        .unwrap();
    assert_eq!(applied, None);
    assert_eq!(session.config().usd_to_uy, stored);
}

#[tokio::test]
async fn test_failed_refresh_keeps_last_known_rate() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let mut session = PricingSession::open(&dir.path().join("printquote.db")).unwrap();
    let stored = session.config().usd_to_uy;

    let client = reqwest::Client::new();
    let err = session
        .refresh_exchange_rate(&client, &quote_url(&server))
        .await
        .unwrap_err();
    assert!(matches!(err, QuoteError::RateFetchFailed(_)));
    assert_eq!(session.config().usd_to_uy, stored);
}
