//! Tests for the Bybit client

use super::{BybitTrader, ExchangeTrader, MockExchangeTrader, NoopTrader, OrderReceipt, OrderType};
use crate::config::BybitConfig;
use crate::error::MonitorError;
use crate::types::Side;

fn trader() -> BybitTrader {
    BybitTrader::new(&BybitConfig {
        api_key: "test-key".to_string(),
        api_secret: "test-secret".to_string(),
        testnet: true,
    })
}

#[test]
fn signature_is_deterministic() {
    let trader = trader();
    let a = trader.sign(1700000000000, r#"{"symbol":"BTCUSDT"}"#).unwrap();
    let b = trader.sign(1700000000000, r#"{"symbol":"BTCUSDT"}"#).unwrap();
    assert_eq!(a, b);
    // hex-encoded HMAC-SHA256
    assert_eq!(a.len(), 64);
    assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
}

#[test]
fn signature_covers_body_and_timestamp() {
    let trader = trader();
    let base = trader.sign(1700000000000, "{}").unwrap();
    assert_ne!(base, trader.sign(1700000000001, "{}").unwrap());
    assert_ne!(base, trader.sign(1700000000000, r#"{"a":1}"#).unwrap());
}

#[test]
fn order_type_wire_names() {
    assert_eq!(OrderType::Market.as_str(), "Market");
    assert_eq!(OrderType::Limit.as_str(), "Limit");
}

#[tokio::test]
async fn unknown_side_is_rejected_before_any_request() {
    let err = trader()
        .place_order("BTCUSDT", Side::Unknown, "1", OrderType::Market, None)
        .await
        .unwrap_err();
    assert!(matches!(err, MonitorError::Exchange(_)));
}

#[tokio::test]
async fn limit_order_without_price_is_rejected() {
    let err = trader()
        .place_order("BTCUSDT", Side::Buy, "1", OrderType::Limit, None)
        .await
        .unwrap_err();
    assert!(matches!(err, MonitorError::Exchange(_)));
}

#[tokio::test]
async fn mocked_trader_sees_optional_string_arguments() {
    let mut trader = MockExchangeTrader::new();
    trader
        .expect_place_order()
        .withf(|_, _, _, _, price| *price == Some("0.05"))
        .returning(|_, _, _, _, _| {
            Ok(OrderReceipt {
                order_id: "mock-1".to_string(),
            })
        });
    trader
        .expect_set_stop_loss_take_profit()
        .withf(|_, sl, tp| sl.is_none() && *tp == Some("0.08"))
        .returning(|_, _, _| Ok(()));

    let receipt = trader
        .place_order("DOGEUSDT", Side::Buy, "1", OrderType::Limit, Some("0.05"))
        .await
        .unwrap();
    assert_eq!(receipt.order_id, "mock-1");

    trader
        .set_stop_loss_take_profit("DOGEUSDT", None, Some("0.08"))
        .await
        .unwrap();
}

#[tokio::test]
async fn noop_trader_accepts_everything() {
    let receipt = NoopTrader
        .place_order("DOGEUSDT", Side::Buy, "1500", OrderType::Market, None)
        .await
        .unwrap();
    assert_eq!(receipt.order_id, "dry-run");

    NoopTrader
        .set_stop_loss_take_profit("DOGEUSDT", Some("0.045"), None)
        .await
        .unwrap();
}
