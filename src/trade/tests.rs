//! Tests for trade field extraction

use super::{format_trade, parse_trade};
use crate::types::{EntryTrade, Side, TradeValue};

const FULL_BLOCK: &str = "Current Trade LIMIT ORDER\n\
Token Name: DOGE\n\
Bought Token Amount: 1500\n\
Balance: 320\n\
Entry Price: 0.05\n\
Stop Loss: 0.045\n\
Take Profit: 0.08\n\
EP Retest: yes\n\
Long";

#[test]
fn parses_full_template() {
    let trade = parse_trade(FULL_BLOCK);
    assert!(trade.is_limit_order);
    assert_eq!(trade.token_name, "DOGE");
    assert_eq!(trade.bought_amount, 1500);
    assert_eq!(trade.balance, 320);
    assert_eq!(trade.entry_price, 0.05);
    assert_eq!(trade.stop_loss, TradeValue::Numeric(0.045));
    assert_eq!(trade.take_profit, TradeValue::Numeric(0.08));
    assert!(trade.entry_retest);
    assert_eq!(trade.side, Side::Buy);
}

#[test]
fn short_line_sets_sell_side() {
    let trade = parse_trade("Current Trade\nToken Name: ETH\nShort");
    assert_eq!(trade.side, Side::Sell);
}

#[test]
fn side_detection_is_case_insensitive_and_last_line_wins() {
    let trade = parse_trade("going LONG\nactually Short now");
    assert_eq!(trade.side, Side::Sell);
}

#[test]
fn missing_side_is_unknown() {
    let trade = parse_trade("Token Name: BTC");
    assert_eq!(trade.side, Side::Unknown);
}

#[test]
fn unparsable_numbers_default_to_zero() {
    let trade = parse_trade(
        "Token Name: BTC\nBought Token Amount: lots\nBalance: ???\nEntry Price: soon",
    );
    assert_eq!(trade.bought_amount, 0);
    assert_eq!(trade.balance, 0);
    assert_eq!(trade.entry_price, 0.0);
}

#[test]
fn stop_loss_keeps_free_text_verbatim() {
    let trade = parse_trade("Stop Loss: breakeven\nTake Profit: 1.25");
    assert_eq!(trade.stop_loss, TradeValue::Raw("breakeven".to_string()));
    assert_eq!(trade.take_profit, TradeValue::Numeric(1.25));
}

#[test]
fn empty_stop_loss_is_absent() {
    let trade = parse_trade("Stop Loss:");
    assert_eq!(trade.stop_loss, TradeValue::Absent);
}

#[test]
fn retest_truthy_set() {
    for value in ["true", "YES", "1", "si", "sì"] {
        let trade = parse_trade(&format!("EP Retest: {}", value));
        assert!(trade.entry_retest, "{:?} should be truthy", value);
    }
    for value in ["false", "no", "0", "maybe", ""] {
        let trade = parse_trade(&format!("EP Retest: {}", value));
        assert!(!trade.entry_retest, "{:?} should be falsy", value);
    }
}

#[test]
fn field_prefixes_are_case_sensitive() {
    let trade = parse_trade("token name: BTC");
    assert_eq!(trade.token_name, "");
}

#[test]
fn unrecognized_lines_are_ignored() {
    let trade = parse_trade("Current Trade\nsome ocr garbage ===\nToken Name: BTC");
    assert_eq!(trade.token_name, "BTC");
}

#[test]
fn limit_order_requires_line_suffix() {
    assert!(parse_trade("Current Trade LIMIT ORDER").is_limit_order);
    assert!(!parse_trade("LIMIT ORDER was mentioned mid-line").is_limit_order);
}

#[test]
fn empty_block_yields_default_record() {
    assert_eq!(parse_trade(""), EntryTrade::default());
}

#[test]
fn format_emits_fields_in_template_order() {
    let trade = EntryTrade {
        is_limit_order: true,
        token_name: "DOGE".to_string(),
        bought_amount: 1500,
        balance: 320,
        entry_price: 0.05,
        stop_loss: TradeValue::Numeric(0.045),
        take_profit: TradeValue::Raw("open".to_string()),
        entry_retest: true,
        side: Side::Unknown,
    };
    assert_eq!(
        format_trade(&trade),
        "LIMIT ORDER\n\
         Token Name: DOGE\n\
         Bought Token Amount: 1500\n\
         Balance: 320\n\
         Entry Price: 0.05\n\
         Stop Loss: 0.045\n\
         Take Profit: open\n\
         EP Retest: true"
    );
}

#[test]
fn format_skips_unset_fields_but_always_emits_retest() {
    assert_eq!(format_trade(&EntryTrade::default()), "EP Retest: false");
}

#[test]
fn round_trip_reproduces_populated_record() {
    // Side is not part of the template's field lines, so it stays Unknown
    // through a round trip; zero-valued fields are indistinguishable from
    // absent and are likewise excluded here.
    let trade = EntryTrade {
        is_limit_order: true,
        token_name: "DOGE".to_string(),
        bought_amount: 1500,
        balance: 320,
        entry_price: 0.05,
        stop_loss: TradeValue::Numeric(0.045),
        take_profit: TradeValue::Raw("open".to_string()),
        entry_retest: true,
        side: Side::Unknown,
    };
    assert_eq!(parse_trade(&format_trade(&trade)), trade);
}

#[test]
fn round_trip_with_false_retest() {
    let trade = EntryTrade {
        token_name: "BTC".to_string(),
        entry_price: 61250.5,
        stop_loss: TradeValue::Numeric(60000.0),
        take_profit: TradeValue::Numeric(65000.0),
        ..Default::default()
    };
    assert_eq!(parse_trade(&format_trade(&trade)), trade);
}
