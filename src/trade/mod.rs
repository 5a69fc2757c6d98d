//! Trade field extraction
//!
//! Parses the fixed "Current Trade" alert template into an [`EntryTrade`].
//! Parsing never fails past this boundary: unparsable fields fall back to
//! their zero values per field, exactly as the template's loose formatting
//! demands after a round through OCR.

#[cfg(test)]
mod tests;

use crate::types::{EntryTrade, Side, TradeValue};
use tracing::warn;

const FIELD_TOKEN_NAME: &str = "Token Name:";
const FIELD_BOUGHT_AMOUNT: &str = "Bought Token Amount:";
const FIELD_BALANCE: &str = "Balance:";
const FIELD_ENTRY_PRICE: &str = "Entry Price:";
const FIELD_STOP_LOSS: &str = "Stop Loss:";
const FIELD_TAKE_PROFIT: &str = "Take Profit:";
const FIELD_EP_RETEST: &str = "EP Retest:";

const LIMIT_ORDER_SUFFIX: &str = "LIMIT ORDER";

/// Values accepted as true for the "EP Retest:" field.
const RETEST_TRUTHY: [&str; 5] = ["true", "yes", "1", "si", "sì"];

/// Extract a trade record from one message block.
///
/// Unrecognized lines are ignored. Field prefixes are case-sensitive;
/// side detection ("long"/"short") is not. Later lines overwrite earlier
/// ones for the same field.
pub fn parse_trade(block: &str) -> EntryTrade {
    let mut trade = EntryTrade::default();

    for line in block.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let lower = line.to_lowercase();
        if lower.contains("long") {
            trade.side = Side::Buy;
        } else if lower.contains("short") {
            trade.side = Side::Sell;
        }

        if line.ends_with(LIMIT_ORDER_SUFFIX) {
            trade.is_limit_order = true;
        }

        if let Some(rest) = line.strip_prefix(FIELD_TOKEN_NAME) {
            trade.token_name = rest.trim().to_string();
        } else if let Some(rest) = line.strip_prefix(FIELD_BOUGHT_AMOUNT) {
            trade.bought_amount = rest.trim().parse().unwrap_or(0);
        } else if let Some(rest) = line.strip_prefix(FIELD_BALANCE) {
            trade.balance = rest.trim().parse().unwrap_or(0);
        } else if let Some(rest) = line.strip_prefix(FIELD_ENTRY_PRICE) {
            trade.entry_price = rest.trim().parse().unwrap_or(0.0);
        } else if let Some(rest) = line.strip_prefix(FIELD_STOP_LOSS) {
            trade.stop_loss = TradeValue::from_raw(rest);
        } else if let Some(rest) = line.strip_prefix(FIELD_TAKE_PROFIT) {
            trade.take_profit = TradeValue::from_raw(rest);
        } else if let Some(rest) = line.strip_prefix(FIELD_EP_RETEST) {
            let value = rest.trim().to_lowercase();
            trade.entry_retest = RETEST_TRUTHY.contains(&value.as_str());
        }
    }

    if trade.token_name.is_empty() {
        warn!("trade block parsed without a token name");
    }

    trade
}

/// Canonical textual form of a trade record, the inverse of [`parse_trade`].
///
/// Emits only populated fields, in the template's fixed order. EP Retest is
/// always emitted since false is a meaningful value there.
pub fn format_trade(trade: &EntryTrade) -> String {
    let mut lines = Vec::new();

    if trade.is_limit_order {
        lines.push(LIMIT_ORDER_SUFFIX.to_string());
    }
    if !trade.token_name.is_empty() {
        lines.push(format!("{} {}", FIELD_TOKEN_NAME, trade.token_name));
    }
    if trade.bought_amount > 0 {
        lines.push(format!("{} {}", FIELD_BOUGHT_AMOUNT, trade.bought_amount));
    }
    if trade.balance > 0 {
        lines.push(format!("{} {}", FIELD_BALANCE, trade.balance));
    }
    if trade.entry_price > 0.0 {
        lines.push(format!("{} {}", FIELD_ENTRY_PRICE, trade.entry_price));
    }
    if trade.stop_loss.is_set() {
        lines.push(format!("{} {}", FIELD_STOP_LOSS, trade.stop_loss));
    }
    if trade.take_profit.is_set() {
        lines.push(format!("{} {}", FIELD_TAKE_PROFIT, trade.take_profit));
    }
    lines.push(format!("{} {}", FIELD_EP_RETEST, trade.entry_retest));

    lines.join("\n")
}
