//! Core domain types

use serde::{Deserialize, Serialize};
use std::fmt;

/// Trade direction as detected in an alert message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Side {
    Buy,
    Sell,
    #[default]
    Unknown,
}

impl Side {
    /// Wire representation expected by the exchange API.
    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Buy => "Buy",
            Side::Sell => "Sell",
            Side::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Value of a trade field that the alert template leaves untyped.
///
/// Stop loss and take profit lines carry either a price or free text
/// ("breakeven", "open"), so the parsed value is a tagged union instead
/// of a stringly field.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TradeValue {
    Numeric(f64),
    Raw(String),
    #[default]
    Absent,
}

impl TradeValue {
    /// Parse a raw field remainder: empty => absent, number => numeric,
    /// anything else kept verbatim.
    pub fn from_raw(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return TradeValue::Absent;
        }
        match trimmed.parse::<f64>() {
            Ok(value) => TradeValue::Numeric(value),
            Err(_) => TradeValue::Raw(trimmed.to_string()),
        }
    }

    /// Whether the value carries information worth emitting or forwarding.
    /// A numeric zero is indistinguishable from "not present" in the
    /// alert template and is treated as unset.
    pub fn is_set(&self) -> bool {
        match self {
            TradeValue::Numeric(value) => *value != 0.0,
            TradeValue::Raw(text) => !text.is_empty(),
            TradeValue::Absent => false,
        }
    }

    /// String form suitable for an exchange order parameter, if set.
    pub fn as_order_value(&self) -> Option<String> {
        if !self.is_set() {
            return None;
        }
        match self {
            TradeValue::Numeric(value) => Some(value.to_string()),
            TradeValue::Raw(text) => Some(text.clone()),
            TradeValue::Absent => None,
        }
    }
}

impl fmt::Display for TradeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TradeValue::Numeric(value) => write!(f, "{}", value),
            TradeValue::Raw(text) => f.write_str(text),
            TradeValue::Absent => Ok(()),
        }
    }
}

/// Structured trade record extracted from one alert block.
///
/// Created fresh per parse call, never mutated afterwards. Numeric fields
/// default to zero when missing or unparsable; that is the template's own
/// convention, not an error.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EntryTrade {
    pub is_limit_order: bool,
    pub token_name: String,
    pub bought_amount: u64,
    pub balance: u64,
    pub entry_price: f64,
    pub stop_loss: TradeValue,
    pub take_profit: TradeValue,
    pub entry_retest: bool,
    pub side: Side,
}

/// Screen region to monitor, in screen pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CaptureRegion {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl CaptureRegion {
    pub fn is_configured(&self) -> bool {
        self.width > 0 && self.height > 0
    }
}

/// Which segmentation policy applies to the monitored channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceFilter {
    /// Fixed "Current Trade" template channel.
    #[default]
    Structured,
    /// Keyword-triggered one-line signals.
    Generic,
}
