//! Discord Trade-Alert Screen Monitor
//!
//! Watches a fixed screen region for Discord-style trade alerts via repeated
//! screenshot + OCR, deduplicates messages, extracts structured trade
//! parameters and forwards them to Telegram and a Bybit trading client.

pub mod capture;
pub mod config;
pub mod detect;
pub mod error;
pub mod exchange;
pub mod fingerprint;
pub mod ledger;
pub mod monitor;
pub mod notify;
pub mod ocr;
pub mod segment;
pub mod trade;
pub mod types;
