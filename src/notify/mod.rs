//! Telegram notification module
//!
//! Forwards detected messages and executed trades to a Telegram chat.


use crate::error::{MonitorError, Result};
use crate::types::EntryTrade;
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;

/// Notification channel the monitor emits accepted messages to.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotifySink: Send + Sync {
    async fn notify(&self, text: &str) -> Result<()>;
}

/// Telegram notifier
#[derive(Clone)]
pub struct TelegramNotifier {
    http: Client,
    bot_token: String,
    chat_id: String,
    enabled: bool,
}

#[derive(Debug, Serialize)]
struct TelegramMessage {
    chat_id: String,
    text: String,
    parse_mode: String,
}

impl TelegramNotifier {
    pub fn new(bot_token: String, chat_id: String) -> Self {
        Self {
            http: Client::new(),
            bot_token,
            chat_id,
            enabled: true,
        }
    }

    /// Create a disabled notifier (for when Telegram is not configured)
    pub fn disabled() -> Self {
        Self {
            http: Client::new(),
            bot_token: String::new(),
            chat_id: String::new(),
            enabled: false,
        }
    }

    /// Send a raw message (Markdown format)
    pub async fn send(&self, text: &str) -> Result<()> {
        if !self.enabled {
            return Ok(());
        }

        let url = format!("https://api.telegram.org/bot{}/sendMessage", self.bot_token);

        let msg = TelegramMessage {
            chat_id: self.chat_id.clone(),
            text: text.to_string(),
            parse_mode: "Markdown".to_string(),
        };

        let response = self.http.post(&url).json(&msg).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(MonitorError::Telegram(format!("{}: {}", status, error_text)));
        }

        Ok(())
    }
}

#[async_trait]
impl NotifySink for TelegramNotifier {
    async fn notify(&self, text: &str) -> Result<()> {
        self.send(text).await
    }
}

/// Frame a detected Discord message for the notification channel.
pub fn frame_alert(message: &str) -> String {
    format!(
        "🔔 *New Discord message*\n\
        📱 Detected: {}\n\
        📝 Content:\n{}",
        chrono::Local::now().format("%H:%M:%S"),
        message,
    )
}

/// Frame an executed trade summary.
pub fn frame_trade(trade: &EntryTrade) -> String {
    format!(
        "🚀 *Trade detected*\n\
        📊 Token: {}\n\
        💰 Entry Price: {}\n\
        📈 Side: {}\n\
        🛑 Stop Loss: {}\n\
        🎯 Take Profit: {}\n\
        ⏰ Detected: {}",
        trade.token_name,
        trade.entry_price,
        trade.side,
        trade.stop_loss,
        trade.take_profit,
        chrono::Local::now().format("%H:%M:%S"),
    )
}

/// Frame a monitor error for the notification channel.
pub fn frame_error(context: &str, error: &str) -> String {
    format!(
        "❌ *Monitor error*\n\
        ⚠️ Context: {}\n\
        📄 Error: {}",
        context, error,
    )
}
